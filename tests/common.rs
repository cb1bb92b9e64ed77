#![allow(dead_code)]

use hopdict::{Dictionary, HashMode};

use std::sync::Once;

static LOGGER: Once = Once::new();

// Routes `log` output through the test harness. Set `RUST_LOG=debug` to see resizes.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

// Run the test on different configurations of a `Dictionary`.
pub fn with_dict<K, V>(mut test: impl FnMut(&dyn Fn() -> Dictionary<K, V>)) {
    init_logger();

    // The minimum capacity, exercising every resize threshold.
    test(&(|| Dictionary::new()));

    // A larger table that should rarely resize in small tests.
    test(&(|| Dictionary::builder().capacity(1024).build()));

    // An odd capacity, so the home index wraps unevenly, with mixed hashes.
    test(&(|| {
        Dictionary::builder()
            .capacity(13)
            .hash_mode(HashMode::Avalanche)
            .build()
    }));
}

// Returns the number of entries to use for larger tests.
pub fn entries() -> usize {
    if cfg!(miri) {
        64
    } else {
        1 << 10
    }
}
