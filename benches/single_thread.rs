use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hopdict::Dictionary;

const SIZE: usize = 10_000;

#[derive(Clone, Copy)]
struct RandomKeys {
    state: usize,
}

impl RandomKeys {
    fn new() -> Self {
        RandomKeys { state: 0 }
    }
}

impl Iterator for RandomKeys {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        // Add 1 then multiply by some 32 bit prime.
        self.state = self.state.wrapping_add(1).wrapping_mul(3_787_392_781);
        Some(self.state)
    }
}

fn read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    group.bench_function("hopdict", |b| {
        let mut m = Dictionary::<usize, usize>::new();
        for i in RandomKeys::new().take(SIZE) {
            m.put(i, i);
        }

        b.iter(|| {
            for i in RandomKeys::new().take(SIZE) {
                black_box(assert_eq!(m.get(&i), Ok(&i)));
            }
        });
    });

    group.bench_function("std", |b| {
        let mut m = HashMap::<usize, usize>::default();
        for i in RandomKeys::new().take(SIZE) {
            m.insert(i, i);
        }

        b.iter(|| {
            for i in RandomKeys::new().take(SIZE) {
                black_box(assert_eq!(m.get(&i), Some(&i)));
            }
        });
    });

    group.finish();
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    group.bench_function("hopdict", |b| {
        b.iter(|| {
            let mut m = Dictionary::<usize, usize>::new();
            for i in RandomKeys::new().take(SIZE) {
                m.put(i, i);
            }
            black_box(m)
        });
    });

    group.bench_function("hopdict_presized", |b| {
        b.iter(|| {
            let mut m = Dictionary::<usize, usize>::with_capacity(SIZE * 4);
            for i in RandomKeys::new().take(SIZE) {
                m.put(i, i);
            }
            black_box(m)
        });
    });

    group.bench_function("std", |b| {
        b.iter(|| {
            let mut m = HashMap::<usize, usize>::default();
            for i in RandomKeys::new().take(SIZE) {
                m.insert(i, i);
            }
            black_box(m)
        });
    });

    group.finish();
}

fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    group.bench_function("hopdict", |b| {
        let mut m = Dictionary::<usize, usize>::new();
        for i in RandomKeys::new().take(SIZE) {
            m.put(i, i);
        }

        b.iter_batched(
            || m.clone(),
            |mut m| {
                for i in RandomKeys::new().take(SIZE) {
                    black_box(assert_eq!(m.remove(&i), Ok(i)));
                }
                m
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("std", |b| {
        let mut m = HashMap::<usize, usize>::default();
        for i in RandomKeys::new().take(SIZE) {
            m.insert(i, i);
        }

        b.iter_batched(
            || m.clone(),
            |mut m| {
                for i in RandomKeys::new().take(SIZE) {
                    black_box(assert_eq!(m.remove(&i), Some(i)));
                }
                m
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, read, insert, remove);
criterion_main!(benches);
