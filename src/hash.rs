use std::rc::Rc;
use std::sync::Arc;

/// Separates the components of a compound key so that `("ab", "c")` and
/// `("a", "bc")` produce different byte streams.
const UNIT_SEPARATOR: u8 = 0x1f;

/// The sdbm hash state.
///
/// Bytes are folded into a signed 64-bit accumulator with
/// `h = byte + (h << 6) + (h << 16) - h`, starting from zero. Overflow wraps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sdbm {
    state: i64,
}

impl Sdbm {
    /// Creates a hash state seeded at zero.
    #[inline]
    pub fn new() -> Sdbm {
        Sdbm { state: 0 }
    }

    /// Folds `bytes` into the state.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let h = self.state;
            self.state = i64::from(byte)
                .wrapping_add(h << 6)
                .wrapping_add(h << 16)
                .wrapping_sub(h);
        }
    }

    /// Folds a single byte into the state.
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.write(&[byte]);
    }

    /// Returns the signed hash of everything written so far.
    #[inline]
    pub fn finish(&self) -> i64 {
        self.state
    }
}

/// A key that can be reduced to a canonical byte representation.
///
/// Equal keys must write equal bytes. Owned and borrowed forms of the same
/// key (`String` and `str`, `Vec<u8>` and `[u8]`) write identical bytes so that
/// lookups through [`Borrow`](std::borrow::Borrow) land in the same window.
///
/// # Examples
///
/// ```
/// use hopdict::{Hashable, Sdbm};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Hashable for Point {
///     fn write_canonical(&self, state: &mut Sdbm) {
///         (self.x, self.y).write_canonical(state);
///     }
/// }
/// ```
pub trait Hashable {
    /// Writes the canonical bytes of `self` into `state`.
    fn write_canonical(&self, state: &mut Sdbm);

    /// Returns the sdbm hash of the canonical bytes.
    fn sdbm(&self) -> i64 {
        let mut state = Sdbm::new();
        self.write_canonical(&mut state);
        state.finish()
    }
}

/// Returns the slot a key would occupy in a table of `capacity` slots absent
/// any collision.
///
/// This is the absolute value of the sdbm hash reduced modulo the capacity,
/// the reduction used by [`HashMode::Direct`].
#[inline]
pub fn home_index<Q>(key: &Q, capacity: usize) -> usize
where
    Q: Hashable + ?Sized,
{
    HashMode::Direct.home_index(key, capacity)
}

/// How a key's sdbm hash is reduced to a home slot.
///
/// # Examples
///
/// ```
/// use hopdict::{Dictionary, HashMode};
///
/// let dict: Dictionary<u64, u64> = Dictionary::builder()
///     // Mix the hash before reducing it.
///     .hash_mode(HashMode::Avalanche)
///     .build();
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    /// Take the absolute value of the hash modulo the capacity.
    ///
    /// The sdbm multiplier 65599 is congruent to -1 modulo every capacity of
    /// the form `10 * 2^k` up to 320, which reduces the hash to an alternating
    /// sum of the key bytes. Keys such as `"10"` and `"21"` then share a home
    /// and the table grows well past twice the entry count to separate them.
    #[default]
    Direct,
    /// Pass the hash through [`avalanche`] before reducing it, spreading
    /// clustered keys evenly at every capacity.
    Avalanche,
}

impl HashMode {
    /// Returns the home slot of `key` in a table of `capacity` slots.
    #[inline]
    pub fn home_index<Q>(self, key: &Q, capacity: usize) -> usize
    where
        Q: Hashable + ?Sized,
    {
        debug_assert!(capacity > 0);

        let hash = key.sdbm();
        let reduced = match self {
            HashMode::Direct => hash.unsigned_abs(),
            HashMode::Avalanche => avalanche(hash),
        };

        (reduced % capacity as u64) as usize
    }
}

/// The murmur3 64-bit finalizer.
///
/// Every input bit affects every output bit, so hashes that differ only in a
/// few positions land in unrelated slots.
#[inline]
pub fn avalanche(hash: i64) -> u64 {
    let mut h = hash as u64;
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

impl Hashable for str {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        state.write(self.as_bytes());
    }
}

impl Hashable for String {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        self.as_str().write_canonical(state);
    }
}

impl Hashable for [u8] {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        state.write(self);
    }
}

impl Hashable for Vec<u8> {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        state.write(self);
    }
}

impl Hashable for bool {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        state.write(if *self { b"true" } else { b"false" });
    }
}

impl Hashable for char {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        let mut buf = [0; 4];
        state.write(self.encode_utf8(&mut buf).as_bytes());
    }
}

// Integers hash their decimal text, without allocating.
macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl Hashable for $ty {
            #[inline]
            fn write_canonical(&self, state: &mut Sdbm) {
                write_decimal(*self as u128, false, state);
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Hashable for $ty {
            #[inline]
            fn write_canonical(&self, state: &mut Sdbm) {
                write_decimal(self.unsigned_abs() as u128, *self < 0, state);
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_signed!(i8, i16, i32, i64, i128, isize);

fn write_decimal(mut n: u128, negative: bool, state: &mut Sdbm) {
    // u128::MAX has 39 digits, plus the sign.
    let mut buf = [0u8; 40];
    let mut start = buf.len();

    loop {
        start -= 1;
        buf[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }

    if negative {
        start -= 1;
        buf[start] = b'-';
    }

    state.write(&buf[start..]);
}

impl<T: Hashable + ?Sized> Hashable for &T {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        (**self).write_canonical(state);
    }
}

impl<T: Hashable + ?Sized> Hashable for Box<T> {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        (**self).write_canonical(state);
    }
}

impl<T: Hashable + ?Sized> Hashable for Rc<T> {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        (**self).write_canonical(state);
    }
}

impl<T: Hashable + ?Sized> Hashable for Arc<T> {
    #[inline]
    fn write_canonical(&self, state: &mut Sdbm) {
        (**self).write_canonical(state);
    }
}

macro_rules! impl_tuple {
    ($first:ident $(, $rest:ident)*) => {
        #[allow(non_snake_case)]
        impl<$first: Hashable, $($rest: Hashable),*> Hashable for ($first, $($rest,)*) {
            #[inline]
            fn write_canonical(&self, state: &mut Sdbm) {
                let ($first, $($rest,)*) = self;
                $first.write_canonical(state);
                $(
                    state.write_u8(UNIT_SEPARATOR);
                    $rest.write_canonical(state);
                )*
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
