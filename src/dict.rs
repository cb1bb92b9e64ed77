use crate::hash::{HashMode, Hashable};
use crate::raw::{self, Exhausted, MIN_CAPACITY};
use crate::{Error, SnapshotIterator};

use log::debug;
use std::borrow::Borrow;
use std::fmt;
use std::mem;

/// A dictionary backed by a closed hash table with a bounded hop window.
///
/// Every entry lives within [`HOP_RANGE`](crate::HOP_RANGE) slots of the slot its
/// key hashes to, so a lookup never inspects more than `HOP_RANGE` slots. When
/// an insertion finds its window full, existing entries are shifted further
/// along their own windows to make room, and if that fails the table doubles.
///
/// The table doubles when it becomes half full and halves when it falls to a
/// quarter full, never shrinking below [`MIN_CAPACITY`](crate::MIN_CAPACITY)
/// slots.
///
/// Keys are hashed through their canonical byte form, see [`Hashable`].
///
/// # Examples
///
/// ```
/// use hopdict::{Dictionary, Error};
///
/// let mut dict = Dictionary::new();
/// dict.put("a", 1);
/// dict.put("b", 2);
/// dict.put("c", 3);
///
/// assert_eq!(dict.len(), 3);
/// assert_eq!(dict.get("b"), Ok(&2));
/// assert_eq!(dict.remove("a"), Ok(1));
/// assert!(!dict.contains("a"));
/// assert_eq!(dict.get("a"), Err(Error::KeyNotFound));
/// ```
#[derive(Clone)]
pub struct Dictionary<K, V> {
    table: raw::Table<K, V>,
    count: usize,
    initial_capacity: usize,
    // Set to the entry count when a shrink had to double back to its old
    // capacity. Shrinking is held off until half of those entries are gone.
    held_shrink: Option<usize>,
}

/// A builder for a [`Dictionary`].
///
/// # Examples
///
/// ```rust
/// use hopdict::{Dictionary, HashMode};
///
/// let dict: Dictionary<String, u64> = Dictionary::builder()
///     // Set the initial number of slots.
///     .capacity(80)
///     // Mix hashes before reducing them to a slot.
///     .hash_mode(HashMode::Avalanche)
///     // Construct the dictionary.
///     .build();
///
/// assert_eq!(dict.capacity(), 80);
/// assert_eq!(dict.hash_mode(), HashMode::Avalanche);
/// ```
pub struct DictionaryBuilder<K, V> {
    capacity: usize,
    hash_mode: HashMode,
    _kv: std::marker::PhantomData<(K, V)>,
}

impl<K, V> DictionaryBuilder<K, V> {
    /// Set the initial number of slots in the table.
    ///
    /// Values below [`MIN_CAPACITY`](crate::MIN_CAPACITY) are raised to it. The
    /// table will still grow once it is half full.
    pub fn capacity(self, capacity: usize) -> DictionaryBuilder<K, V> {
        DictionaryBuilder {
            capacity,
            hash_mode: self.hash_mode,
            _kv: std::marker::PhantomData,
        }
    }

    /// Set how key hashes are reduced to a home slot.
    ///
    /// See [`HashMode`] for details.
    pub fn hash_mode(self, hash_mode: HashMode) -> DictionaryBuilder<K, V> {
        DictionaryBuilder {
            capacity: self.capacity,
            hash_mode,
            _kv: std::marker::PhantomData,
        }
    }

    /// Construct a [`Dictionary`] from the builder, using the configured options.
    pub fn build(self) -> Dictionary<K, V> {
        let capacity = self.capacity.max(MIN_CAPACITY);

        Dictionary {
            table: raw::Table::new(capacity, self.hash_mode),
            count: 0,
            initial_capacity: capacity,
            held_shrink: None,
        }
    }
}

impl<K, V> fmt::Debug for DictionaryBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryBuilder")
            .field("capacity", &self.capacity)
            .field("hash_mode", &self.hash_mode)
            .finish()
    }
}

impl<K, V> Dictionary<K, V> {
    /// Creates an empty `Dictionary` with [`MIN_CAPACITY`](crate::MIN_CAPACITY) slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use hopdict::Dictionary;
    /// let dict: Dictionary<&str, i32> = Dictionary::new();
    /// assert_eq!(dict.capacity(), hopdict::MIN_CAPACITY);
    /// ```
    pub fn new() -> Dictionary<K, V> {
        Dictionary::builder().build()
    }

    /// Creates an empty `Dictionary` with `capacity` slots.
    ///
    /// Values below [`MIN_CAPACITY`](crate::MIN_CAPACITY) are raised to it.
    pub fn with_capacity(capacity: usize) -> Dictionary<K, V> {
        Dictionary::builder().capacity(capacity).build()
    }

    /// Returns a builder for a `Dictionary`.
    pub fn builder() -> DictionaryBuilder<K, V> {
        DictionaryBuilder {
            capacity: MIN_CAPACITY,
            hash_mode: HashMode::default(),
            _kv: std::marker::PhantomData,
        }
    }

    /// Returns the number of entries in the dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the dictionary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns how key hashes are reduced to a home slot.
    #[inline]
    pub fn hash_mode(&self) -> HashMode {
        self.table.hash_mode()
    }

    /// An iterator visiting all key-value pairs in table order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: self.table.iter(),
        }
    }

    /// An iterator visiting all keys in table order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in table order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    /// Calls `visit` on every entry in table order, stopping as soon as it
    /// returns `false`.
    ///
    /// The dictionary is borrowed for the whole traversal, so every entry is
    /// seen exactly once.
    ///
    /// # Examples
    ///
    /// ```
    /// use hopdict::Dictionary;
    ///
    /// let dict = Dictionary::from([(1, 10), (2, 20), (3, 30)]);
    ///
    /// let mut sum = 0;
    /// dict.iterate(|_, value| {
    ///     sum += value;
    ///     true
    /// });
    /// assert_eq!(sum, 60);
    ///
    /// let mut visited = 0;
    /// dict.iterate(|_, _| {
    ///     visited += 1;
    ///     false
    /// });
    /// assert_eq!(visited, 1);
    /// ```
    pub fn iterate<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.iter() {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Returns an external iterator over a copy of the current entries.
    ///
    /// See [`SnapshotIterator`] for details.
    pub fn iterator(&self) -> SnapshotIterator<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let entries = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        SnapshotIterator::new(entries)
    }
}

impl<K, V> Default for Dictionary<K, V> {
    fn default() -> Self {
        Dictionary::new()
    }
}

impl<K, V> Dictionary<K, V>
where
    K: Hashable + Eq,
{
    /// Returns `true` if the dictionary contains an entry for `key`.
    ///
    /// The key may be any borrowed form of the dictionary's key type, but
    /// [`Hashable`] and [`Eq`] on the borrowed form *must* match those for
    /// the key type.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        self.table.find(key).is_some()
    }

    /// Returns a reference to the value for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        match self.table.get(key) {
            Some((_, value)) => Ok(value),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Returns the stored key and value for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Result<(&K, &V), Error>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        self.table.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use hopdict::Dictionary;
    ///
    /// let mut dict = Dictionary::from([("hits", 0)]);
    /// *dict.get_mut("hits").unwrap() += 1;
    /// assert_eq!(dict.get("hits"), Ok(&1));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        self.table.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Inserts a key-value pair into the dictionary.
    ///
    /// If the key was already present its value is replaced and the old value
    /// is returned. Otherwise the entry is added and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use hopdict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    /// assert_eq!(dict.put(37, "a"), None);
    ///
    /// assert_eq!(dict.put(37, "b"), Some("a"));
    /// assert_eq!(dict.get(&37), Ok(&"b"));
    /// assert_eq!(dict.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(current) = self.table.get_mut(&key) {
            return Some(mem::replace(current, value));
        }

        self.count += 1;

        // A saturated window is fixed by doubling. The rejected entry is
        // placed by the rehash itself.
        if let Err(rejected) = self.table.insert(key, value) {
            let capacity = self.capacity().checked_mul(2).expect("capacity overflow");
            self.resize_with(capacity, Some(rejected), "hop window exhausted");
            self.held_shrink = None;
        }

        if self.count >= self.capacity() / 2 {
            self.grow("load factor reached 1/2");
            self.held_shrink = None;
        }

        None
    }

    /// Removes `key` from the dictionary, returning its value.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent, leaving the
    /// dictionary untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        let (_, value) = self.table.remove(key).ok_or(Error::KeyNotFound)?;
        self.count -= 1;

        let capacity = self.capacity();
        if capacity > MIN_CAPACITY && self.count <= capacity / 4 && self.may_shrink() {
            let to = self.resize(capacity / 2, "load factor fell to 1/4");

            // The rehash doubled back, the same entries would do so again.
            self.held_shrink = (to >= capacity).then_some(self.count);
        }

        Ok(value)
    }

    /// Removes every entry, returning the table to its initial capacity.
    pub fn clear(&mut self) {
        self.table = raw::Table::new(self.initial_capacity, self.hash_mode());
        self.count = 0;
        self.held_shrink = None;
    }

    fn may_shrink(&self) -> bool {
        match self.held_shrink {
            Some(held) => self.count <= held / 2,
            None => true,
        }
    }

    // Doubles the table.
    fn grow(&mut self, reason: &str) {
        let capacity = self.capacity().checked_mul(2).expect("capacity overflow");
        self.resize_with(capacity, None, reason);
    }

    fn resize(&mut self, capacity: usize, reason: &str) -> usize {
        self.resize_with(capacity, None, reason)
    }

    // Returns the capacity the table ended up with.
    fn resize_with(
        &mut self,
        capacity: usize,
        rejected: Option<Exhausted<K, V>>,
        reason: &str,
    ) -> usize {
        let from = self.capacity();
        let to = match rejected {
            Some(rejected) => self.table.grow_with(capacity, rejected),
            None => self.table.resize(capacity),
        };

        debug!(
            "resized table from {from} to {to} slots holding {} entries: {reason}",
            self.count
        );

        debug_assert_eq!(self.table.verify(), Ok(self.count));
        to
    }
}

impl<K, V> PartialEq for Dictionary<K, V>
where
    K: Hashable + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<K, V> Eq for Dictionary<K, V>
where
    K: Hashable + Eq,
    V: Eq,
{
}

impl<K, V> fmt::Debug for Dictionary<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for Dictionary<K, V>
where
    K: Hashable + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V> Extend<(&'a K, &'a V)> for Dictionary<K, V>
where
    K: Copy + Hashable + Eq + 'a,
    V: Copy + 'a,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Dictionary<K, V>
where
    K: Hashable + Eq,
{
    fn from(arr: [(K, V); N]) -> Self {
        Dictionary::from_iter(arr)
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary<K, V>
where
    K: Hashable + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();

        // Start large enough that the lower bound fits without growing.
        let (lower, _) = iter.size_hint();
        let mut dict = Dictionary::with_capacity(lower.saturating_mul(2).saturating_add(1));
        dict.extend(iter);
        dict
    }
}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for Dictionary<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            raw: self.table.into_iter(),
        }
    }
}

/// An iterator over a dictionary's entries.
///
/// This struct is created by the [`iter`](Dictionary::iter) method on [`Dictionary`].
/// See its documentation for details.
pub struct Iter<'a, K, V> {
    raw: raw::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over a dictionary's entries.
///
/// This struct is created by the `into_iter` method on [`Dictionary`].
pub struct IntoIter<K, V> {
    raw: raw::IntoIter<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

/// An iterator over a dictionary's keys.
///
/// This struct is created by the [`keys`](Dictionary::keys) method on [`Dictionary`].
/// See its documentation for details.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }
}

impl<K, V> fmt::Debug for Keys<'_, K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter.clone().map(|(key, _)| key))
            .finish()
    }
}

/// An iterator over a dictionary's values.
///
/// This struct is created by the [`values`](Dictionary::values) method on [`Dictionary`].
/// See its documentation for details.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }
}

impl<K, V> fmt::Debug for Values<'_, K, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter.clone().map(|(_, value)| value))
            .finish()
    }
}
