mod probe;
mod slot;

use std::borrow::Borrow;
use std::{fmt, slice, vec};

use log::{trace, warn};

use self::probe::{distance, Probe};
use self::slot::{Bucket, Slot};
use crate::hash::{HashMode, Hashable};

pub use self::probe::HOP_RANGE;

/// The smallest number of slots a table ever has.
pub const MIN_CAPACITY: usize = 10;

// The number of times a rehash may double its target capacity before giving up.
//
// Clustered hashes under the direct reduction can take several doublings to
// separate. A window that stays saturated through all of them belongs to keys
// that share their whole hash.
const MAX_REHASH_ATTEMPTS: usize = 16;

// A closed hash table with a bounded hop window.
//
// The table stores entries directly in its slot array. Every entry lives within
// `HOP_RANGE - 1` slots past its home index, so lookups never probe further than
// the window.
#[derive(Clone)]
pub struct Table<K, V> {
    slots: Vec<Slot<K, V>>,
    mode: HashMode,
}

// The hop window of a key is saturated and no displacement path exists.
//
// The entry is handed back to the caller, who is expected to pass it to
// `Table::grow_with`.
pub struct Exhausted<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> fmt::Debug for Exhausted<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Exhausted")
    }
}

impl<K, V> Table<K, V> {
    // Allocate an empty table with `capacity` slots.
    pub fn new(capacity: usize, mode: HashMode) -> Table<K, V> {
        assert!(
            capacity >= MIN_CAPACITY,
            "table capacity must be at least {MIN_CAPACITY}"
        );

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);

        Table { slots, mode }
    }

    // Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn hash_mode(&self) -> HashMode {
        self.mode
    }

    // Returns an iterator over the occupied slots, in index order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    // Empties every slot, returning the entries in index order.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        self.slots
            .iter_mut()
            .filter_map(Slot::take)
            .map(|bucket| (bucket.key, bucket.value))
            .collect()
    }
}

impl<K, V> Table<K, V>
where
    K: Hashable + Eq,
{
    // Returns the slot holding `key`.
    //
    // Only the hop window of the key is searched. Empty slots do not end the
    // search, a removal may have emptied a slot in front of the entry.
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        let home = self.mode.home_index(key, self.capacity());
        let mut probe = Probe::start(home, self.capacity());

        while probe.in_window() {
            if let Some(bucket) = self.slots[probe.i].bucket() {
                if bucket.key.borrow() == key {
                    return Some(probe.i);
                }
            }

            probe.next();
        }

        None
    }

    // Returns the entry for `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        let i = self.find(key)?;
        self.slots[i]
            .bucket()
            .map(|bucket| (&bucket.key, &bucket.value))
    }

    // Returns a mutable reference to the value for `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        let i = self.find(key)?;
        self.slots[i].bucket_mut().map(|bucket| &mut bucket.value)
    }

    // Inserts a key that is not present in the table.
    //
    // Returns the slot the entry was placed in, or hands the entry back if its
    // window is saturated and no displacement path exists.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize, Exhausted<K, V>> {
        debug_assert!(self.find(&key).is_none());

        let home = self.mode.home_index(&key, self.capacity());

        let target = match probe::find_empty_in_window(&self.slots, home) {
            Some(i) => i,
            None => match probe::find_displacement_path(&self.slots, home) {
                Some(path) => {
                    trace!("displacing {} entries to open a slot near {home}", path.len() - 1);

                    for hop in path.windows(2) {
                        self.slots.swap(hop[0], hop[1]);
                    }

                    path[path.len() - 1]
                }
                None => return Err(Exhausted { key, value }),
            },
        };

        self.slots[target] = Slot::Occupied(Bucket { key, value, home });
        Ok(target)
    }

    // Removes `key` from the table, resetting its slot to empty.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hashable + Eq + ?Sized,
    {
        let i = self.find(key)?;
        self.slots[i]
            .take()
            .map(|bucket| (bucket.key, bucket.value))
    }

    // Replaces the slot array with one of `capacity` slots, re-placing every entry.
    //
    // Home indices depend on the capacity, so every key is hashed again. If an
    // entry does not fit, the target capacity is doubled and the rehash starts
    // over. Returns the capacity the table ended up with.
    pub fn resize(&mut self, capacity: usize) -> usize {
        let pending = self.drain();
        self.rehash(capacity, pending)
    }

    // Resizes the table to at least `capacity` slots and places an entry that
    // was rejected by `insert`.
    //
    // The rehash keeps doubling until every entry fits, the rejected one
    // included, so the entry is always placed.
    pub fn grow_with(&mut self, capacity: usize, rejected: Exhausted<K, V>) -> usize {
        let mut pending = self.drain();
        pending.push((rejected.key, rejected.value));
        self.rehash(capacity, pending)
    }

    fn rehash(&mut self, capacity: usize, mut pending: Vec<(K, V)>) -> usize {
        let mut capacity = capacity.max(MIN_CAPACITY);

        for _ in 0..MAX_REHASH_ATTEMPTS {
            let mut table = Table::new(capacity, self.mode);
            let mut entries = pending.into_iter();

            let rejected = entries
                .by_ref()
                .find_map(|(key, value)| table.insert(key, value).err());

            match rejected {
                None => {
                    *self = table;
                    return capacity;
                }
                Some(Exhausted { key, value }) => {
                    warn!("rehash into {capacity} slots saturated a hop window, doubling");

                    pending = table.drain();
                    pending.push((key, value));
                    pending.extend(entries);
                    capacity = capacity.checked_mul(2).expect("capacity overflow");
                }
            }
        }

        panic!(
            "hop window still saturated after {MAX_REHASH_ATTEMPTS} doublings, \
             more than {HOP_RANGE} keys share the same hash"
        );
    }

    // Checks that every entry sits within the hop window of its home index and
    // that the recorded home matches the hash of its key.
    //
    // Returns the number of occupied slots.
    pub fn verify(&self) -> Result<usize, String> {
        let mut occupied = 0;

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(bucket) = slot.bucket() else {
                continue;
            };

            let home = self.mode.home_index(&bucket.key, self.capacity());
            if bucket.home != home {
                return Err(format!(
                    "slot {i} records home {} but its key hashes to {home}",
                    bucket.home
                ));
            }

            if distance(home, i, self.capacity()) >= HOP_RANGE {
                return Err(format!("slot {i} is outside the window of {home}"));
            }

            occupied += 1;
        }

        Ok(occupied)
    }
}

// An iterator over the occupied slots of a table.
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .by_ref()
            .find_map(Slot::bucket)
            .map(|bucket| (&bucket.key, &bucket.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
        }
    }
}

// An owning iterator over the entries of a table.
pub struct IntoIter<K, V> {
    slots: vec::IntoIter<Slot<K, V>>,
}

impl<K, V> IntoIterator for Table<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .by_ref()
            .find_map(|mut slot| slot.take())
            .map(|bucket| (bucket.key, bucket.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}
