// A key-value pair stored in the table.
#[derive(Clone)]
pub struct Bucket<K, V> {
    pub key: K,
    pub value: V,
    // The slot the key hashed to before collision resolution.
    pub home: usize,
}

// A single cell of the table.
//
// Removal resets a slot to `Empty` directly, there is no tombstone state.
#[derive(Clone)]
pub enum Slot<K, V> {
    Empty,
    Occupied(Bucket<K, V>),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub fn bucket(&self) -> Option<&Bucket<K, V>> {
        match self {
            Slot::Occupied(bucket) => Some(bucket),
            Slot::Empty => None,
        }
    }

    #[inline]
    pub fn bucket_mut(&mut self) -> Option<&mut Bucket<K, V>> {
        match self {
            Slot::Occupied(bucket) => Some(bucket),
            Slot::Empty => None,
        }
    }

    // Returns the home index of the occupying entry.
    #[inline]
    pub fn home(&self) -> Option<usize> {
        self.bucket().map(|bucket| bucket.home)
    }

    // Empties the slot, returning the entry it held.
    #[inline]
    pub fn take(&mut self) -> Option<Bucket<K, V>> {
        match std::mem::take(self) {
            Slot::Occupied(bucket) => Some(bucket),
            Slot::Empty => None,
        }
    }
}
