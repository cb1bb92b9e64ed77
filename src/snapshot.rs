use std::{iter, vec};

use crate::Error;

/// An external iterator over a frozen copy of a dictionary's entries.
///
/// This struct is created by [`Dictionary::iterator`](crate::Dictionary::iterator).
/// The entries are copied out of the table when the iterator is created, so
/// later changes to the dictionary are not observed. Create a new iterator to
/// see them.
///
/// # Examples
///
/// ```
/// use hopdict::{Dictionary, Error};
///
/// let mut dict = Dictionary::new();
/// dict.put("a", 1);
///
/// let mut iter = dict.iterator();
/// dict.put("b", 2);
///
/// assert!(iter.has_next());
/// assert_eq!(iter.current(), Ok((&"a", &1)));
/// assert_eq!(iter.advance(), Ok(&"a"));
/// assert!(!iter.has_next());
/// assert_eq!(iter.advance(), Err(Error::IteratorExhausted));
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotIterator<K, V> {
    entries: Vec<(K, V)>,
    cursor: usize,
}

impl<K, V> SnapshotIterator<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> SnapshotIterator<K, V> {
        SnapshotIterator { entries, cursor: 0 }
    }

    /// Returns `true` if the cursor is on an entry.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Returns the entry under the cursor.
    ///
    /// Fails with [`Error::IteratorExhausted`] once every entry has been visited.
    #[inline]
    pub fn current(&self) -> Result<(&K, &V), Error> {
        match self.entries.get(self.cursor) {
            Some((key, value)) => Ok((key, value)),
            None => Err(Error::IteratorExhausted),
        }
    }

    /// Moves the cursor past the current entry, returning its key.
    ///
    /// Fails with [`Error::IteratorExhausted`] once every entry has been visited.
    #[inline]
    pub fn advance(&mut self) -> Result<&K, Error> {
        let (key, _) = self
            .entries
            .get(self.cursor)
            .ok_or(Error::IteratorExhausted)?;

        self.cursor += 1;
        Ok(key)
    }

    /// Returns the number of entries not yet visited.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}

impl<K, V> IntoIterator for SnapshotIterator<K, V> {
    type Item = (K, V);
    type IntoIter = iter::Skip<vec::IntoIter<(K, V)>>;

    /// Consumes the snapshot, yielding the entries not yet visited.
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter().skip(self.cursor)
    }
}
