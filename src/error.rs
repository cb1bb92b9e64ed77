use thiserror::Error;

/// The error type for [`Dictionary`](crate::Dictionary) and
/// [`SnapshotIterator`](crate::SnapshotIterator) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The key has no entry within its hop window.
    #[error("key not found")]
    KeyNotFound,
    /// The iterator cursor has moved past the last entry.
    #[error("iterator exhausted")]
    IteratorExhausted,
}
