/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// The backing file exists but isn't a store document.
    #[error("store contents are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Serializing the store document failed.
    #[error("store encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}
