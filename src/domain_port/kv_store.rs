/// Synchronous string key/value storage shared by everything in the process
/// (and, depending on the backend, by other processes too).
///
/// There are no transactions. Callers doing read-modify-write get
/// last-write-wins against any other writer of the same key.
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;
    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KvError {
    /// Quota exceeded, storage blocked, io failure.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backing medium itself could not be read.
    #[error("storage corrupt: {0}")]
    Corrupt(String),
}
