use crate::error::Result;

/// Durable storage for named blobs.
///
/// `read` returns `Ok(None)` for a key that was never written.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
