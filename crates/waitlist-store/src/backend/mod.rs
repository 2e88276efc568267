//! Storage backends for waitlist entries.

mod file;
mod memory;
mod remote;

pub use self::file::FileBackend;
pub use self::memory::MemoryBackend;
pub use self::remote::RedisBackend;

use crate::error::StoreError;
use crate::types::Entry;
use async_trait::async_trait;

/// Persistent collection of entries keyed by normalized email.
///
/// Backends never treat a missing key as an error: absence is reported
/// through `Option`/`bool` return values.
#[async_trait]
pub trait WaitlistBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Look up an entry by normalized email.
    async fn get(&self, email: &str) -> Result<Option<Entry>, StoreError>;

    /// Store an entry, replacing any entry with the same email.
    async fn put(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Store an entry only if its email is not present yet.
    ///
    /// Returns `false` without writing when an entry already exists. The
    /// default is a plain read followed by a write and is not atomic;
    /// backends with a conditional write should override it.
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, StoreError> {
        if self.get(&entry.email).await?.is_some() {
            return Ok(false);
        }
        self.put(entry).await?;
        Ok(true)
    }

    /// Remove an entry. Returns whether anything was removed.
    async fn delete(&self, email: &str) -> Result<bool, StoreError>;

    /// Exact number of stored entries.
    async fn count(&self) -> Result<u64, StoreError>;
}
