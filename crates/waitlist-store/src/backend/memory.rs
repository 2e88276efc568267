//! In-memory backend.

use super::WaitlistBackend;
use crate::error::StoreError;
use crate::types::Entry;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Non-persistent backend for tests or when durability is not needed.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitlistBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, email: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries.read().await.get(email).cloned())
    }

    async fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(entry.email.clone(), entry.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.email) {
            debug!(email = %entry.email, "Memory backend: entry already present");
            return Ok(false);
        }
        entries.insert(entry.email.clone(), entry.clone());
        Ok(true)
    }

    async fn delete(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(email).is_some())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.entries.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;

    fn entry(email: &str) -> Entry {
        Entry::from_candidate(email.to_string(), Candidate::new(email, true))
    }

    #[tokio::test]
    async fn test_memory_backend_operations() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.count().await.unwrap(), 0);

        backend.put(&entry("alice@example.com")).await.unwrap();
        assert_eq!(backend.count().await.unwrap(), 1);
        assert!(backend.get("alice@example.com").await.unwrap().is_some());

        assert!(!backend.insert_if_absent(&entry("alice@example.com")).await.unwrap());
        assert!(backend.insert_if_absent(&entry("bob@example.com")).await.unwrap());
        assert_eq!(backend.count().await.unwrap(), 2);

        assert!(backend.delete("alice@example.com").await.unwrap());
        assert!(!backend.delete("alice@example.com").await.unwrap());
        assert_eq!(backend.count().await.unwrap(), 1);
    }
}
