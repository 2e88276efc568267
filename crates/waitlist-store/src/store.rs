//! Registration rules over a storage backend.

use crate::backend::WaitlistBackend;
use crate::email::{is_valid_email, normalize_email};
use crate::error::RegistrationError;
use crate::types::{Candidate, Entry, Registered, Stats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Where entries are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// JSON document on local disk
    #[default]
    Local,
    /// Managed Redis store
    Remote,
    /// Process memory only (lost on restart)
    Memory,
}

impl StorageMode {
    /// Whether the mode keeps data on this machine.
    pub fn is_local(self) -> bool {
        !matches!(self, StorageMode::Remote)
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageMode::Local => "local",
            StorageMode::Remote => "remote",
            StorageMode::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Waitlist registrations keyed by normalized email.
///
/// Holds no state of its own: every call goes to the backend, so results
/// always reflect what is persisted at call time.
#[derive(Clone)]
pub struct RegistrationStore {
    backend: Arc<dyn WaitlistBackend>,
    mode: StorageMode,
}

impl RegistrationStore {
    /// Create a store over an already constructed backend.
    pub fn new(backend: Arc<dyn WaitlistBackend>, mode: StorageMode) -> Self {
        info!(backend = backend.name(), %mode, "Registration store ready");
        Self { backend, mode }
    }

    /// Configured storage mode.
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Current subscriber count.
    pub async fn stats(&self) -> Result<Stats, RegistrationError> {
        let total_subscribers = self.backend.count().await.map_err(|e| {
            error!(backend = self.backend.name(), error = %e, "Failed to count entries");
            e
        })?;

        Ok(Stats {
            total_subscribers,
            is_local: self.mode.is_local(),
        })
    }

    /// Add a new email to the waitlist.
    ///
    /// Fails with `InvalidEmail`, then `ConsentRequired`, then
    /// `AlreadyRegistered`, checked in that order.
    #[instrument(skip(self, candidate), fields(source = ?candidate.source))]
    pub async fn register(&self, candidate: Candidate) -> Result<Registered, RegistrationError> {
        let email = normalize_email(&candidate.email);

        if !is_valid_email(&email) {
            return Err(RegistrationError::InvalidEmail);
        }

        if !candidate.consent {
            return Err(RegistrationError::ConsentRequired);
        }

        let entry = Entry::from_candidate(email.clone(), candidate);

        let inserted = self.backend.insert_if_absent(&entry).await.map_err(|e| {
            error!(backend = self.backend.name(), error = %e, "Failed to save entry");
            e
        })?;

        if !inserted {
            warn!(email = %email, "Duplicate waitlist signup rejected");
            return Err(RegistrationError::AlreadyRegistered(email));
        }

        info!(email = %email, id = %entry.id, "New waitlist signup");

        Ok(Registered {
            id: entry.id,
            email,
        })
    }

    /// Remove an email from the waitlist.
    ///
    /// Removing an address that is not present is an error (`NotFound`).
    #[instrument(skip(self))]
    pub async fn deregister(&self, email: &str) -> Result<String, RegistrationError> {
        let email = normalize_email(email);

        if !is_valid_email(&email) {
            return Err(RegistrationError::InvalidEmail);
        }

        let removed = self.backend.delete(&email).await.map_err(|e| {
            error!(backend = self.backend.name(), error = %e, "Failed to remove entry");
            e
        })?;

        if !removed {
            return Err(RegistrationError::NotFound(email));
        }

        info!(email = %email, "Unsubscribed from waitlist");
        Ok(email)
    }

    /// Look up an entry by email (normalized before lookup).
    pub async fn find(&self, email: &str) -> Result<Option<Entry>, RegistrationError> {
        Ok(self.backend.get(&normalize_email(email)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, MemoryBackend};
    use crate::error::StoreError;
    use async_trait::async_trait;

    fn memory_store() -> RegistrationStore {
        RegistrationStore::new(Arc::new(MemoryBackend::new()), StorageMode::Memory)
    }

    /// Backend whose every operation fails.
    struct BrokenBackend;

    #[async_trait]
    impl WaitlistBackend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn get(&self, _email: &str) -> Result<Option<Entry>, StoreError> {
            Err(broken())
        }

        async fn put(&self, _entry: &Entry) -> Result<(), StoreError> {
            Err(broken())
        }

        async fn delete(&self, _email: &str) -> Result<bool, StoreError> {
            Err(broken())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Err(broken())
        }
    }

    fn broken() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "backend unreachable",
        ))
    }

    #[tokio::test]
    async fn test_register_increments_count() {
        let store = memory_store();

        let registered = store
            .register(Candidate::new("alice@example.com", true))
            .await
            .unwrap();
        assert_eq!(registered.email, "alice@example.com");

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_subscribers, 1);
        assert!(stats.is_local);
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let store = memory_store();

        store
            .register(Candidate::new("  Alice@Example.COM ", true))
            .await
            .unwrap();

        let entry = store.find("alice@example.com").await.unwrap().unwrap();
        assert_eq!(entry.email, "alice@example.com");
        assert!(entry.consent);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected_any_case() {
        let store = memory_store();

        let first = store
            .register(Candidate::new("alice@example.com", true))
            .await
            .unwrap();

        let err = store
            .register(Candidate::new("ALICE@example.com", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::AlreadyRegistered(ref e) if e == "alice@example.com"));

        // Storage unchanged
        assert_eq!(store.stats().await.unwrap().total_subscribers, 1);
        let entry = store.find("alice@example.com").await.unwrap().unwrap();
        assert_eq!(entry.id, first.id);
    }

    #[tokio::test]
    async fn test_consent_required() {
        let store = memory_store();

        let err = store
            .register(Candidate::new("alice@example.com", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ConsentRequired));
        assert_eq!(store.stats().await.unwrap().total_subscribers, 0);
    }

    #[tokio::test]
    async fn test_invalid_email_checked_before_consent() {
        let store = memory_store();

        let err = store
            .register(Candidate::new("not-an-email", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidEmail));

        let err = store
            .register(Candidate::new("not-an-email", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidEmail));
        assert_eq!(store.stats().await.unwrap().total_subscribers, 0);
    }

    #[tokio::test]
    async fn test_deregister_is_case_insensitive() {
        let store = memory_store();

        store
            .register(Candidate::new("A@B.com", true))
            .await
            .unwrap();

        let removed = store.deregister("a@b.com").await.unwrap();
        assert_eq!(removed, "a@b.com");
        assert_eq!(store.stats().await.unwrap().total_subscribers, 0);
    }

    #[tokio::test]
    async fn test_deregister_unknown_email() {
        let store = memory_store();

        let err = store.deregister("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deregister_invalid_email() {
        let store = memory_store();

        let err = store.deregister("nope").await.unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidEmail));
    }

    #[tokio::test]
    async fn test_register_deregister_cycle() {
        let store = memory_store();

        for _ in 0..2 {
            store
                .register(Candidate::new("cycle@example.com", true))
                .await
                .unwrap();
            assert_eq!(store.stats().await.unwrap().total_subscribers, 1);

            store.deregister("cycle@example.com").await.unwrap();
            assert_eq!(store.stats().await.unwrap().total_subscribers, 0);
        }

        let err = store.deregister("cycle@example.com").await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_storage_faults_surface_as_storage_errors() {
        let store = RegistrationStore::new(Arc::new(BrokenBackend), StorageMode::Remote);

        let err = store.stats().await.unwrap_err();
        assert!(matches!(err, RegistrationError::Storage(_)));

        let err = store
            .register(Candidate::new("alice@example.com", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Storage(_)));

        let err = store.deregister("alice@example.com").await.unwrap_err();
        assert!(matches!(err, RegistrationError::Storage(_)));
    }

    #[tokio::test]
    async fn test_validation_precedes_storage_access() {
        let store = RegistrationStore::new(Arc::new(BrokenBackend), StorageMode::Remote);

        let err = store
            .register(Candidate::new("alice@example.com", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ConsentRequired));
    }

    #[tokio::test]
    async fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waitlist.json");

        let store = RegistrationStore::new(Arc::new(FileBackend::new(&path)), StorageMode::Local);
        store
            .register(Candidate::new("persist@example.com", true).with_source("test"))
            .await
            .unwrap();

        let reopened =
            RegistrationStore::new(Arc::new(FileBackend::new(&path)), StorageMode::Local);
        let entry = reopened.find("persist@example.com").await.unwrap().unwrap();
        assert_eq!(entry.source, "test");
        assert_eq!(reopened.stats().await.unwrap().total_subscribers, 1);
    }

    #[test]
    fn test_storage_mode_serialization() {
        assert_eq!(serde_json::to_string(&StorageMode::Local).unwrap(), "\"local\"");
        let mode: StorageMode = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(mode, StorageMode::Remote);
        assert!(!StorageMode::Remote.is_local());
        assert!(StorageMode::Memory.is_local());
        assert_eq!(StorageMode::Remote.to_string(), "remote");
    }
}
