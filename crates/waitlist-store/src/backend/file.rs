//! Local JSON document backend.

use super::WaitlistBackend;
use crate::error::StoreError;
use crate::types::Entry;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Keeps the whole waitlist as one pretty-printed JSON array on disk.
///
/// Every operation reads the full document and every write rewrites it.
/// The lock serializes read-modify-write cycles within this process only;
/// two processes sharing the file can still lose updates, so this backend
/// is meant for local development.
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    /// Create a backend for the document at `path`.
    ///
    /// The file and its parent directories are created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries, creating an empty document if none exists.
    async fn load(&self) -> Result<Vec<Entry>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            info!(path = ?self.path, "Waitlist file not found, creating empty document");
            self.save(&[]).await?;
            return Ok(Vec::new());
        }

        let data = fs::read(&self.path).await?;
        let entries: Vec<Entry> = serde_json::from_slice(&data)?;

        debug!(path = ?self.path, count = entries.len(), "Loaded waitlist document");
        Ok(entries)
    }

    /// Rewrite the document via a temp file and rename.
    async fn save(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(entries)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = ?self.path, count = entries.len(), "Saved waitlist document");
        Ok(())
    }
}

#[async_trait]
impl WaitlistBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    #[instrument(skip(self))]
    async fn get(&self, email: &str) -> Result<Option<Entry>, StoreError> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;
        Ok(entries.into_iter().find(|e| e.email == email))
    }

    #[instrument(skip(self, entry), fields(email = %entry.email))]
    async fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        match entries.iter_mut().find(|e| e.email == entry.email) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }

        self.save(&entries).await
    }

    #[instrument(skip(self, entry), fields(email = %entry.email))]
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        if entries.iter().any(|e| e.email == entry.email) {
            return Ok(false);
        }

        entries.push(entry.clone());
        self.save(&entries).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete(&self, email: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        let before = entries.len();
        entries.retain(|e| e.email != email);

        if entries.len() == before {
            return Ok(false);
        }

        self.save(&entries).await?;
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len() as u64)
    }
}
