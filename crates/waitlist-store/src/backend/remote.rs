//! Redis-backed storage for waitlist entries.

use super::WaitlistBackend;
use crate::error::StoreError;
use crate::types::Entry;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{info, instrument};

/// Stores the waitlist as a single Redis hash.
///
/// The hash is named after the configured table; each field is a
/// normalized email and each value the JSON-encoded entry. `HSETNX` gives
/// an atomic insert-if-absent and `HLEN` an exact count.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    table: String,
}

impl RedisBackend {
    /// Wrap an existing connection.
    pub fn new(conn: ConnectionManager, table: &str) -> Self {
        Self {
            conn,
            table: table.to_string(),
        }
    }

    /// Open a managed connection to `url` and use `table` as the hash key.
    pub async fn connect(url: &str, table: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let conn = client.get_connection_manager().await?;

        info!(table = %table, "Connected to Redis waitlist store");
        Ok(Self::new(conn, table))
    }

    /// Name of the Redis hash holding the entries.
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl WaitlistBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    #[instrument(skip(self))]
    async fn get(&self, email: &str) -> Result<Option<Entry>, StoreError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.hget(&self.table, email).await?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, entry), fields(email = %entry.email))]
    async fn put(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(entry)?;

        let _: () = conn.hset(&self.table, &entry.email, json).await?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(email = %entry.email))]
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(entry)?;

        let inserted: bool = conn.hset_nx(&self.table, &entry.email, json).await?;
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn delete(&self, email: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.hdel(&self.table, email).await?;
        Ok(removed > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.hlen(&self.table).await?;
        Ok(count)
    }
}
