//! Waitlist registration store.
//!
//! Keeps one entry per normalized email address and enforces the
//! signup rules (valid syntax, explicit consent, no duplicates) on top of
//! an interchangeable storage backend:
//! - a single JSON document on local disk
//! - a Redis hash on a managed key-value service
//! - process memory, for tests and throwaway runs

pub mod backend;
mod email;
mod error;
mod store;
mod types;

pub use backend::{FileBackend, MemoryBackend, RedisBackend, WaitlistBackend};
pub use email::{is_valid_email, normalize_email, MAX_EMAIL_LEN};
pub use error::{RegistrationError, StoreError};
pub use store::{RegistrationStore, StorageMode};
pub use types::*;
