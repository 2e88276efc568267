//! Waitlist store errors.

use thiserror::Error;

/// Faults raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Outcome of a rejected registration or removal.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Consent must be given to join the waitlist")]
    ConsentRequired,

    #[error("This email is already on the waitlist.")]
    AlreadyRegistered(String),

    #[error("Email not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
