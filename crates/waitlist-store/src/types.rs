//! Waitlist entry and request/result types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag recorded when a signup does not name one.
pub const DEFAULT_SOURCE: &str = "landing_page";

/// Recorded when the client address cannot be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// One waitlist registration.
///
/// Field order matches the on-disk layout of the local document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Opaque id assigned at creation (not a lookup key)
    pub id: Uuid,

    /// Normalized email address; the identity of the entry
    pub email: String,

    /// Always true for a stored entry
    pub consent: bool,

    /// When the user gave consent, as reported by the client
    pub consent_timestamp: String,

    /// Where the signup came from
    pub source: String,

    /// Best-effort client address
    pub ip_address: String,

    /// When the entry was stored
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Build a new entry for an already validated, normalized candidate.
    pub(crate) fn from_candidate(email: String, candidate: Candidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            consent: true,
            consent_timestamp: candidate.consent_timestamp.unwrap_or_else(now_timestamp),
            source: candidate
                .source
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            ip_address: candidate
                .ip_address
                .unwrap_or_else(|| UNKNOWN_IP.to_string()),
            created_at: Utc::now(),
        }
    }
}

/// A signup attempt as received from a caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub email: String,
    pub consent: bool,
    pub consent_timestamp: Option<String>,
    pub source: Option<String>,
    pub ip_address: Option<String>,
}

impl Candidate {
    /// Candidate with just an email and consent flag.
    pub fn new(email: impl Into<String>, consent: bool) -> Self {
        Self {
            email: email.into(),
            consent,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_consent_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.consent_timestamp = Some(timestamp.into());
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub id: Uuid,
    pub email: String,
}

/// Aggregate waitlist statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_subscribers: u64,
    /// True when backed by local storage rather than the remote store
    pub is_local: bool,
}

/// Current UTC time as an RFC 3339 string with a `Z` suffix.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
