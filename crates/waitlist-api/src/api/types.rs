//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to join the waitlist.
///
/// Missing `email` or `consent` fall back to values that fail validation,
/// so the caller gets the specific validation message instead of a
/// generic parse error.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub consent: bool,

    /// When consent was given; server time if omitted
    pub consent_timestamp: Option<String>,

    /// Signup origin tag; `landing_page` if omitted
    pub source: Option<String>,
}

/// Response after a successful signup.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    pub id: Option<String>,
}

/// Response after removing an email.
#[derive(Debug, Serialize)]
pub struct UnsubscribeResponse {
    pub success: bool,
    pub message: String,
}

/// Waitlist statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_subscribers: u64,
    pub status: String,
    pub is_local: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_request_defaults() {
        let request: SubscribeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.email.is_empty());
        assert!(!request.consent);
        assert!(request.consent_timestamp.is_none());
        assert!(request.source.is_none());
    }

    #[test]
    fn test_subscribe_request_full() {
        let request: SubscribeRequest = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "consent": true,
                "consent_timestamp": "2024-01-01T00:00:00Z",
                "source": "footer"
            }"#,
        )
        .unwrap();

        assert_eq!(request.email, "alice@example.com");
        assert!(request.consent);
        assert_eq!(request.source.as_deref(), Some("footer"));
    }

    #[test]
    fn test_subscribe_response_serialization() {
        let response = SubscribeResponse {
            success: true,
            message: "ok".into(),
            id: Some("abc".into()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"id\":\"abc\""));
    }
}
