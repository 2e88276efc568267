//! HTTP request handlers.

use super::types::{
    HealthResponse, StatsResponse, SubscribeRequest, SubscribeResponse, UnsubscribeResponse,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    Json,
};
use std::net::SocketAddr;
use tracing::info;
use waitlist_store::{Candidate, UNKNOWN_IP};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service_name.to_string(),
    })
}

/// Waitlist statistics.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.store.stats().await?;

    Ok(Json(StatsResponse {
        total_subscribers: stats.total_subscribers,
        status: "ok".to_string(),
        is_local: stats.is_local,
    }))
}

/// Add an email to the waitlist.
///
/// The body is parsed as JSON whatever the `Content-Type` says.
pub async fn subscribe(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let request: SubscribeRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    let ip_address = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    info!(ip_address = %ip_address, "Waitlist signup request received");

    let mut candidate = Candidate::new(request.email, request.consent).with_ip_address(ip_address);
    candidate.consent_timestamp = request.consent_timestamp;
    candidate.source = request.source;

    let registered = state.store.register(candidate).await?;

    Ok(Json(SubscribeResponse {
        success: true,
        message: "You've been added to our waiting list!".to_string(),
        id: Some(registered.id.to_string()),
    }))
}

/// Remove an email from the waitlist.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UnsubscribeResponse>, ApiError> {
    state.store.deregister(&email).await?;

    Ok(Json(UnsubscribeResponse {
        success: true,
        message: "Email removed from waitlist".to_string(),
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Best-effort client address.
///
/// Prefers the first `X-Forwarded-For` hop, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_IP.to_string(),
    }
}
