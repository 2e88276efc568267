//! CORS and request logging middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Origin allow-list shared across requests.
#[derive(Clone, Debug)]
pub struct CorsState {
    origins: Arc<Vec<HeaderValue>>,
}

impl CorsState {
    /// Build from configured origins. Values that are not valid header
    /// values are skipped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .filter_map(|origin| {
                let origin = origin.as_ref();
                match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                }
            })
            .collect();

        Self {
            origins: Arc::new(origins),
        }
    }

    /// Origin to advertise for a request.
    ///
    /// Echoes the request origin when it is allowed, otherwise the first
    /// configured origin.
    pub fn allow_origin(&self, request_origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if let Some(origin) = request_origin {
            if self.origins.contains(origin) {
                return Some(origin.clone());
            }
        }
        self.origins.first().cloned()
    }

    fn apply(&self, request_origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        if let Some(origin) = self.allow_origin(request_origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}

/// CORS middleware.
///
/// Answers preflight requests directly and adds CORS headers to every
/// other response, errors included.
pub async fn cors_middleware(
    State(cors): State<CorsState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    if request.method() == Method::OPTIONS {
        debug!(origin = ?origin, "CORS preflight");
        let mut response = StatusCode::NO_CONTENT.into_response();
        cors.apply(origin.as_ref(), response.headers_mut());
        response.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        return response;
    }

    let mut response = next.run(request).await;
    cors.apply(origin.as_ref(), response.headers_mut());
    response
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}
