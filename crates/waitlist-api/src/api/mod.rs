//! HTTP API for the waitlist.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{cors_middleware, logging_middleware, CorsState};
pub use types::*;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use waitlist_store::RegistrationStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Waitlist registrations
    pub store: RegistrationStore,
    /// Name reported by the health check
    pub service_name: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: RegistrationStore, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            service_name: service_name.into(),
        }
    }
}

/// Create the API router.
///
/// Unknown paths and unsupported methods on known paths both get a JSON 404.
pub fn create_router(state: AppState, cors: CorsState) -> Router {
    Router::new()
        .route("/", get(handlers::health).fallback(handlers::not_found))
        .route(
            "/waitlist",
            get(handlers::stats)
                .post(handlers::subscribe)
                .fallback(handlers::not_found),
        )
        .route(
            "/waitlist/:email",
            delete(handlers::unsubscribe).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn_with_state(cors, cors_middleware))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
