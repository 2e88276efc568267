//! Waitlist API - email signup service for the landing page.
//!
//! Exposes the registration store over HTTP:
//! - `GET /` health check
//! - `GET /waitlist` subscriber count
//! - `POST /waitlist` signup with consent
//! - `DELETE /waitlist/{email}` removal on request

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;
