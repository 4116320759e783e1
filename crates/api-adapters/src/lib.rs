//! # api-adapters
//!
//! HTTP driving adapter. Request and response shapes live in [`dto`] and
//! the Prometheus registry in [`metrics`]; the axum router itself is
//! behind the `web-axum` feature.

pub mod dto;
pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod web;

pub use metrics::Metrics;

#[cfg(feature = "web-axum")]
pub use web::{router, ApiError, AppState, AuthUser, Ports, RouterOptions};
