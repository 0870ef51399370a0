//! # wo-api
//!
//! HTTP API for Parada OS: packages, sub-packages, work orders, logs, and
//! the spreadsheet import endpoint. Identity is delegated to an upstream
//! proxy; handlers only require a trusted `x-user-id` header.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

use sqlx::PgPool;
use wo_core::config::ImportConfig;

pub use error::{ApiError, ApiResult};
pub use routes::router;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub import: ImportConfig,
}
