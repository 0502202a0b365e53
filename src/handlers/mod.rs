//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.
//! Operator authorization happens upstream; these handlers only decode
//! requests, call the service layer, and encode results.

pub mod contests;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/contests", contests::routes())
}
