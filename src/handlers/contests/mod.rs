//! Contest management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Contest routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Contest CRUD
        .route("/", get(handler::list_contests))
        .route("/", post(handler::create_contest))
        .route("/{id}", get(handler::get_contest))
        .route("/{id}", put(handler::update_contest))
        .route("/{id}", delete(handler::delete_contest))
        // Identifier listings for the add/edit form
        .route("/options", get(handler::roster_options))
}
