//! Route handlers

pub mod category;
pub mod health;
pub mod note;
pub mod stats;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Every REST route, without middleware
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(task::router())
        .merge(note::router())
        .merge(category::router())
        .merge(stats::router())
}
