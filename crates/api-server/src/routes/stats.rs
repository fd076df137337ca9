//! Dashboard statistics endpoint

use axum::{extract::State, routing::get, Json, Router};

use taskdesk_core::DeskStats;

use crate::state::AppState;

/// GET /api/stats - Completion and breakdown figures, recomputed per call
async fn get_stats(State(state): State<AppState>) -> Json<DeskStats> {
    Json(state.desk().stats().await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(get_stats))
}
