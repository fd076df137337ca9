//! Note API endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use taskdesk_core::note::{NewNote, Note, NotePatch, NoteQuery, NoteQueryParams};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::routes::task::DeleteResponse;
use crate::state::AppState;

/// GET /api/notes - List notes, optionally searched and sorted
async fn list_notes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NoteQueryParams>,
) -> Json<Vec<Note>> {
    let query = NoteQuery::from_params(&params);
    Json(state.desk().list_notes(&query).await)
}

/// POST /api/notes - Create a note
async fn create_note(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewNote>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let created = state.desk().create_note(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.desk().get_note(id).await?))
}

async fn update_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ValidJson(req): ValidJson<NotePatch>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.desk().update_note(id, req).await?))
}

async fn delete_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.desk().delete_note(id).await?;
    Ok(Json(DeleteResponse {
        id,
        message: format!("Note {} deleted successfully", id),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/{id}",
            get(get_note)
                .put(update_note)
                .patch(update_note)
                .delete(delete_note),
        )
}
