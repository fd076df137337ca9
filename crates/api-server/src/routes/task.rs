//! Task API endpoints
//!
//! RESTful API for task CRUD operations plus filtered listing and bulk
//! deletion.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use taskdesk_core::task::{NewTask, Task, TaskPatch, TaskQuery, TaskQueryParams};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Bulk delete body: `{"ids": [..]}` or a bare id array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BulkDeleteRequest {
    Wrapped { ids: Vec<u64> },
    Bare(Vec<u64>),
}

impl BulkDeleteRequest {
    fn into_ids(self) -> Vec<u64> {
        match self {
            Self::Wrapped { ids } | Self::Bare(ids) => ids,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted_count: usize,
    pub deleted: Vec<u64>,
    pub not_found: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: u64,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List tasks, filtered and sorted by the query string
async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TaskQueryParams>,
) -> Json<Vec<Task>> {
    let query = TaskQuery::from_params(&params);
    Json(state.desk().list_tasks(&query).await)
}

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let created = state.desk().create_task(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.desk().get_task(id).await?))
}

/// PUT/PATCH /api/tasks/{id} - Merge the provided fields into a task
async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ValidJson(req): ValidJson<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.desk().update_task(id, req).await?))
}

/// DELETE /api/tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.desk().delete_task(id).await?;
    Ok(Json(DeleteResponse {
        id,
        message: format!("Task {} deleted successfully", id),
    }))
}

/// DELETE /api/tasks/bulk - Delete several tasks at once
async fn bulk_delete_tasks(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let report = state.desk().bulk_delete_tasks(&req.into_ids()).await?;

    Ok(Json(BulkDeleteResponse {
        message: format!(
            "Deleted {} tasks, {} not found",
            report.deleted_count(),
            report.not_found.len()
        ),
        deleted_count: report.deleted_count(),
        deleted: report.deleted,
        not_found: report.not_found,
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/bulk", delete(bulk_delete_tasks))
        .route(
            "/api/tasks/{id}",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
}
