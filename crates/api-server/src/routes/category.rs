//! Category API endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use taskdesk_core::category::{Category, CategoryPatch, NewCategory};

use crate::error::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeleteResponse {
    pub id: u64,
    pub message: String,
    /// Tasks that lost their reference to the deleted category
    pub detached_tasks: usize,
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.desk().list_categories().await)
}

async fn create_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let created = state.desk().create_category(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.desk().get_category(id).await?))
}

async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ValidJson(req): ValidJson<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.desk().update_category(id, req).await?))
}

/// DELETE /api/categories/{id} - Delete a category and detach its tasks
async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<CategoryDeleteResponse>, ApiError> {
    let removal = state.desk().delete_category(id).await?;
    Ok(Json(CategoryDeleteResponse {
        id,
        message: format!("Category {} deleted successfully", removal.category.name),
        detached_tasks: removal.detached_tasks,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, Router};
    use serde_json::json;

    use crate::routes::test_support::{memory_state, send};

    fn app() -> Router {
        crate::routes::router().with_state(memory_state())
    }

    #[tokio::test]
    async fn create_assigns_color_when_missing() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/categories",
            Some(json!({ "name": "Hobbies" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Hobbies");
        let color = body["color"].as_str().unwrap();
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let app = app();
        send(&app, "POST", "/api/categories", Some(json!({ "name": "Work" }))).await;

        let (status, body) =
            send(&app, "POST", "/api/categories", Some(json!({ "name": "work" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!(["Category 'work' already exists"]));

        let (status, _) = send(&app, "POST", "/api/categories", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_colors_are_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({ "name": "Hobbies", "color": "not a colour" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(
            body["details"],
            json!(["Category color must be a hex value like #3b82f6"])
        );

        let (_, created) =
            send(&app, "POST", "/api/categories", Some(json!({ "name": "Hobbies" }))).await;
        let uri = format!("/api/categories/{}", created["id"]);
        let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "color": "#zzzzzz" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["color"], created["color"]);
    }

    #[tokio::test]
    async fn update_and_get() {
        let app = app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({ "name": "Home", "color": "#10b981" })),
        )
        .await;
        let uri = format!("/api/categories/{}", created["id"]);

        let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "color": "#000000" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Home");
        assert_eq!(updated["color"], "#000000");

        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, updated);

        let (status, _) = send(&app, "PUT", "/api/categories/77", Some(json!({ "name": "x" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_category_detaches_tasks() {
        let app = app();
        let (_, category) =
            send(&app, "POST", "/api/categories", Some(json!({ "name": "Errands" }))).await;
        let (_, task) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Post office", "categoryId": category["id"] })),
        )
        .await;

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/api/categories/{}", category["id"]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detachedTasks"], 1);

        let (status, fetched) =
            send(&app, "GET", &format!("/api/tasks/{}", task["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(fetched["categoryId"].is_null());

        let (status, listed) = send(&app, "GET", "/api/tasks?category=none", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/categories/{}", category["id"]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn task_with_unknown_category_is_rejected() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Orphan", "categoryId": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!(["Category 12 does not exist"]));
    }
}
