use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::repository::{CourseId, CourseRepository, RepositoryError};
use super::service::{CourseSnapshot, GradebookService, GradebookServiceError};

/// Router builder exposing course storage and grade projection endpoints.
pub fn course_router<R>(service: Arc<GradebookService<R>>) -> Router
where
    R: CourseRepository + 'static,
{
    Router::new()
        .route("/api/v1/courses", get(list_handler::<R>))
        .route("/api/v1/courses/:course_id", put(save_handler::<R>))
        .route("/api/v1/courses/:course_id/grade", get(grade_handler::<R>))
        .route("/api/v1/grades/project", post(project_handler::<R>))
        .with_state(service)
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(course_id): Path<String>,
    axum::Json(snapshot): axum::Json<CourseSnapshot>,
) -> Response
where
    R: CourseRepository + 'static,
{
    match service.save_course(CourseId(course_id), snapshot.assignments, snapshot.config) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn grade_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(course_id): Path<String>,
) -> Response
where
    R: CourseRepository + 'static,
{
    let id = CourseId(course_id);
    match service.project(&id) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(GradebookServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "course_id": id.0,
                "error": "course not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn project_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    axum::Json(snapshot): axum::Json<CourseSnapshot>,
) -> Response
where
    R: CourseRepository + 'static,
{
    match service.project_snapshot(&snapshot.assignments, snapshot.config.as_ref()) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<GradebookService<R>>>) -> Response
where
    R: CourseRepository + 'static,
{
    match service.courses() {
        Ok(courses) => {
            let ids: Vec<String> = courses.into_iter().map(|id| id.0).collect();
            (StatusCode::OK, axum::Json(json!({ "courses": ids }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: GradebookServiceError) -> Response {
    let status = match &error {
        GradebookServiceError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GradebookServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        GradebookServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
