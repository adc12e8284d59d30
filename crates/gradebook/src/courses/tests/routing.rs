use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::courses::router::{grade_handler, list_handler, project_handler, save_handler};
use crate::courses::{CourseSnapshot, GradebookService};
use crate::engine::CalculatorSettings;

fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn save_route_stores_course() {
    let (service, repository) = build_service();
    let router = course_router_with_service(service);

    let response = router
        .oneshot(json_request("PUT", "/api/v1/courses/math-101", &snapshot()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("course_id"), Some(&json!("math-101")));
    assert_eq!(payload.get("assignment_count"), Some(&json!(4)));
    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .contains_key(&course_id()));
}

#[tokio::test]
async fn grade_route_returns_weighted_projection() {
    let (service, _) = build_service();
    let router = course_router_with_service(service);

    let save = router
        .clone()
        .oneshot(json_request("PUT", "/api/v1/courses/math-101", &snapshot()))
        .await
        .expect("save executes");
    assert_eq!(save.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/v1/courses/math-101/grade")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("mode"), Some(&json!("weighted")));
    let average = payload
        .get("weighted_average")
        .and_then(Value::as_f64)
        .expect("weighted average present");
    assert_close(average, 85.0);
    assert_eq!(
        payload
            .pointer("/category_details/project/is_future")
            .and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        payload
            .pointer("/category_details/final/is_future")
            .and_then(Value::as_bool),
        Some(false)
    );
}

#[tokio::test]
async fn grade_handler_returns_not_found_for_unknown_course() {
    let (service, _) = build_service();

    let response = grade_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path("missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("course_id"), Some(&json!("missing")));
    assert_eq!(payload.get("error"), Some(&json!("course not found")));
}

#[tokio::test]
async fn save_handler_returns_unprocessable_for_invalid_config() {
    let (service, _) = build_service();
    let mut snapshot = snapshot();
    if let Some(config) = snapshot.config.as_mut() {
        config.weights.insert("homework".to_string(), 2.0);
    }

    let response = save_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path("math-101".to_string()),
        axum::Json(snapshot),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("homework"));
}

#[tokio::test]
async fn save_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(GradebookService::new(
        Arc::new(UnavailableRepository),
        CalculatorSettings::default(),
    ));

    let response = save_handler::<UnavailableRepository>(
        State(service),
        Path("math-101".to_string()),
        axum::Json(snapshot()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn project_handler_scores_unsaved_snapshot() {
    let (service, repository) = build_service();
    let snapshot = CourseSnapshot {
        assignments: assignments(),
        config: None,
    };

    let response =
        project_handler::<MemoryRepository>(State(Arc::new(service)), axum::Json(snapshot)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("mode"), Some(&json!("simple")));
    assert_eq!(payload.get("graded_count"), Some(&json!(3)));
    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
}

#[tokio::test]
async fn list_handler_returns_saved_course_ids() {
    let (service, _) = build_service();
    service
        .save_course(course_id(), assignments(), None)
        .expect("save succeeds");

    let response = list_handler::<MemoryRepository>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "courses": ["math-101"] }));
}
