use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use gradebook::courses::{
    course_router, CourseRepository, GradeProjection, GradeProjector, GradebookImporter,
    GradebookService,
};
use gradebook::engine::{
    ConfigWarning, CourseConfig, GradeReportSummary, SimpleAverageSummary, StandardPolicyEngine,
};
use gradebook::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Gradebook CSV export plus an optional course config, scored without storing.
#[derive(Debug, Deserialize)]
pub(crate) struct GradeImportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) config: Option<CourseConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeImportResponse {
    pub(crate) assignment_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) warnings: Vec<ConfigWarning>,
    pub(crate) summary: ProjectionSummary,
    pub(crate) projection: GradeProjection,
}

/// Display-ready rendering of a projection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub(crate) enum ProjectionSummary {
    Weighted(GradeReportSummary),
    Simple(SimpleAverageSummary),
}

impl From<&GradeProjection> for ProjectionSummary {
    fn from(projection: &GradeProjection) -> Self {
        match projection {
            GradeProjection::Weighted(report) => Self::Weighted(report.summary()),
            GradeProjection::Simple(simple) => Self::Simple(simple.summary()),
        }
    }
}

pub(crate) fn with_course_routes<R>(service: Arc<GradebookService<R>>) -> axum::Router
where
    R: CourseRepository + 'static,
{
    course_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/grades/import",
            axum::routing::post(grade_import_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn grade_import_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<GradeImportRequest>,
) -> Result<Json<GradeImportResponse>, AppError> {
    let GradeImportRequest { csv, config } = payload;

    let assignments = GradebookImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let config = config.map(GradebookImporter::align_config);
    let warnings = match &config {
        Some(config) => config.validate()?,
        None => Vec::new(),
    };

    let projector = GradeProjector::new(StandardPolicyEngine::new(), state.settings);
    let projection = projector.project(&assignments, config.as_ref())?;

    Ok(Json(GradeImportResponse {
        assignment_count: assignments.len(),
        warnings,
        summary: ProjectionSummary::from(&projection),
        projection,
    }))
}
