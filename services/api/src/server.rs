use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCourseRepository};
use crate::routes::with_course_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gradebook::config::AppConfig;
use gradebook::courses::GradebookService;
use gradebook::error::AppError;
use gradebook::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let settings = config.grading.calculator_settings();
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        settings,
    };

    let repository = Arc::new(InMemoryCourseRepository::default());
    let gradebook_service = Arc::new(GradebookService::new(repository, settings));

    let app = with_course_routes(gradebook_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        complete_weight_threshold = settings.complete_weight_threshold,
        "gradebook service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
