use crate::cli::ServeArgs;
use crate::infra::{export_coordinator, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use impact_analyst::assessment::{AssessmentSession, AssessmentState};
use impact_analyst::config::AppConfig;
use impact_analyst::error::AppError;
use impact_analyst::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let assessment = AssessmentState::new(
        AssessmentSession::standard().into_shared(),
        export_coordinator(&config.export),
    );

    let app = with_assessment_routes(assessment)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        %addr,
        pdf_settle_ms = config.export.pdf_settle.as_millis() as u64,
        "impact analyst ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
