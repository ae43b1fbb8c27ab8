use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLedgerRepository, InMemoryProgressNotifier};
use crate::routes::with_clearance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use civicflow::config::AppConfig;
use civicflow::error::AppError;
use civicflow::telemetry;
use civicflow::workflows::clearance::ClearanceWorkflowService;
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

    let repository = Arc::new(InMemoryLedgerRepository::default());
    let notifier = Arc::new(InMemoryProgressNotifier::default());
    let workflow_service = Arc::new(ClearanceWorkflowService::new(
        repository,
        notifier,
        config.catalogs.clone(),
    ));

    let app = with_clearance_routes(workflow_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "clearance workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
