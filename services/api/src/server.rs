use crate::cli::ServeArgs;
use crate::infra::{load_store, AppState};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use vacancy_match::config::AppConfig;
use vacancy_match::error::AppError;
use vacancy_match::matching::MatchingService;
use vacancy_match::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.data_dir.take() {
        config.snapshot_dir = Some(dir);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.snapshot_dir.is_none() {
        warn!("MATCH_DATA_DIR not set; serving an empty candidate pool");
    }
    let store = Arc::new(load_store(config.snapshot_dir.as_deref())?);
    let matching_service = Arc::new(MatchingService::new(
        store.clone(),
        store,
        config.matching.clone(),
    )?);

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        deadline_ms = config.matching.deadline_ms,
        max_limit = config.matching.max_limit,
        "vacancy matching service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
