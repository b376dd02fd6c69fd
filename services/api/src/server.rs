use crate::cli::ServeArgs;
use crate::infra::{AppState, FileResponseStore};
use crate::routes::with_collection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use moral_weights::config::AppConfig;
use moral_weights::error::AppError;
use moral_weights::survey::collection::CollectionService;
use moral_weights::telemetry;
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

    let store = Arc::new(FileResponseStore::new(config.collection.data_file.clone()));
    let collection_service = Arc::new(CollectionService::new(
        store,
        config.collection.admin_key.clone(),
    ));

    let app = with_collection_routes(collection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "moral weights collector ready");

    axum::serve(listener, app).await?;
    Ok(())
}
