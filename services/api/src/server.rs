use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryClientRepository};
use crate::routes::with_client_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cabinet_clients::clients::{AutoSaver, ClientService};
use cabinet_clients::config::AppConfig;
use cabinet_clients::error::AppError;
use cabinet_clients::telemetry;
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

    let repository = Arc::new(InMemoryClientRepository::default());
    let client_service = Arc::new(ClientService::new(repository));
    let auto_saver = Arc::new(AutoSaver::new(
        client_service.clone(),
        config.autosave.debounce,
    ));

    let app = with_client_routes(client_service, auto_saver)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        debounce_ms = config.autosave.debounce.as_millis() as u64,
        "cabinet client service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
