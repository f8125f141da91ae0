use crate::cli::ServeArgs;
use crate::demo::sample_catalog;
use crate::infra::{AppState, InMemoryCatalog, InMemoryResultStore};
use crate::routes::with_calculation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use profile_matching::config::AppConfig;
use profile_matching::error::AppError;
use profile_matching::matching::{load_catalog_path, ProfileMatchingService};
use profile_matching::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.catalog_path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            let catalog = load_catalog_path(path)?;
            info!(
                path = %path.display(),
                job_positions = catalog.job_positions.len(),
                applicants = catalog.applicants.len(),
                "catalog loaded"
            );
            catalog
        }
        None => {
            warn!("no catalog configured, serving the built-in sample catalog");
            sample_catalog()
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(ProfileMatchingService::new(
        Arc::new(InMemoryCatalog::new(catalog)),
        Arc::new(InMemoryResultStore::default()),
        config.engine.clone(),
    ));

    let app = with_calculation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strict_bobot_sum = config.engine.strict_bobot_sum,
        "profile matching service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
