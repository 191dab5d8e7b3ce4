use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use campus_placement::config::AppConfig;
use campus_placement::error::AppError;
use campus_placement::placements::applications::PlacementService;
use campus_placement::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_data, AppState, InMemoryPlacementRepository, LoggingNoticePublisher,
};
use crate::routes::with_portal_routes;

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

    let repository = Arc::new(InMemoryPlacementRepository::default());
    if args.seed_demo {
        seed_demo_data(&repository);
        info!("seeded demo placement season");
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        repository: repository.clone(),
    };

    let notices = Arc::new(LoggingNoticePublisher::default());
    let placement_service = Arc::new(PlacementService::new(repository, notices));

    let app = with_portal_routes(placement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus placement engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
