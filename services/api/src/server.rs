use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_application_routes;
use autoquote::config::AppConfig;
use autoquote::error::AppError;
use autoquote::telemetry;
use autoquote::workflows::insurance::{
    InMemoryApplicationRepository, InsuranceApplicationService, QuoteEstimator,
};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let quotes = QuoteEstimator::from(&config.quote);
    let application_service = Arc::new(InsuranceApplicationService::new(repository, quotes));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_premium = config.quote.min_premium,
        max_premium = config.quote.max_premium,
        "auto insurance intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
