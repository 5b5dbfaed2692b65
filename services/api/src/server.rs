use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCandidateRepository, InMemorySessionStore};
use crate::routes::with_candidature_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidature::config::AppConfig;
use candidature::error::AppError;
use candidature::telemetry;
use candidature::workflows::candidature::CandidatureService;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(CandidatureService::new(
        Arc::new(InMemoryCandidateRepository::default()),
        Arc::new(InMemorySessionStore::default()),
    ));

    let app = with_candidature_routes(service, config.session.cookie())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cookie = %config.session.cookie_name,
        secure_cookie = config.session.secure,
        "candidature service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
