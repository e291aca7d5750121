use crate::cli::ServeArgs;
use crate::infra::{load_registry, AppState};
use crate::routes::with_eligibility_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use licensing::config::AppConfig;
use licensing::eligibility::{LicenseEligibilityEngine, RuleBook, SystemClock};
use licensing::error::AppError;
use licensing::telemetry;
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

    let registry = Arc::new(load_registry(args.registry.as_deref())?);
    let engine = Arc::new(
        LicenseEligibilityEngine::new(Arc::new(RuleBook::standard()), registry, SystemClock)
            .with_failure_policy(config.eligibility.registry_failure_policy)
            .with_renewal_window(config.eligibility.renewal_window_months),
    );

    let app = with_eligibility_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        failure_policy = ?config.eligibility.registry_failure_policy,
        "license eligibility service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
