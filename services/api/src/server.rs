use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredAnswerStore};
use crate::routes::with_eligibility_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefit_navigator::config::AppConfig;
use benefit_navigator::eligibility::{EligibilityRegistry, EligibilitySessionService};
use benefit_navigator::error::AppError;
use benefit_navigator::telemetry;
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

    let store = ConfiguredAnswerStore::from_dir(config.eligibility.answer_store_dir.as_deref())?;
    let store_location = store.describe();
    let registry = EligibilityRegistry::from_kind(config.eligibility.strategy);
    let session_service = Arc::new(EligibilitySessionService::new(registry, Arc::new(store)));

    let app = with_eligibility_routes(session_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strategy = %config.eligibility.strategy,
        answers = %store_location,
        "benefit navigator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
