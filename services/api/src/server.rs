use crate::cli::ServeArgs;
use crate::infra::{demo_registries, AppState, InMemoryAuditLog, InMemoryRequestRepository};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use subsidy_screening::config::AppConfig;
use subsidy_screening::error::AppError;
use subsidy_screening::registry::latency::{
    provider_for, CREDENTIAL_LATENCY_MS, ENROLLMENT_LATENCY_MS, TIER_LATENCY_MS,
};
use subsidy_screening::registry::{
    CredentialSnapshot, EnrollmentSnapshot, SeedData, TierSnapshot,
};
use subsidy_screening::screening::{
    EngineConfig, MetricsAggregator, MetricsConfig, ScreeningContext, ScreeningService,
};
use subsidy_screening::telemetry;
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

    let (tiers, credentials, enrollments) = match &config.screening.data_dir {
        Some(dir) => {
            let seed = SeedData::load_dir(dir)?;
            info!(
                data_dir = %dir.display(),
                tiers = seed.tiers.len(),
                credentials = seed.credentials.len(),
                enrollments = seed.enrollments.len(),
                "registry snapshots loaded from seed files"
            );
            (seed.tiers, seed.credentials, seed.enrollments)
        }
        None => {
            info!("no seed directory configured, using the built-in demo dataset");
            demo_registries()
        }
    };

    let simulate = config.screening.simulate_latency;
    let tier_registry = Arc::new(TierSnapshot::new(
        tiers,
        provider_for(simulate, TIER_LATENCY_MS),
    ));
    let credential_registry = Arc::new(CredentialSnapshot::new(
        credentials,
        provider_for(simulate, CREDENTIAL_LATENCY_MS),
    ));
    let enrollment_registry = Arc::new(EnrollmentSnapshot::new(
        enrollments,
        provider_for(simulate, ENROLLMENT_LATENCY_MS),
    ));

    let repository = Arc::new(InMemoryRequestRepository::default());
    let audit = Arc::new(InMemoryAuditLog::default());
    let service = Arc::new(ScreeningService::new(
        repository.clone(),
        audit.clone(),
        tier_registry,
        credential_registry,
        enrollment_registry,
        EngineConfig::default(),
    ));
    let metrics = Arc::new(MetricsAggregator::new(
        repository,
        audit,
        MetricsConfig::default(),
    ));

    let app = with_screening_routes(ScreeningContext { service, metrics })
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, simulate_latency = simulate, "screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
