use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryIdeaRepository};
use crate::routes::with_idea_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use idea_scorer::config::AppConfig;
use idea_scorer::error::AppError;
use idea_scorer::telemetry;
use idea_scorer::workflows::ideas::IdeaService;
use idea_scorer::workflows::scoring::{ScoringEngine, SummaryExplainer};
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

    let repository = Arc::new(InMemoryIdeaRepository::default());
    let engine = ScoringEngine::new(config.scoring.weights)?;
    let idea_service = Arc::new(IdeaService::new(
        repository,
        Arc::new(SummaryExplainer),
        engine,
    ));

    let app = with_idea_routes(idea_service, config.scoring.max_upload_bytes())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        weights = ?config.scoring.weights.to_array(),
        "idea scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
