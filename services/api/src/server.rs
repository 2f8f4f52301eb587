use crate::cli::ServeArgs;
use crate::infra::{AppState, DiagnosisState, InMemorySessionRepository};
use crate::routes::with_diagnosis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use place_booster::config::AppConfig;
use place_booster::error::AppError;
use place_booster::sessions::DiagnosisSessionService;
use place_booster::telemetry;
use place_booster::{DiagnosisEngine, QuestionBank, ReportAssembler};
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

    let bank = QuestionBank::from_config(&config.content)?;
    info!(
        stages = bank.stages().len(),
        questions = bank.question_count(),
        "question catalog ready"
    );
    let engine = DiagnosisEngine::new(Arc::new(bank));
    let assembler = Arc::new(ReportAssembler::from_config(
        &config.llm,
        &config.content,
    )?);

    let repository = Arc::new(InMemorySessionRepository::default());
    let session_service = Arc::new(DiagnosisSessionService::new(repository, engine.clone()));

    let app = with_diagnosis_routes(DiagnosisState { engine, assembler }, session_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "place diagnosis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
