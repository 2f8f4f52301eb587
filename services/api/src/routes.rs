use crate::infra::{AppState, DiagnosisState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use place_booster::diagnosis::{AnswerMap, Diagnosis, Stage, UnknownAnswer};
use place_booster::error::AppError;
use place_booster::export;
use place_booster::report::Consultation;
use place_booster::sessions::{session_router, DiagnosisSessionService, SessionRepository};
use place_booster::DiagnosisReport;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct DiagnosisRequest {
    #[serde(default)]
    pub(crate) answers: AnswerMap,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConsultRequest {
    pub(crate) question: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionCatalogResponse {
    pub(crate) stage_count: usize,
    pub(crate) question_count: usize,
    pub(crate) max_score: u32,
    pub(crate) stages: Vec<Stage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DiagnosisResponse {
    #[serde(flatten)]
    pub(crate) diagnosis: Diagnosis,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) unknown_answers: Vec<UnknownAnswer>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    #[serde(flatten)]
    pub(crate) diagnosis: Diagnosis,
    pub(crate) report: DiagnosisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fallback_reason: Option<String>,
}

pub(crate) fn with_diagnosis_routes<R>(
    state: DiagnosisState,
    sessions: Arc<DiagnosisSessionService<R>>,
) -> Router
where
    R: SessionRepository + 'static,
{
    session_router(sessions)
        .merge(diagnosis_router(state))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn diagnosis_router(state: DiagnosisState) -> Router {
    Router::new()
        .route("/api/v1/questions", get(questions_endpoint))
        .route("/api/v1/diagnosis", post(diagnosis_endpoint))
        .route("/api/v1/diagnosis/report", post(report_endpoint))
        .route("/api/v1/diagnosis/export", post(export_endpoint))
        .route("/api/v1/consult", post(consult_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn questions_endpoint(
    State(state): State<DiagnosisState>,
) -> Json<QuestionCatalogResponse> {
    let bank = state.engine.bank();
    Json(QuestionCatalogResponse {
        stage_count: bank.stages().len(),
        question_count: bank.question_count(),
        max_score: bank.max_score(),
        stages: bank.stages().to_vec(),
    })
}

pub(crate) async fn diagnosis_endpoint(
    State(state): State<DiagnosisState>,
    Json(payload): Json<DiagnosisRequest>,
) -> Json<DiagnosisResponse> {
    let unknown_answers = state.engine.unknown_answers(&payload.answers);
    if !unknown_answers.is_empty() {
        tracing::warn!(count = unknown_answers.len(), "ignoring unrecognized answers");
    }

    Json(DiagnosisResponse {
        diagnosis: state.engine.diagnose(&payload.answers),
        unknown_answers,
    })
}

pub(crate) async fn report_endpoint(
    State(state): State<DiagnosisState>,
    Json(payload): Json<DiagnosisRequest>,
) -> Json<ReportResponse> {
    let diagnosis = state.engine.diagnose(&payload.answers);
    let outcome = state
        .assembler
        .assemble(&diagnosis.result, &diagnosis.improvement)
        .await;
    let fallback_reason = outcome.fallback_reason().map(str::to_string);

    Json(ReportResponse {
        diagnosis,
        report: outcome.into_report(),
        fallback_reason,
    })
}

pub(crate) async fn export_endpoint(
    State(state): State<DiagnosisState>,
    Json(payload): Json<DiagnosisRequest>,
) -> impl IntoResponse {
    let diagnosis = state.engine.diagnose(&payload.answers);
    let report = state
        .assembler
        .assemble(&diagnosis.result, &diagnosis.improvement)
        .await
        .into_report();

    let generated_at = Local::now().naive_local();
    let html = export::render_html_at(
        &diagnosis.result,
        &diagnosis.improvement,
        &report,
        generated_at,
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::report_file_name(generated_at)
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export::content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
}

pub(crate) async fn consult_endpoint(
    State(state): State<DiagnosisState>,
    Json(payload): Json<ConsultRequest>,
) -> Result<Json<Consultation>, AppError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput(
            "question must not be empty".to_string(),
        ));
    }

    Ok(Json(state.assembler.consult(question).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use place_booster::report::ReportSource;
    use place_booster::{DiagnosisEngine, ReportAssembler};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn diagnosis_state() -> DiagnosisState {
        DiagnosisState {
            engine: DiagnosisEngine::standard().expect("standard catalog"),
            assembler: Arc::new(ReportAssembler::new(Duration::from_secs(1))),
        }
    }

    fn app(ready: bool) -> Router {
        let state = diagnosis_state();
        let sessions = Arc::new(DiagnosisSessionService::new(
            Arc::new(InMemorySessionRepository::default()),
            state.engine.clone(),
        ));
        let app_state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_diagnosis_routes(state, sessions).layer(Extension(app_state))
    }

    fn first_stage_answers() -> AnswerMap {
        [
            ("keywords_status", "C"),
            ("description_status", "B"),
            ("location_accuracy", "C"),
            ("hours_info", "D"),
        ]
        .into_iter()
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .collect()
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body readable");
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn questions_endpoint_lists_catalog() {
        let Json(body) = questions_endpoint(State(diagnosis_state())).await;
        assert_eq!(body.stage_count, 5);
        assert_eq!(body.question_count, 20);
        assert_eq!(body.max_score, 100);
        assert_eq!(body.stages[0].questions[0].id, "keywords_status");
    }

    #[tokio::test]
    async fn diagnosis_endpoint_scores_answers() {
        let (status, bytes) = post_json(
            app(true),
            "/api/v1/diagnosis",
            json!({ "answers": first_stage_answers() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["result"]["total_score"], 12);
        assert_eq!(body["result"]["avg_score"], 0.6);
        assert_eq!(body["result"]["level"]["name"], "초보 단계");
        assert_eq!(
            body["improvement"]["weak_areas"]
                .as_array()
                .map(Vec::len),
            Some(3)
        );
        assert!(body.get("unknown_answers").is_none());
    }

    #[tokio::test]
    async fn diagnosis_endpoint_reports_unknown_answers() {
        let Json(body) = diagnosis_endpoint(
            State(diagnosis_state()),
            Json(DiagnosisRequest {
                answers: [("keywords_status".to_string(), "Z".to_string())]
                    .into_iter()
                    .collect(),
            }),
        )
        .await;
        assert_eq!(body.diagnosis.result.total_score, 0);
        assert_eq!(body.unknown_answers.len(), 1);
    }

    #[tokio::test]
    async fn report_endpoint_uses_template_without_model() {
        let Json(body) = report_endpoint(
            State(diagnosis_state()),
            Json(DiagnosisRequest {
                answers: first_stage_answers(),
            }),
        )
        .await;
        assert_eq!(body.report.source, ReportSource::Template);
        assert!(body.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn export_endpoint_serves_html_attachment() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/diagnosis/export")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "answers": first_stage_answers() }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header");
        assert!(disposition.contains("place_optimization_report_"));

        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body readable");
        let html = String::from_utf8(bytes.to_vec()).expect("utf-8 html");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("초보 단계"));
    }

    #[tokio::test]
    async fn blank_consult_question_is_rejected() {
        let (status, bytes) =
            post_json(app(true), "/api/v1/consult", json!({ "question": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["error"], "invalid input: question must not be empty");
    }

    #[tokio::test]
    async fn consult_without_model_apologizes() {
        let Json(body) = consult_endpoint(
            State(diagnosis_state()),
            Json(ConsultRequest {
                question: "리뷰를 늘리려면?".to_string(),
            }),
        )
        .await
        .expect("consultation responds");
        assert_eq!(body.source, ReportSource::Fallback);
    }

    #[tokio::test]
    async fn session_routes_are_mounted() {
        let (status, bytes) = post_json(app(true), "/api/v1/sessions", json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["page"], "diagnostic");
    }
}
