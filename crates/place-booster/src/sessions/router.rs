use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SessionId;
use super::repository::{RepositoryError, SessionRecord, SessionRepository};
use super::service::{DiagnosisSessionService, SessionServiceError};
use crate::diagnosis::AnswerMap;

/// Router exposing the diagnosis wizard over HTTP.
pub fn session_router<R>(service: Arc<DiagnosisSessionService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(create_handler::<R>))
        .route("/api/v1/sessions/:session_id", get(status_handler::<R>))
        .route(
            "/api/v1/sessions/:session_id/answers",
            put(answers_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/advance",
            post(advance_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/retreat",
            post(retreat_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/reset",
            post(reset_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/complete",
            post(complete_handler::<R>),
        )
        .with_state(service)
}

/// Body of `PUT /api/v1/sessions/:session_id/answers`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerBatch {
    pub answers: AnswerMap,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(&service, service.create(), StatusCode::CREATED)
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(&service, service.get(&id), StatusCode::OK)
}

pub(crate) async fn answers_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(batch): axum::Json<AnswerBatch>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(
        &service,
        service.record_answers(&id, batch.answers),
        StatusCode::OK,
    )
}

pub(crate) async fn advance_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(&service, service.advance(&id), StatusCode::OK)
}

pub(crate) async fn retreat_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(&service, service.retreat(&id), StatusCode::OK)
}

pub(crate) async fn reset_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(&service, service.reset(&id), StatusCode::OK)
}

pub(crate) async fn complete_handler<R>(
    State(service): State<Arc<DiagnosisSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    respond(&service, service.complete(&id), StatusCode::OK)
}

fn respond<R>(
    service: &DiagnosisSessionService<R>,
    outcome: Result<SessionRecord, SessionServiceError>,
    success: StatusCode,
) -> Response
where
    R: SessionRepository + 'static,
{
    match outcome {
        Ok(record) => {
            let view = record.status_view(service.bank());
            (success, axum::Json(view)).into_response()
        }
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "session not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(SessionServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "session already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
