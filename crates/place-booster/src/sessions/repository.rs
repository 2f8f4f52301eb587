use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{DiagnosisSession, SessionId};
use crate::diagnosis::{Diagnosis, Question, QuestionBank};

/// Stored session together with bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub session: DiagnosisSession,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn status_view(&self, bank: &QuestionBank) -> SessionStatusView {
        let stage = self.session.current_stage(bank);
        SessionStatusView {
            session_id: self.id.clone(),
            page: self.session.page().label(),
            stage_index: self.session.stage_index(),
            stage_count: bank.stages().len(),
            stage: stage.map(|stage| stage.name.clone()),
            questions: stage.map(|stage| stage.questions.clone()).unwrap_or_default(),
            progress: self.session.progress(bank),
            answered: self.session.answers().len(),
            diagnosis: self.session.diagnosis().cloned(),
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the session service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// What the HTTP layer exposes for a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub page: &'static str,
    pub stage_index: usize,
    pub stage_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    pub progress: u8,
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Diagnosis>,
    pub updated_at: DateTime<Utc>,
}
