use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use super::domain::{DiagnosisSession, SessionId};
use super::repository::{RepositoryError, SessionRecord, SessionRepository};
use crate::diagnosis::{AnswerMap, DiagnosisEngine, QuestionBank};

/// Service driving diagnosis sessions through the wizard and persisting each
/// step in the repository.
pub struct DiagnosisSessionService<R> {
    repository: Arc<R>,
    engine: DiagnosisEngine,
    sequence: AtomicU64,
    // Held across fetch, apply and update so concurrent writes to one
    // session cannot overwrite each other.
    writes: Mutex<()>,
}

impl<R> DiagnosisSessionService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: DiagnosisEngine) -> Self {
        Self {
            repository,
            engine,
            sequence: AtomicU64::new(1),
            writes: Mutex::new(()),
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        self.engine.bank()
    }

    fn next_session_id(&self) -> SessionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("ses-{id:06}"))
    }

    /// Open a new session already positioned on the first stage.
    pub fn create(&self) -> Result<SessionRecord, SessionServiceError> {
        let mut session = DiagnosisSession::new();
        session.start();

        let now = Utc::now();
        let record = SessionRecord {
            id: self.next_session_id(),
            session,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        tracing::info!(session_id = %stored.id, "diagnosis session created");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Record a batch of answers. Values the catalog does not recognize are
    /// kept (they score zero) and logged.
    pub fn record_answers(
        &self,
        id: &SessionId,
        answers: AnswerMap,
    ) -> Result<SessionRecord, SessionServiceError> {
        for unknown in self.engine.unknown_answers(&answers) {
            tracing::warn!(
                session_id = %id,
                question_id = %unknown.question_id,
                value = %unknown.value,
                "answer does not match the question catalog; it will score zero"
            );
        }

        self.mutate(id, |session, _| {
            for (question_id, value) in answers {
                session.record_answer(question_id, value);
            }
        })
    }

    pub fn advance(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        let record = self.mutate(id, |session, bank| session.advance(bank))?;
        if let Some(diagnosis) = record.session.diagnosis() {
            tracing::info!(
                session_id = %record.id,
                avg_score = diagnosis.result.avg_score,
                level = diagnosis.result.level.key(),
                "diagnosis session completed"
            );
        }
        Ok(record)
    }

    pub fn retreat(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        self.mutate(id, |session, _| session.retreat())
    }

    pub fn reset(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        self.mutate(id, |session, _| session.reset())
    }

    pub fn complete(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        self.mutate(id, |session, bank| session.complete(bank))
    }

    fn mutate<F>(&self, id: &SessionId, apply: F) -> Result<SessionRecord, SessionServiceError>
    where
        F: FnOnce(&mut DiagnosisSession, &QuestionBank),
    {
        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut record = self.get(id)?;
        apply(&mut record.session, self.engine.bank());
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        Ok(record)
    }
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
