use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::diagnosis::{AnswerMap, DiagnosisEngine, QuestionBank};
use crate::sessions::repository::{RepositoryError, SessionRecord, SessionRepository};
use crate::sessions::{session_router, DiagnosisSessionService, SessionId};

pub(super) fn engine() -> DiagnosisEngine {
    DiagnosisEngine::standard().expect("standard catalog is valid")
}

pub(super) fn bank() -> QuestionBank {
    QuestionBank::standard().expect("standard catalog is valid")
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .collect()
}

/// Every question answered with the same option.
pub(super) fn uniform_answers(value: &str) -> AnswerMap {
    bank()
        .questions()
        .map(|question| (question.id.clone(), value.to_string()))
        .collect()
}

pub(super) fn first_stage_answers() -> AnswerMap {
    answers(&[
        ("keywords_status", "C"),
        ("description_status", "B"),
        ("location_accuracy", "C"),
        ("hours_info", "D"),
    ])
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct ConflictRepository;

impl SessionRepository for ConflictRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(None)
    }
}

/// Memory repository whose reads stall, widening the gap between a fetch and
/// the update that follows it.
#[derive(Default, Clone)]
pub(super) struct SlowReadRepository {
    inner: MemoryRepository,
}

impl SessionRepository for SlowReadRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        std::thread::sleep(std::time::Duration::from_millis(5));
        self.inner.fetch(id)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<DiagnosisSessionService<MemoryRepository>>,
    MemoryRepository,
) {
    let repository = MemoryRepository::default();
    let service = Arc::new(DiagnosisSessionService::new(
        Arc::new(repository.clone()),
        engine(),
    ));
    (service, repository)
}

pub(super) fn router_with_service(
    service: Arc<DiagnosisSessionService<MemoryRepository>>,
) -> axum::Router {
    session_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
