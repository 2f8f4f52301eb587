use metrics_exporter_prometheus::PrometheusHandle;
use place_booster::diagnosis::AnswerMap;
use place_booster::error::AppError;
use place_booster::sessions::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use place_booster::{DiagnosisEngine, ReportAssembler};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared scoring and report pipeline behind the stateless endpoints.
#[derive(Clone)]
pub(crate) struct DiagnosisState {
    pub(crate) engine: DiagnosisEngine,
    pub(crate) assembler: Arc<ReportAssembler>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Parses `question_id=VALUE`; the value is upper-cased so `c` and `C` match.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION_ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    let value = value.trim();
    if id.is_empty() || value.is_empty() {
        return Err(format!("expected QUESTION_ID=VALUE, got '{raw}'"));
    }
    Ok((id.to_string(), value.to_ascii_uppercase()))
}

/// Reads a JSON object mapping question ids to option letters.
pub(crate) fn read_answers_file(path: &Path) -> Result<AnswerMap, AppError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::InvalidInput(format!(
            "{} is not a JSON object of question ids to option letters ({err})",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use place_booster::sessions::DiagnosisSession;
    use std::io::Write;

    #[test]
    fn answer_pairs_are_trimmed_and_upper_cased() {
        assert_eq!(
            parse_answer(" cta = b "),
            Ok(("cta".to_string(), "B".to_string()))
        );
        assert!(parse_answer("cta").is_err());
        assert!(parse_answer("=B").is_err());
    }

    #[test]
    fn answers_file_must_be_an_object() {
        let dir = tempfile::tempdir().expect("tempdir");

        let good = dir.path().join("good.json");
        fs::File::create(&good)
            .and_then(|mut file| file.write_all(br#"{"keywords_status":"C","cta":"A"}"#))
            .expect("write answers");
        let answers = read_answers_file(&good).expect("answers parse");
        assert_eq!(answers.get("cta").map(String::as_str), Some("A"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[1, 2]").expect("write bad answers");
        assert!(matches!(
            read_answers_file(&bad),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn repository_rejects_duplicate_and_unknown_records() {
        let repository = InMemorySessionRepository::default();
        let now = chrono::Utc::now();
        let record = SessionRecord {
            id: SessionId("ses-000001".to_string()),
            session: DiagnosisSession::new(),
            created_at: now,
            updated_at: now,
        };

        repository.insert(record.clone()).expect("first insert");
        assert!(matches!(
            repository.insert(record.clone()),
            Err(RepositoryError::Conflict)
        ));

        let mut stranger = record.clone();
        stranger.id = SessionId("ses-999999".to_string());
        assert!(matches!(
            repository.update(stranger),
            Err(RepositoryError::NotFound)
        ));
        assert_eq!(
            repository.fetch(&record.id).expect("fetch"),
            Some(record)
        );
    }
}
