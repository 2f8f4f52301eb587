use super::common::*;
use crate::diagnosis::AnswerMap;
use crate::sessions::repository::{RepositoryError, SessionRepository};
use crate::sessions::{
    DiagnosisSessionService, SessionId, SessionPage, SessionServiceError,
};
use std::sync::Arc;

#[test]
fn create_starts_on_first_stage_with_unique_ids() {
    let (service, repository) = build_service();

    let first = service.create().expect("create session");
    let second = service.create().expect("create second session");

    assert_ne!(first.id, second.id);
    assert_eq!(first.session.page(), SessionPage::Diagnostic);
    assert_eq!(first.session.stage_index(), 0);
    assert_eq!(repository.len(), 2);
}

#[test]
fn record_answers_persists_batch() {
    let (service, repository) = build_service();
    let record = service.create().expect("create session");

    service
        .record_answers(&record.id, first_stage_answers())
        .expect("record answers");

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.session.answers(), &first_stage_answers());
    assert!(stored.updated_at >= stored.created_at);
}

#[test]
fn unknown_values_are_kept_and_score_zero() {
    let (service, _) = build_service();
    let record = service.create().expect("create session");

    service
        .record_answers(&record.id, answers(&[("keywords_status", "Z")]))
        .expect("unknown value is not an error");
    let completed = service.complete(&record.id).expect("complete");

    let diagnosis = completed.session.diagnosis().expect("diagnosis");
    assert_eq!(diagnosis.result.total_score, 0);
}

#[test]
fn advance_through_all_stages_produces_diagnosis() {
    let (service, _) = build_service();
    let record = service.create().expect("create session");
    service
        .record_answers(&record.id, uniform_answers("E"))
        .expect("record answers");

    let mut latest = record;
    for _ in 0..5 {
        latest = service.advance(&latest.id).expect("advance");
    }

    assert_eq!(latest.session.page(), SessionPage::Result);
    let diagnosis = latest.session.diagnosis().expect("diagnosis");
    assert_eq!(diagnosis.result.total_score, 100);
    assert_eq!(diagnosis.result.avg_score, 5.0);
}

#[test]
fn retreat_and_reset_round_trip_through_repository() {
    let (service, _) = build_service();
    let record = service.create().expect("create session");

    service.advance(&record.id).expect("advance");
    let back = service.retreat(&record.id).expect("retreat");
    assert_eq!(back.session.stage_index(), 0);

    let reset = service.reset(&record.id).expect("reset");
    assert_eq!(reset.session.page(), SessionPage::Welcome);
    assert!(reset.session.answers().is_empty());
}

#[test]
fn concurrent_answer_batches_on_one_session_are_all_kept() {
    let service = DiagnosisSessionService::new(
        Arc::new(SlowReadRepository::default()),
        engine(),
    );
    let record = service.create().expect("create session");
    let batches: Vec<AnswerMap> = bank()
        .questions()
        .map(|question| answers(&[(question.id.as_str(), "D")]))
        .take(8)
        .collect();

    std::thread::scope(|scope| {
        for batch in &batches {
            let service = &service;
            let id = &record.id;
            scope.spawn(move || {
                service
                    .record_answers(id, batch.clone())
                    .expect("record answers");
            });
        }
    });

    let stored = service.get(&record.id).expect("session present");
    assert_eq!(stored.session.answers().len(), batches.len());
    for batch in &batches {
        for question_id in batch.keys() {
            assert_eq!(
                stored.session.answers().get(question_id).map(String::as_str),
                Some("D")
            );
        }
    }
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();
    match service.get(&SessionId("ses-missing".to_string())) {
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn create_propagates_conflict() {
    let service = DiagnosisSessionService::new(Arc::new(ConflictRepository), engine());
    assert!(matches!(
        service.create(),
        Err(SessionServiceError::Repository(RepositoryError::Conflict))
    ));
}

#[test]
fn unavailable_repository_surfaces_error() {
    let service = DiagnosisSessionService::new(Arc::new(UnavailableRepository), engine());
    match service.advance(&SessionId("ses-000001".to_string())) {
        Err(SessionServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected unavailable, got {other:?}"),
    }
}
