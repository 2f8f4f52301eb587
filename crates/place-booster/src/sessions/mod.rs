//! Caller-owned wizard state for a diagnosis, plus the service and HTTP
//! routes that persist it between requests.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{DiagnosisSession, SessionId, SessionPage};
pub use repository::{RepositoryError, SessionRecord, SessionRepository, SessionStatusView};
pub use router::{session_router, AnswerBatch};
pub use service::{DiagnosisSessionService, SessionServiceError};
