//! Naver Smart Place self-diagnosis: question catalog, scoring, improvement
//! advice, report assembly and HTML export, plus the HTTP surface the API
//! service mounts.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod export;
pub mod report;
pub mod sessions;
pub mod telemetry;

pub use config::AppConfig;
pub use diagnosis::{Diagnosis, DiagnosisEngine, QuestionBank};
pub use error::AppError;
pub use report::{DiagnosisReport, ReportAssembler, ReportOutcome};
