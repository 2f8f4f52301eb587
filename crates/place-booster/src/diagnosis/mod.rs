//! Question catalog, scoring, level classification and improvement advice.
//!
//! Everything in this module is pure: the same catalog and answers always
//! produce the same [`Diagnosis`], and nothing is cached between calls.

mod advisor;
mod bank;
pub mod catalog;
mod level;
mod loader;
mod scoring;

pub use advisor::{
    action_items, overall_suggestion, suggest_improvements, Improvement, Tier, WeakArea,
};
pub use catalog::{AnswerOption, CatalogError, Question, QuestionBank, Stage};
pub use level::{determine_level, Level};
pub use scoring::{
    calculate_score, unknown_answers, AnswerMap, DiagnosisResult, StageScore, StageScoreEntry,
    UnknownAnswer,
};

use serde::Serialize;
use std::sync::Arc;

/// Scoring output paired with the advice derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub result: DiagnosisResult,
    pub improvement: Improvement,
}

/// Shared entry point that binds the scoring pipeline to one catalog.
#[derive(Debug, Clone)]
pub struct DiagnosisEngine {
    bank: Arc<QuestionBank>,
}

impl DiagnosisEngine {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Ok(Self::new(Arc::new(QuestionBank::standard()?)))
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn diagnose(&self, answers: &AnswerMap) -> Diagnosis {
        let result = calculate_score(&self.bank, answers);
        let improvement = suggest_improvements(&result);
        Diagnosis {
            result,
            improvement,
        }
    }

    pub fn unknown_answers(&self, answers: &AnswerMap) -> Vec<UnknownAnswer> {
        unknown_answers(&self.bank, answers)
    }
}
