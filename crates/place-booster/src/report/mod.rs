//! Narrative report assembly on top of a diagnosis.
//!
//! Without a chat model the template writer produces every section. With a
//! model, each section is written from retrieved passages; any model or
//! retrieval failure yields [`ReportOutcome::Fallback`] with canned text.

mod assembler;
pub mod knowledge;
pub mod llm;
mod sections;

pub use assembler::{Consultation, ReportAssembler, ReportOutcome};
pub use knowledge::{Document, KnowledgeBase, KnowledgeError, Passage, TextCorpus};
pub use llm::{ChatModel, LlmError, OpenAiChatClient};
pub use sections::{
    fallback_report, quick_actions, template_report, themed_title, DiagnosisReport, ReportSource,
    REPORT_TITLE,
};
