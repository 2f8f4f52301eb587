use serde::{Deserialize, Serialize};

use crate::diagnosis::{
    calculate_score, suggest_improvements, AnswerMap, Diagnosis, QuestionBank, Stage,
};

/// Identifier wrapper for diagnosis sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Screen the wizard is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPage {
    Welcome,
    Diagnostic,
    Result,
}

impl SessionPage {
    pub const fn label(self) -> &'static str {
        match self {
            SessionPage::Welcome => "welcome",
            SessionPage::Diagnostic => "diagnostic",
            SessionPage::Result => "result",
        }
    }
}

/// Wizard state for one respondent. The caller owns it; nothing here is
/// shared between sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisSession {
    page: SessionPage,
    stage_index: usize,
    answers: AnswerMap,
    diagnosis: Option<Diagnosis>,
}

impl Default for DiagnosisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisSession {
    pub fn new() -> Self {
        Self {
            page: SessionPage::Welcome,
            stage_index: 0,
            answers: AnswerMap::new(),
            diagnosis: None,
        }
    }

    pub fn page(&self) -> SessionPage {
        self.page
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnosis.as_ref()
    }

    pub fn current_stage<'a>(&self, bank: &'a QuestionBank) -> Option<&'a Stage> {
        match self.page {
            SessionPage::Diagnostic => bank.stage_at(self.stage_index),
            SessionPage::Welcome | SessionPage::Result => None,
        }
    }

    /// Leaves the welcome page for the first stage. Other pages are unchanged.
    pub fn start(&mut self) {
        if self.page == SessionPage::Welcome {
            self.page = SessionPage::Diagnostic;
            self.stage_index = 0;
        }
    }

    /// Stores (or overwrites) an answer. Changing answers after completion
    /// discards the stale diagnosis and reopens the last visited stage.
    pub fn record_answer(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(question_id.into(), value.into());
        if self.page == SessionPage::Result {
            self.diagnosis = None;
            self.page = SessionPage::Diagnostic;
        }
    }

    /// Whole-percent share of catalog questions with a recorded answer.
    pub fn progress(&self, bank: &QuestionBank) -> u8 {
        let total = bank.question_count();
        if total == 0 {
            return 0;
        }
        let answered = self
            .answers
            .keys()
            .filter(|question_id| bank.question(question_id).is_some())
            .count();
        (answered * 100 / total).min(100) as u8
    }

    /// Moves to the next stage; on the last stage this completes the session.
    pub fn advance(&mut self, bank: &QuestionBank) {
        match self.page {
            SessionPage::Welcome => self.start(),
            SessionPage::Diagnostic if self.stage_index + 1 < bank.stages().len() => {
                self.stage_index += 1;
            }
            SessionPage::Diagnostic => self.complete(bank),
            SessionPage::Result => {}
        }
    }

    pub fn retreat(&mut self) {
        if self.page == SessionPage::Diagnostic && self.stage_index > 0 {
            self.stage_index -= 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Scores whatever has been answered so far and shows the result page.
    pub fn complete(&mut self, bank: &QuestionBank) {
        let result = calculate_score(bank, &self.answers);
        let improvement = suggest_improvements(&result);
        self.diagnosis = Some(Diagnosis {
            result,
            improvement,
        });
        self.page = SessionPage::Result;
    }
}
