use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Option letters in the order every question must present them.
pub const OPTION_VALUES: [&str; 5] = ["A", "B", "C", "D", "E"];
pub const QUESTIONS_PER_STAGE: usize = 4;
pub const STAGE_COUNT: usize = 5;

/// One selectable answer. `score` equals the option's position (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub text: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn max_score(&self) -> u32 {
        self.options
            .iter()
            .map(|option| u32::from(option.score))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Stage {
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(Question::max_score).sum()
    }
}

/// Validated question catalog. Stage order is the wizard order.
///
/// The only way to obtain a bank is through [`QuestionBank::new`] (or the
/// constructors built on it), so every instance satisfies the catalog
/// invariants: five stages of four questions, options `A`..`E` scored 1..5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    stages: Vec<Stage>,
}

impl QuestionBank {
    pub fn new(stages: Vec<Stage>) -> Result<Self, CatalogError> {
        validate(&stages)?;
        Ok(Self { stages })
    }

    /// The built-in Smart Place catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(super::bank::standard_stages())
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn stage_at(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.name.as_str())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|question| question.id == id)
    }

    /// Stage containing the given question id.
    pub fn stage_of(&self, question_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| {
            stage
                .questions
                .iter()
                .any(|question| question.id == question_id)
        })
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.stages.iter().flat_map(|stage| stage.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.questions.len()).sum()
    }

    pub fn max_score(&self) -> u32 {
        self.stages.iter().map(Stage::max_score).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must define {expected} stages, found {actual}")]
    StageCount { expected: usize, actual: usize },
    #[error("stage '{stage}' must hold {expected} questions, found {actual}")]
    QuestionCount {
        stage: String,
        expected: usize,
        actual: usize,
    },
    #[error("question '{question_id}' must offer {expected} options, found {actual}")]
    OptionCount {
        question_id: String,
        expected: usize,
        actual: usize,
    },
    #[error("question '{question_id}' option {position} must be '{expected}', found '{actual}'")]
    OptionValue {
        question_id: String,
        position: usize,
        expected: &'static str,
        actual: String,
    },
    #[error("question '{question_id}' option '{value}' must score {expected}, found {actual}")]
    OptionScore {
        question_id: String,
        value: String,
        expected: u8,
        actual: u8,
    },
    #[error("question id '{0}' appears more than once")]
    DuplicateQuestion(String),
    #[error("stage '{0}' appears more than once")]
    DuplicateStage(String),
    #[error("catalog row {row} is missing '{field}'")]
    MissingField { row: usize, field: &'static str },
    #[error("failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question catalog data: {0}")]
    Csv(#[from] csv::Error),
}

fn validate(stages: &[Stage]) -> Result<(), CatalogError> {
    if stages.len() != STAGE_COUNT {
        return Err(CatalogError::StageCount {
            expected: STAGE_COUNT,
            actual: stages.len(),
        });
    }

    let mut stage_names = HashSet::new();
    let mut question_ids = HashSet::new();

    for stage in stages {
        if !stage_names.insert(stage.name.as_str()) {
            return Err(CatalogError::DuplicateStage(stage.name.clone()));
        }

        if stage.questions.len() != QUESTIONS_PER_STAGE {
            return Err(CatalogError::QuestionCount {
                stage: stage.name.clone(),
                expected: QUESTIONS_PER_STAGE,
                actual: stage.questions.len(),
            });
        }

        for question in &stage.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            validate_options(question)?;
        }
    }

    Ok(())
}

fn validate_options(question: &Question) -> Result<(), CatalogError> {
    if question.options.len() != OPTION_VALUES.len() {
        return Err(CatalogError::OptionCount {
            question_id: question.id.clone(),
            expected: OPTION_VALUES.len(),
            actual: question.options.len(),
        });
    }

    for (position, (option, expected)) in question.options.iter().zip(OPTION_VALUES).enumerate() {
        if option.value != expected {
            return Err(CatalogError::OptionValue {
                question_id: question.id.clone(),
                position: position + 1,
                expected,
                actual: option.value.clone(),
            });
        }

        // Scores 1..=5 strictly increasing across five slots means score == position.
        let expected_score = (position + 1) as u8;
        if option.score != expected_score {
            return Err(CatalogError::OptionScore {
                question_id: question.id.clone(),
                value: option.value.clone(),
                expected: expected_score,
                actual: option.score,
            });
        }
    }

    Ok(())
}
