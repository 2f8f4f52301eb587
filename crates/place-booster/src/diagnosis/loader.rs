use super::catalog::{AnswerOption, CatalogError, Question, QuestionBank, Stage};
use crate::config::ContentConfig;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

impl QuestionBank {
    /// Parses a catalog with one row per option:
    /// `stage,question_id,prompt,value,text,score`.
    ///
    /// Stages keep their first-seen order and a question's option rows must be
    /// consecutive. The assembled catalog goes through the same validation as
    /// [`QuestionBank::new`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut stages: Vec<Stage> = Vec::new();

        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = record?;
            // Header is line 1.
            row.require_fields(index + 2)?;

            let position = match stages.iter().position(|stage| stage.name == row.stage) {
                Some(position) => position,
                None => {
                    stages.push(Stage {
                        name: row.stage.clone(),
                        questions: Vec::new(),
                    });
                    stages.len() - 1
                }
            };
            let stage = &mut stages[position];

            let continues_last = stage
                .questions
                .last()
                .is_some_and(|question| question.id == row.question_id);
            if !continues_last {
                stage.questions.push(Question {
                    id: row.question_id.clone(),
                    prompt: row.prompt.clone(),
                    options: Vec::new(),
                });
            }

            if let Some(question) = stage.questions.last_mut() {
                question.options.push(AnswerOption {
                    value: row.value,
                    text: row.text,
                    score: row.score,
                });
            }
        }

        Self::new(stages)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// `QUESTION_CATALOG` when set, otherwise the built-in catalog.
    pub fn from_config(content: &ContentConfig) -> Result<Self, CatalogError> {
        match &content.question_catalog {
            Some(path) => {
                let bank = Self::from_csv_path(path)?;
                tracing::info!(path = %path.display(), "question catalog loaded from file");
                Ok(bank)
            }
            None => Self::standard(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    stage: String,
    question_id: String,
    prompt: String,
    value: String,
    text: String,
    score: u8,
}

impl CatalogRow {
    fn require_fields(&self, row: usize) -> Result<(), CatalogError> {
        let required = [
            ("stage", &self.stage),
            ("question_id", &self.question_id),
            ("prompt", &self.prompt),
            ("value", &self.value),
        ];

        match required.iter().find(|(_, value)| value.is_empty()) {
            Some(&(field, _)) => Err(CatalogError::MissingField { row, field }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "stage,question_id,prompt,value,text,score\n";

    fn catalog_csv() -> String {
        let mut csv = HEADER.to_string();
        for stage in 0..5 {
            for question in 0..4 {
                for (index, value) in ["A", "B", "C", "D", "E"].iter().enumerate() {
                    csv.push_str(&format!(
                        "stage {stage},s{stage}q{question},\"Prompt, {question}\",{value},option {value},{}\n",
                        index + 1
                    ));
                }
            }
        }
        csv
    }

    #[test]
    fn groups_rows_into_stages_and_questions() {
        let bank = QuestionBank::from_csv_reader(catalog_csv().as_bytes()).expect("catalog parses");
        let names: Vec<_> = bank.stage_names().collect();
        assert_eq!(
            names,
            vec!["stage 0", "stage 1", "stage 2", "stage 3", "stage 4"]
        );
        let question = bank.question("s2q3").expect("question present");
        assert_eq!(question.prompt, "Prompt, 3");
        assert_eq!(question.option("E").map(|option| option.score), Some(5));
    }

    #[test]
    fn reports_missing_stage_name_with_row_number() {
        let csv = catalog_csv().replacen("stage 0,s0q0", ",s0q0", 1);
        match QuestionBank::from_csv_reader(csv.as_bytes()) {
            Err(CatalogError::MissingField { row, field }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "stage");
            }
            other => panic!("expected missing field error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_score_is_a_csv_error() {
        let csv = format!("{HEADER}stage 0,s0q0,Prompt,A,option,high\n");
        assert!(matches!(
            QuestionBank::from_csv_reader(csv.as_bytes()),
            Err(CatalogError::Csv(_))
        ));
    }

    #[test]
    fn split_question_rows_are_rejected() {
        let mut csv = catalog_csv();
        csv.push_str("stage 0,s0q0,Prompt,A,again,1\n");
        assert!(matches!(
            QuestionBank::from_csv_reader(csv.as_bytes()),
            Err(CatalogError::QuestionCount { .. })
        ));
    }
}
