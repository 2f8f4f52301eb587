use super::catalog::{QuestionBank, Stage};
use super::level::{determine_level, Level};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Question id → selected option value (`"A"`..`"E"`). Unanswered questions
/// are simply absent.
pub type AnswerMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageScore {
    pub raw_score: u32,
    pub avg_score: f64,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageScoreEntry {
    pub stage: String,
    #[serde(flatten)]
    pub score: StageScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisResult {
    pub total_score: u32,
    pub avg_score: f64,
    pub max_score: u32,
    pub level: Level,
    /// One entry per catalog stage, in catalog order.
    pub stage_scores: Vec<StageScoreEntry>,
}

impl DiagnosisResult {
    pub fn stage_score(&self, stage: &str) -> Option<&StageScore> {
        self.stage_scores
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| &entry.score)
    }
}

/// An answer that matched no question or no option of its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownAnswer {
    pub question_id: String,
    pub value: String,
}

/// Scores an answer map against the catalog.
///
/// Unanswered questions and unknown option values contribute zero, and every
/// average is taken over the full question count, so a partial submission
/// scores lower rather than failing.
pub fn calculate_score(bank: &QuestionBank, answers: &AnswerMap) -> DiagnosisResult {
    let mut total_score = 0;
    let mut max_score = 0;
    let mut stage_scores = Vec::with_capacity(bank.stages().len());

    for stage in bank.stages() {
        let score = score_stage(stage, answers);
        total_score += score.raw_score;
        max_score += score.max_score;
        stage_scores.push(StageScoreEntry {
            stage: stage.name.clone(),
            score,
        });
    }

    let avg_score = rounded_average(total_score, bank.question_count());

    DiagnosisResult {
        total_score,
        avg_score,
        max_score,
        level: determine_level(avg_score),
        stage_scores,
    }
}

/// Answers that [`calculate_score`] silently ignored.
pub fn unknown_answers(bank: &QuestionBank, answers: &AnswerMap) -> Vec<UnknownAnswer> {
    answers
        .iter()
        .filter(|(question_id, value)| {
            bank.question(question_id)
                .and_then(|question| question.option(value))
                .is_none()
        })
        .map(|(question_id, value)| UnknownAnswer {
            question_id: question_id.clone(),
            value: value.clone(),
        })
        .collect()
}

fn score_stage(stage: &Stage, answers: &AnswerMap) -> StageScore {
    let raw_score = stage
        .questions
        .iter()
        .filter_map(|question| {
            answers
                .get(&question.id)
                .and_then(|value| question.option(value))
        })
        .map(|option| u32::from(option.score))
        .sum();

    StageScore {
        raw_score,
        avg_score: rounded_average(raw_score, stage.questions.len()),
        max_score: stage.max_score(),
    }
}

/// `sum / count` rounded to one decimal the way `round(x, 1)` does: the
/// quotient is rounded as the exact binary value it holds, and only exact
/// ties go to the even digit. `29 / 20` is stored just below 1.45, so it
/// rounds to 1.4, while `5 / 4` is an exact tie and rounds to 1.2.
fn rounded_average(sum: u32, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_tenths(f64::from(sum) / count as f64)
}

fn round_tenths(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    // value == mantissa * 2^exponent, exactly.
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if exponent >= 0 {
        return value;
    }
    let shift = exponent.unsigned_abs();
    if shift > 120 {
        return 0.0;
    }

    let scale = 1u128 << shift;
    let scaled = u128::from(mantissa) * 10;
    let floor = scaled / scale;
    let tenths = match ((scaled % scale) * 2).cmp(&scale) {
        Ordering::Less => floor,
        Ordering::Greater => floor + 1,
        Ordering::Equal if floor % 2 == 0 => floor,
        Ordering::Equal => floor + 1,
    };
    tenths as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::standard().expect("standard catalog is valid")
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn rounds_stored_quotient_with_exact_ties_to_even() {
        assert_eq!(rounded_average(5, 4), 1.2);
        assert_eq!(rounded_average(7, 4), 1.8);
        assert_eq!(rounded_average(1, 4), 0.2);
        assert_eq!(rounded_average(9, 4), 2.2);
        assert_eq!(rounded_average(13, 4), 3.2);
        assert_eq!(rounded_average(17, 4), 4.2);
        assert_eq!(rounded_average(3, 20), 0.1);
        assert_eq!(rounded_average(12, 20), 0.6);
        assert_eq!(rounded_average(29, 20), 1.4);
        assert_eq!(rounded_average(46, 20), 2.3);
        assert_eq!(rounded_average(100, 20), 5.0);
        assert_eq!(rounded_average(3, 0), 0.0);
    }

    #[test]
    fn decimal_formatting_agrees_on_non_tie_quotients() {
        for count in [3usize, 7, 9] {
            for sum in 0..=(5 * count as u32) {
                let quotient = f64::from(sum) / count as f64;
                let formatted: f64 = format!("{quotient:.1}").parse().expect("decimal text");
                assert_eq!(rounded_average(sum, count), formatted, "{sum}/{count}");
            }
        }
    }

    #[test]
    fn stage_average_for_raw_five_is_one_point_two() {
        let result = calculate_score(
            &bank(),
            &answers(&[("keywords_status", "B"), ("description_status", "C")]),
        );
        let stage = result.stage_score("인식하게 한다").expect("stage present");
        assert_eq!(stage.raw_score, 5);
        assert_eq!(stage.avg_score, 1.2);
        assert_eq!(result.avg_score, 0.2);
    }

    #[test]
    fn empty_answers_yield_zero_filled_stages() {
        let result = calculate_score(&bank(), &AnswerMap::new());
        assert_eq!(result.total_score, 0);
        assert_eq!(result.avg_score, 0.0);
        assert_eq!(result.max_score, 100);
        assert_eq!(result.level, Level::Beginner);
        assert_eq!(result.stage_scores.len(), 5);
        for entry in &result.stage_scores {
            assert_eq!(entry.score.raw_score, 0);
            assert_eq!(entry.score.max_score, 20);
        }
    }

    #[test]
    fn unknown_value_scores_zero_and_is_reported() {
        let bank = bank();
        let answers = answers(&[("keywords_status", "Z"), ("hours_info", "E"), ("nope", "A")]);
        let result = calculate_score(&bank, &answers);
        assert_eq!(result.total_score, 5);

        let unknown = unknown_answers(&bank, &answers);
        let ids: Vec<_> = unknown.iter().map(|u| u.question_id.as_str()).collect();
        assert_eq!(ids, vec!["keywords_status", "nope"]);
    }

    #[test]
    fn stage_lookup_by_name() {
        let result = calculate_score(&bank(), &answers(&[("image_quality", "D")]));
        let stage = result.stage_score("클릭하게 한다").expect("stage present");
        assert_eq!(stage.raw_score, 4);
        assert_eq!(stage.avg_score, 1.0);
        assert!(result.stage_score("missing").is_none());
    }

    #[test]
    fn serializes_stage_entries_flat() {
        let result = calculate_score(&bank(), &answers(&[("keywords_status", "B")]));
        let value = serde_json::to_value(&result).expect("serialize result");
        let first = &value["stage_scores"][0];
        assert_eq!(first["stage"], "인식하게 한다");
        assert_eq!(first["raw_score"], 2);
        assert_eq!(first["avg_score"], 0.5);
        assert_eq!(first["max_score"], 20);
        assert_eq!(value["level"]["name"], "초보 단계");
    }
}
