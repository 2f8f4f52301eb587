use crate::infra::{parse_answer, read_answers_file};
use clap::Args;
use place_booster::config::AppConfig;
use place_booster::diagnosis::{AnswerMap, Diagnosis, QuestionBank};
use place_booster::error::AppError;
use place_booster::export::write_report;
use place_booster::{DiagnosisEngine, DiagnosisReport, ReportAssembler, ReportOutcome};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Mid-range respondent used by `demo`; lands on the 기초 단계 level.
const SAMPLE_ANSWERS: [(&str, &str); 20] = [
    ("keywords_status", "C"),
    ("description_status", "B"),
    ("location_accuracy", "C"),
    ("hours_info", "D"),
    ("image_quality", "B"),
    ("image_diversity", "C"),
    ("visual_differentiation", "B"),
    ("title_catchphrase", "A"),
    ("menu_detail", "C"),
    ("content_update", "B"),
    ("news_events", "A"),
    ("response_rate", "D"),
    ("reservation", "B"),
    ("phone_system", "C"),
    ("coupons", "B"),
    ("cta", "A"),
    ("review_collection", "C"),
    ("review_management", "B"),
    ("save_alert", "A"),
    ("regular_customers", "B"),
];

const DEMO_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Args, Debug, Default)]
pub(crate) struct DiagnoseArgs {
    /// JSON file mapping question ids to option letters
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Single answer as QUESTION_ID=VALUE; repeatable and applied after --answers
    #[arg(long, value_parser = parse_answer)]
    pub(crate) answer: Vec<(String, String)>,
    /// Print the narrative report after the scores
    #[arg(long)]
    pub(crate) report: bool,
    /// Write an HTML report into this directory
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the sample HTML report into this directory
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let bank = QuestionBank::from_config(&config.content)?;
    print!("{}", format_catalog(&bank));
    Ok(())
}

pub(crate) async fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let DiagnoseArgs {
        answers,
        answer,
        report,
        export,
    } = args;

    let config = AppConfig::load()?;
    let engine = DiagnosisEngine::new(Arc::new(QuestionBank::from_config(&config.content)?));

    let mut answer_map = match answers {
        Some(path) => read_answers_file(&path)?,
        None => AnswerMap::new(),
    };
    answer_map.extend(answer);

    for unknown in engine.unknown_answers(&answer_map) {
        println!(
            "warning: ignoring answer {}={} (unknown question or option)",
            unknown.question_id, unknown.value
        );
    }

    let diagnosis = engine.diagnose(&answer_map);
    print!("{}", format_diagnosis(&diagnosis));

    if !report && export.is_none() {
        return Ok(());
    }

    let assembler = ReportAssembler::from_config(&config.llm, &config.content)?;
    let outcome = assembler
        .assemble(&diagnosis.result, &diagnosis.improvement)
        .await;
    finish_report(&diagnosis, outcome, report, export.as_deref())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = DiagnosisEngine::standard()?;
    let answers: AnswerMap = SAMPLE_ANSWERS
        .iter()
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .collect();

    println!("Smart Place self-diagnosis demo ({} answers)", answers.len());
    let diagnosis = engine.diagnose(&answers);
    print!("{}", format_diagnosis(&diagnosis));

    let outcome = ReportAssembler::new(DEMO_TIMEOUT)
        .assemble(&diagnosis.result, &diagnosis.improvement)
        .await;
    finish_report(&diagnosis, outcome, true, args.export.as_deref())
}

fn finish_report(
    diagnosis: &Diagnosis,
    outcome: ReportOutcome,
    print_report: bool,
    export: Option<&Path>,
) -> Result<(), AppError> {
    if let Some(reason) = outcome.fallback_reason() {
        println!("\nReport writer unavailable ({reason}); showing the default report");
    }
    let report = outcome.into_report();

    if print_report {
        print!("\n{}", format_report(&report));
    }
    if let Some(dir) = export {
        let path = write_report(dir, &diagnosis.result, &diagnosis.improvement, &report)?;
        println!("\nReport exported to {}", path.display());
    }
    Ok(())
}

fn format_catalog(bank: &QuestionBank) -> String {
    let mut out = String::new();
    for (index, stage) in bank.stages().iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, stage.name).expect("write stage");
        for question in &stage.questions {
            writeln!(out, "  [{}] {}", question.id, question.prompt).expect("write question");
            for option in &question.options {
                writeln!(out, "    {}) {}", option.value, option.text).expect("write option");
            }
        }
    }
    out
}

fn format_diagnosis(diagnosis: &Diagnosis) -> String {
    let result = &diagnosis.result;
    let mut out = String::new();

    writeln!(
        out,
        "Level: {} (avg {:.1}/5, total {}/{})",
        result.level.name(),
        result.avg_score,
        result.total_score,
        result.max_score
    )
    .expect("write level");
    writeln!(out, "  {}", result.level.description()).expect("write description");
    writeln!(out, "  Next: {}", result.level.next_step()).expect("write next step");

    out.push_str("Stage scores:\n");
    for entry in &result.stage_scores {
        writeln!(
            out,
            "  - {}: {}/{} (avg {:.1})",
            entry.stage, entry.score.raw_score, entry.score.max_score, entry.score.avg_score
        )
        .expect("write stage score");
    }

    out.push_str("Focus areas:\n");
    for area in &diagnosis.improvement.weak_areas {
        writeln!(out, "  - {} (avg {:.1})", area.stage, area.avg_score).expect("write area");
        for item in &area.action_items {
            writeln!(out, "      * {item}").expect("write action item");
        }
    }
    writeln!(out, "Suggestion: {}", diagnosis.improvement.overall_suggestion)
        .expect("write suggestion");
    out
}

fn format_report(report: &DiagnosisReport) -> String {
    let mut out = String::new();
    writeln!(out, "{} [{}]", report.title, report.source.label()).expect("write title");
    for (_, body) in report.sections() {
        writeln!(out, "\n{}", body.trim_end()).expect("write section");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diagnosis() -> Diagnosis {
        let answers: AnswerMap = SAMPLE_ANSWERS
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect();
        DiagnosisEngine::standard()
            .expect("standard catalog")
            .diagnose(&answers)
    }

    #[test]
    fn sample_answers_cover_every_question() {
        let engine = DiagnosisEngine::standard().expect("standard catalog");
        let answers: AnswerMap = SAMPLE_ANSWERS
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect();
        assert_eq!(answers.len(), engine.bank().question_count());
        assert!(engine.unknown_answers(&answers).is_empty());
    }

    #[test]
    fn diagnosis_summary_lists_scores_and_focus_areas() {
        let text = format_diagnosis(&sample_diagnosis());
        assert!(text.starts_with("Level: 기초 단계 (avg 2.3/5, total 46/100)"));
        assert!(text.contains("  - 인식하게 한다: 12/20 (avg 3.0)"));
        assert!(text.contains("  - 클릭하게 한다 (avg 2.0)"));
    }

    #[test]
    fn catalog_listing_shows_every_option() {
        let bank = QuestionBank::standard().expect("standard catalog");
        let text = format_catalog(&bank);
        assert!(text.starts_with("1. 인식하게 한다\n  [keywords_status] 대표 키워드 설정 상태\n"));
        assert_eq!(text.lines().filter(|line| line.starts_with("    ")).count(), 100);
    }

    #[tokio::test]
    async fn demo_exports_template_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("exports");
        run_demo(DemoArgs {
            export: Some(target.clone()),
        })
        .await
        .expect("demo runs");

        let exported = std::fs::read_dir(&target)
            .expect("export dir exists")
            .filter_map(Result::ok)
            .count();
        assert_eq!(exported, 1);
    }
}
