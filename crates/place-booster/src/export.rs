//! Standalone HTML rendering of a finished diagnosis.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::diagnosis::{DiagnosisResult, Improvement};
use crate::report::DiagnosisReport;

const STYLE: &str = "body{font-family:'Noto Sans KR',sans-serif;max-width:860px;margin:2rem auto;color:#222;line-height:1.6}\
h1{color:#03c75a}table{border-collapse:collapse;width:100%}th,td{border:1px solid #ddd;padding:.4rem .6rem;text-align:left}\
th{background:#f3f3f3}.cover{border-bottom:2px solid #03c75a;margin-bottom:1.5rem}.muted{color:#777}";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn content_type() -> mime::Mime {
    mime::TEXT_HTML_UTF_8
}

pub fn report_file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "place_optimization_report_{}.html",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn render_html(
    result: &DiagnosisResult,
    improvement: &Improvement,
    report: &DiagnosisReport,
) -> String {
    render_html_at(result, improvement, report, Local::now().naive_local())
}

pub fn render_html_at(
    result: &DiagnosisResult,
    improvement: &Improvement,
    report: &DiagnosisReport,
    generated_at: NaiveDateTime,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{}</title>", escape_html(&report.title)).expect("write title");
    writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>").expect("write style");

    html.push_str("<section class=\"cover\">\n");
    writeln!(html, "<h1>{}</h1>", escape_html(&report.title)).expect("write heading");
    writeln!(
        html,
        "<p class=\"muted\">진단일: {}</p>",
        generated_at.format("%Y년 %m월 %d일")
    )
    .expect("write date");
    writeln!(
        html,
        "<p><strong>{}</strong> · 평균 {:.1}/5 · 총점 {}/{}</p>",
        escape_html(result.level.name()),
        result.avg_score,
        result.total_score,
        result.max_score
    )
    .expect("write level");
    writeln!(html, "<p>{}</p>", escape_html(result.level.description())).expect("write description");
    writeln!(
        html,
        "<p>다음 단계: {}</p>",
        escape_html(result.level.next_step())
    )
    .expect("write next step");
    html.push_str("</section>\n");

    html.push_str("<h2>단계별 점수</h2>\n<table>\n<tr><th>단계</th><th>점수</th><th>평균</th></tr>\n");
    for entry in &result.stage_scores {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}/{}</td><td>{:.1}</td></tr>",
            escape_html(&entry.stage),
            entry.score.raw_score,
            entry.score.max_score,
            entry.score.avg_score
        )
        .expect("write stage row");
    }
    html.push_str("</table>\n");

    if !improvement.weak_areas.is_empty() {
        html.push_str("<h2>개선이 필요한 영역</h2>\n");
        for area in &improvement.weak_areas {
            writeln!(
                html,
                "<h3>{} <span class=\"muted\">({:.1}점)</span></h3>\n<ol>",
                escape_html(&area.stage),
                area.avg_score
            )
            .expect("write weak area");
            for item in &area.action_items {
                writeln!(html, "<li>{}</li>", escape_html(item)).expect("write action item");
            }
            html.push_str("</ol>\n");
        }
    }
    writeln!(
        html,
        "<p><em>{}</em></p>",
        escape_html(&improvement.overall_suggestion)
    )
    .expect("write suggestion");

    for (heading, body) in report.sections() {
        writeln!(html, "<section data-section=\"{}\">", escape_html(heading))
            .expect("write section open");
        html.push_str(&markdown_to_html(body));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Writes the rendered document into `dir` (created if missing) and returns
/// the file path.
pub fn write_report(
    dir: impl AsRef<Path>,
    result: &DiagnosisResult,
    improvement: &Improvement,
    report: &DiagnosisReport,
) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    let generated_at = Local::now().naive_local();

    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(report_file_name(generated_at));
    let html = render_html_at(result, improvement, report, generated_at);
    fs::write(&path, html).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "diagnosis report exported");
    Ok(path)
}

/// Headings, bullet and numbered lists, paragraphs and `**bold**`.
fn markdown_to_html(markdown: &str) -> String {
    let mut html = String::new();
    let mut list: Option<&'static str> = None;

    for line in markdown.lines().map(str::trim) {
        let (tag, text) = if let Some(rest) = line.strip_prefix("## ") {
            ("h4", rest)
        } else if let Some(rest) = line.strip_prefix("# ") {
            ("h3", rest)
        } else if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
            ("ul", rest)
        } else if let Some(rest) = numbered_item(line) {
            ("ol", rest)
        } else {
            ("p", line)
        };

        let in_list = matches!(tag, "ul" | "ol");
        if list.is_some() && list != Some(tag) {
            if let Some(open) = list.take() {
                writeln!(html, "</{open}>").expect("close list");
            }
        }
        if text.is_empty() {
            continue;
        }

        let body = bold(&escape_html(text));
        if in_list {
            if list.is_none() {
                writeln!(html, "<{tag}>").expect("open list");
                list = Some(tag);
            }
            writeln!(html, "<li>{body}</li>").expect("list item");
        } else {
            writeln!(html, "<{tag}>{body}</{tag}>").expect("block");
        }
    }

    if let Some(open) = list {
        writeln!(html, "</{open}>").expect("close list");
    }
    html
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn bold(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut open = false;
    let mut parts = escaped.split("**").peekable();
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            out.push_str(if open { "</strong>" } else { "<strong>" });
            open = !open;
        }
    }
    if open {
        out.push_str("</strong>");
    }
    out
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_name_uses_timestamp() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 9)
            .and_then(|date| date.and_hms_opt(14, 5, 7))
            .expect("valid timestamp");
        assert_eq!(
            report_file_name(at),
            "place_optimization_report_20250309_140507.html"
        );
    }

    #[test]
    fn markdown_lists_and_headings() {
        let html = markdown_to_html("# 제목\n\n* **굵게** 항목\n* 둘째\n1. 번호\n본문 <script>");
        assert!(html.contains("<h3>제목</h3>"));
        assert!(html.contains("<ul>\n<li><strong>굵게</strong> 항목</li>\n<li>둘째</li>\n</ul>"));
        assert!(html.contains("<ol>\n<li>번호</li>\n</ol>"));
        assert!(html.contains("<p>본문 &lt;script&gt;</p>"));
    }

    #[test]
    fn unbalanced_bold_is_closed() {
        assert_eq!(bold("a **b"), "a <strong>b</strong>");
    }

    #[test]
    fn content_type_is_utf8_html() {
        assert_eq!(content_type().to_string(), "text/html; charset=utf-8");
    }
}
