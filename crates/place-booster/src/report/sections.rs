use std::fmt::Write as _;

use serde::Serialize;

use crate::diagnosis::{DiagnosisResult, Improvement};

pub const REPORT_TITLE: &str = "네이버 스마트 플레이스 최적화 진단 보고서";

const FALLBACK_QUICK_ACTIONS: [&str; 2] = ["기본 정보 업데이트", "차별화 포인트 강화"];

/// Which writer produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Model,
    Template,
    Fallback,
}

impl ReportSource {
    pub const fn label(self) -> &'static str {
        match self {
            ReportSource::Model => "model",
            ReportSource::Template => "template",
            ReportSource::Fallback => "fallback",
        }
    }
}

/// Named narrative sections shown after a diagnosis. Section bodies are
/// Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisReport {
    pub title: String,
    pub level: String,
    pub summary: String,
    pub current_diagnosis: String,
    pub action_plan: String,
    pub upgrade_tips: String,
    pub source: ReportSource,
}

impl DiagnosisReport {
    /// `(heading, body)` pairs in display order.
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("전체 보고서 요약", self.summary.as_str()),
            ("현재 진단", self.current_diagnosis.as_str()),
            ("액션 플랜", self.action_plan.as_str()),
            ("업그레이드 팁", self.upgrade_tips.as_str()),
        ]
    }
}

/// Reader-facing theme for a stage; unknown stage names pass through.
pub fn themed_title(stage: &str) -> &str {
    match stage {
        "인식하게 한다" => "검색 노출 최적화",
        "클릭하게 한다" => "클릭율 높이는 전략",
        "머물게 한다" => "체류시간 늘리는 방법",
        "연락오게 한다" => "문의/예약 전환율 높이기",
        "후속 피드백 받는다" => "고객 재방문 유도 전략",
        other => other,
    }
}

/// Two 30-day actions per stage used by the action plan.
pub fn quick_actions(stage: &str) -> &'static [&'static str] {
    match stage {
        "인식하게 한다" => &["지역명+업종+상황별 키워드 20개 등록", "상세 설명에 키워드 자연스럽게 통합"],
        "클릭하게 한다" => &["고품질 대표 이미지 업로드", "매력적인 캐치프레이즈 개발"],
        "머물게 한다" => &["메뉴/서비스 상세 정보 강화", "정기적 콘텐츠 업데이트"],
        "연락오게 한다" => &["스마트콜 응답률 개선", "예약 인센티브 도입"],
        "후속 피드백 받는다" => &["영수증 리뷰 시스템 구축", "리뷰 관리 루틴 설정"],
        _ => &FALLBACK_QUICK_ACTIONS,
    }
}

pub(crate) fn themed_weak_areas(improvement: &Improvement, limit: usize) -> Vec<&str> {
    improvement
        .weak_stage_names()
        .take(limit)
        .map(themed_title)
        .collect()
}

pub(crate) fn summary_section(result: &DiagnosisResult, improvement: &Improvement) -> String {
    let themed = themed_weak_areas(improvement, usize::MAX);
    let first = themed.first().copied().unwrap_or("기본 정보");
    let second = themed.get(1).copied().unwrap_or("콘텐츠 품질");

    let mut summary = String::from("# 📑 전체 보고서 요약\n\n");
    writeln!(
        summary,
        "**현재 상태**: {}로, {}\n",
        result.level.name(),
        result.level.description()
    )
    .expect("write status");
    writeln!(summary, "**주요 개선 필요 영역**: {}\n", themed.join(", "))
        .expect("write weak areas");
    summary.push_str("**우선 실행 액션**:\n");
    writeln!(summary, "1. {first} 최적화").expect("write first action");
    writeln!(summary, "2. {second} 개선").expect("write second action");
    summary.push_str("3. 리뷰 수집 및 관리 체계화\n\n");
    summary.push_str("**기대 효과**: 위 액션 수행 시 약 30-50% 성과 향상 예상\n");
    summary
}

fn current_diagnosis_section(result: &DiagnosisResult, improvement: &Improvement) -> String {
    let themed = themed_weak_areas(improvement, usize::MAX);
    let focus = themed.first().copied().unwrap_or("기본 정보");

    let mut section = String::from("# 📊 현재 진단\n\n");
    writeln!(
        section,
        "현재 스마트 플레이스는 **{}**로, {}\n",
        result.level.name(),
        result.level.description()
    )
    .expect("write level");
    writeln!(section, "**주요 개선 필요 영역**: {}\n", themed.join(", "))
        .expect("write weak areas");
    section.push_str("**현재 상태가 미치는 영향**: 검색 노출 제한, 클릭률 저하, 방문/구매 전환율 감소로 인한 매출 기회 손실이 발생하고 있습니다.\n\n");
    writeln!(
        section,
        "**즉각 개선 필요**: {focus} 영역부터 집중적인 개선이 필요합니다."
    )
    .expect("write focus");
    section
}

fn action_plan_section(improvement: &Improvement) -> String {
    let mut plan = String::from("# 🎯 액션 플랜\n\n");
    plan.push_str(
        "다음 액션을 30일 내로 집중적으로 수행하여 즉각적인 성과 개선을 도모하세요:\n\n",
    );

    for stage in improvement.weak_stage_names().take(2) {
        writeln!(plan, "## {}", themed_title(stage)).expect("write stage heading");
        for action in quick_actions(stage) {
            writeln!(plan, "* **{action}**").expect("write action");
        }
        plan.push('\n');
    }

    plan.push_str("## 우선순위\n");
    plan.push_str("1. 고품질 이미지와 키워드 최적화\n");
    plan.push_str("2. 메뉴/서비스 정보 상세화\n");
    plan.push_str("3. 리뷰 수집 시스템 구축\n");
    plan
}

const UPGRADE_TIPS: &str = "# 💡 업그레이드 팁

## 즉시 실행 팁 (당장 오늘)
* 🔍 **핵심 키워드 5개 추가**: 지역명+업종+상황 조합 키워드 추가
* 📱 **스마트콜 활성화**: 실시간 고객 전화 응대 체계 구축
* 📝 **정확한 영업시간 등록**: 휴무일, 브레이크타임 포함

## 단기 개선 팁 (1-2주)
* 🖼️ **매력적인 사진 업로드**: 매장 공간과 메뉴/서비스 고화질 사진
* 📋 **차별화 포인트 강조**: 경쟁사와 구분되는 특장점 강조

## 경쟁사 차별화 전략
* 🌟 **독특한 스토리텔링**: 비즈니스만의 스토리 강조
* 🎁 **특별한 경험 제공**: 경쟁사에 없는 차별점 부각
";

/// Deterministic report built only from the diagnosis.
pub fn template_report(result: &DiagnosisResult, improvement: &Improvement) -> DiagnosisReport {
    DiagnosisReport {
        title: REPORT_TITLE.to_string(),
        level: result.level.name().to_string(),
        summary: summary_section(result, improvement),
        current_diagnosis: current_diagnosis_section(result, improvement),
        action_plan: action_plan_section(improvement),
        upgrade_tips: UPGRADE_TIPS.to_string(),
        source: ReportSource::Template,
    }
}

/// Canned report returned when generation fails.
pub fn fallback_report(level_name: &str) -> DiagnosisReport {
    DiagnosisReport {
        title: REPORT_TITLE.to_string(),
        level: level_name.to_string(),
        summary: "# 📑 전체 보고서 요약\n\n기본적인 설정은 완료되었으나 체계적인 관리가 필요합니다.".to_string(),
        current_diagnosis: "# 📊 현재 진단\n\n현재 스마트 플레이스는 기초 단계입니다. 클릭율, 검색 노출, 전환율 개선이 필요합니다.".to_string(),
        action_plan: "# 🎯 액션 플랜\n\n핵심 키워드 최적화, 이미지 품질 향상, 리뷰 관리 시스템 구축을 우선적으로 실행하세요.".to_string(),
        upgrade_tips: "# 💡 업그레이드 팁\n\n매력적인 사진 업로드, 차별화된 설명 작성, 고객 리뷰 활성화로 경쟁사와 차별화하세요.".to_string(),
        source: ReportSource::Fallback,
    }
}
