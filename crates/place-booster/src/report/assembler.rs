use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::knowledge::{KnowledgeBase, KnowledgeError, Passage, TextCorpus};
use super::llm::{truncate_chars, ChatModel, LlmError, OpenAiChatClient};
use super::sections::{
    fallback_report, summary_section, template_report, themed_weak_areas, DiagnosisReport,
    ReportSource, REPORT_TITLE,
};
use crate::config::{ContentConfig, LlmConfig};
use crate::diagnosis::{DiagnosisResult, Improvement};
use crate::error::AppError;

const SECTION_CHAR_LIMIT: usize = 800;
const CONSULT_CHAR_LIMIT: usize = 1000;
const PASSAGES_PER_AREA: usize = 2;
const CONSULT_PASSAGES: usize = 3;

const CONSULT_APOLOGY: &str = "응답 생성 중 오류가 발생했습니다. 다시 시도해주세요.";

const GENERIC_TIPS: &str = "네이버 스마트 플레이스 최적화 일반 팁:
1. 매력적인 이미지 사용하기
2. 핵심 키워드 포함하기
3. 상세한 비즈니스 설명 제공하기
4. 정기적인 콘텐츠 업데이트하기
5. 고객 리뷰 관리하기";

/// Result of report generation. A fallback still carries a complete report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Generated(DiagnosisReport),
    Fallback {
        report: DiagnosisReport,
        reason: String,
    },
}

impl ReportOutcome {
    pub fn report(&self) -> &DiagnosisReport {
        match self {
            ReportOutcome::Generated(report) | ReportOutcome::Fallback { report, .. } => report,
        }
    }

    pub fn into_report(self) -> DiagnosisReport {
        match self {
            ReportOutcome::Generated(report) | ReportOutcome::Fallback { report, .. } => report,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            ReportOutcome::Generated(_) => None,
            ReportOutcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ReportOutcome::Fallback { .. })
    }
}

/// Free-form answer from the consultation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Consultation {
    pub answer: String,
    pub source: ReportSource,
}

#[derive(Debug, thiserror::Error)]
enum GenerationError {
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Turns a diagnosis into narrative sections, optionally grounded on a
/// knowledge base and written by a chat model.
#[derive(Clone)]
pub struct ReportAssembler {
    model: Option<Arc<dyn ChatModel>>,
    knowledge: Option<Arc<dyn KnowledgeBase>>,
    timeout: Duration,
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("model", &self.model.is_some())
            .field("knowledge", &self.knowledge.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ReportAssembler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            model: None,
            knowledge: None,
            timeout,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeBase>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Wires the OpenAI-compatible client (when a key is configured) and the
    /// on-disk text corpus.
    pub fn from_config(llm: &LlmConfig, content: &ContentConfig) -> Result<Self, AppError> {
        let mut assembler = Self::new(llm.timeout);

        match OpenAiChatClient::from_config(llm)? {
            Some(client) => {
                tracing::info!(model = client.model(), "report writer uses chat model");
                assembler = assembler.with_model(Arc::new(client));
            }
            None => tracing::info!("OPENAI_API_KEY not set; reports use the template writer"),
        }

        let corpus = TextCorpus::load(&content.data_dir)?;
        Ok(assembler.with_knowledge(Arc::new(corpus)))
    }

    pub async fn assemble(
        &self,
        result: &DiagnosisResult,
        improvement: &Improvement,
    ) -> ReportOutcome {
        let Some(model) = &self.model else {
            return ReportOutcome::Generated(template_report(result, improvement));
        };

        match self.model_report(model.as_ref(), result, improvement).await {
            Ok(report) => ReportOutcome::Generated(report),
            Err(error) => {
                tracing::warn!(%error, "report generation failed; serving fallback report");
                ReportOutcome::Fallback {
                    report: fallback_report(result.level.name()),
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Answers a free-form question, grounded on up to three passages.
    pub async fn consult(&self, question: &str) -> Consultation {
        let Some(model) = &self.model else {
            tracing::warn!("consultation requested without a configured chat model");
            return apology();
        };

        let context = match &self.knowledge {
            Some(knowledge) => match knowledge.search(question, CONSULT_PASSAGES) {
                Ok(passages) if !passages.is_empty() => join_passages(&passages),
                Ok(_) => GENERIC_TIPS.to_string(),
                Err(error) => {
                    tracing::warn!(%error, "knowledge search failed; using generic tips");
                    GENERIC_TIPS.to_string()
                }
            },
            None => GENERIC_TIPS.to_string(),
        };

        let prompt = consult_prompt(question, &context);
        match self.complete(model.as_ref(), &prompt).await {
            Ok(answer) => Consultation {
                answer: truncate_chars(&answer, CONSULT_CHAR_LIMIT),
                source: ReportSource::Model,
            },
            Err(error) => {
                tracing::warn!(%error, "consultation failed");
                apology()
            }
        }
    }

    async fn model_report(
        &self,
        model: &dyn ChatModel,
        result: &DiagnosisResult,
        improvement: &Improvement,
    ) -> Result<DiagnosisReport, GenerationError> {
        let mut contexts = BTreeMap::new();
        if let Some(knowledge) = &self.knowledge {
            for stage in improvement.weak_stage_names() {
                let query = format!("네이버 스마트 플레이스 {stage} 전략과 성공 사례");
                let passages = knowledge.search(&query, PASSAGES_PER_AREA)?;
                contexts.insert(stage, join_passages(&passages));
            }
        }

        let level = result.level.name();
        let focus = themed_weak_areas(improvement, 2).join(", ");
        let reference = improvement
            .weak_stage_names()
            .take(2)
            .map(|stage| contexts.get(stage).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");

        let mut sections = Vec::with_capacity(SECTION_BRIEFS.len());
        for (heading, brief) in SECTION_BRIEFS {
            let prompt = section_prompt(heading, brief, level, &focus, &reference);
            let text = self.complete(model, &prompt).await?;
            sections.push(truncate_chars(&text, SECTION_CHAR_LIMIT));
        }

        let [current_diagnosis, action_plan, upgrade_tips]: [String; 3] = sections
            .try_into()
            .map_err(|_| LlmError::EmptyResponse)?;

        Ok(DiagnosisReport {
            title: REPORT_TITLE.to_string(),
            level: level.to_string(),
            summary: summary_section(result, improvement),
            current_diagnosis,
            action_plan,
            upgrade_tips,
            source: ReportSource::Model,
        })
    }

    async fn complete(&self, model: &dyn ChatModel, prompt: &str) -> Result<String, LlmError> {
        match tokio::time::timeout(self.timeout, model.complete(prompt)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }
}

/// Heading and writing brief for each model-written section, in report order.
const SECTION_BRIEFS: [(&str, &str); 3] = [
    (
        "# 📊 현재 진단",
        "현황과 문제점, 개선 필요성을 구체적으로 분석해 주세요.",
    ),
    (
        "# 🎯 액션 플랜",
        "실질적으로 실행할 수 있는 구체적 전략과 단계별 실천 방안을 제시해 주세요.",
    ),
    (
        "# 💡 업그레이드 팁",
        "경쟁사와 차별화할 수 있는 고급 팁과 실전 사례를 제시해 주세요.",
    ),
];

fn section_prompt(heading: &str, brief: &str, level: &str, focus: &str, reference: &str) -> String {
    format!(
        "당신은 네이버 스마트 플레이스 최적화 전문가입니다. 아래 진단 결과와 참고 자료를 바탕으로\n{heading}\n{SECTION_CHAR_LIMIT}자 이내로, {brief}\n진단 레벨: {level}\n집중 개선 영역: {focus}\n참고 자료:\n{reference}"
    )
}

fn consult_prompt(question: &str, context: &str) -> String {
    format!(
        "당신은 네이버 스마트 플레이스 최적화 전문가입니다. 아래 질문에 대해 {CONSULT_CHAR_LIMIT}자 이내로, 실제 사례와 통계, 최신 트렌드를 반영하여 전문적으로 답변하세요. 각 소제목은 이모티콘(예: # 📊, # 🎯, # 💡)으로 구분해 주세요.\n\n참고 자료:\n{context}\n\n질문: {question}\n\n답변 형식 예시:\n# 📊 현황 분석\n(현황)\n# 🎯 핵심 전략\n(전략)\n# 💡 실전 팁\n(팁)\n\n답변:"
    )
}

fn join_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|passage| passage.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn apology() -> Consultation {
    Consultation {
        answer: CONSULT_APOLOGY.to_string(),
        source: ReportSource::Fallback,
    }
}
