use super::level::Level;
use super::scoring::DiagnosisResult;
use serde::Serialize;

const WEAK_AREA_LIMIT: usize = 3;

static FALLBACK_ACTION_ITEMS: [&str; 2] = ["기본 정보 업데이트", "차별화 포인트 강화"];

const GENERIC_SUGGESTION: &str = "플레이스 마케팅 전략을 단계적으로 구현해 나가세요. 기본 설정부터 고객 경험 최적화까지 체계적인 접근이 중요합니다.";

/// Score band used to pick action items for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn for_score(avg_score: f64) -> Self {
        if avg_score < 2.5 {
            Tier::Low
        } else if avg_score < 4.0 {
            Tier::Medium
        } else {
            Tier::High
        }
    }

    const fn index(self) -> usize {
        match self {
            Tier::Low => 0,
            Tier::Medium => 1,
            Tier::High => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakArea {
    pub stage: String,
    pub avg_score: f64,
    pub tier: Tier,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    pub weak_areas: Vec<WeakArea>,
    pub overall_suggestion: String,
}

impl Improvement {
    pub fn weak_stage_names(&self) -> impl Iterator<Item = &str> {
        self.weak_areas.iter().map(|area| area.stage.as_str())
    }
}

/// Picks the three lowest-scoring stages (ties keep catalog order) and
/// attaches canned action items for each.
pub fn suggest_improvements(result: &DiagnosisResult) -> Improvement {
    let mut ranked: Vec<_> = result.stage_scores.iter().collect();
    // sort_by is stable, which keeps catalog order between equal averages.
    ranked.sort_by(|a, b| a.score.avg_score.total_cmp(&b.score.avg_score));

    let weak_areas = ranked
        .into_iter()
        .take(WEAK_AREA_LIMIT)
        .map(|entry| {
            let tier = Tier::for_score(entry.score.avg_score);
            WeakArea {
                stage: entry.stage.clone(),
                avg_score: entry.score.avg_score,
                tier,
                action_items: action_items(&entry.stage, tier)
                    .iter()
                    .map(|item| item.to_string())
                    .collect(),
            }
        })
        .collect();

    Improvement {
        weak_areas,
        overall_suggestion: overall_suggestion(result.level.name()).to_string(),
    }
}

/// Canned action items for a stage and tier. Stages outside the built-in
/// catalog get a short generic list.
pub fn action_items(stage: &str, tier: Tier) -> &'static [&'static str] {
    ACTION_ITEMS
        .iter()
        .find(|(name, _)| *name == stage)
        .map(|(_, tiers)| &tiers[tier.index()][..])
        .unwrap_or(&FALLBACK_ACTION_ITEMS)
}

pub fn overall_suggestion(level_name: &str) -> &'static str {
    match Level::from_name(level_name) {
        Some(Level::Beginner) => "플레이스 마케팅의 기초부터 체계적으로 시작하세요. 우선 기본 정보를 충실히 입력하고, 핵심 키워드 설정과 대표 이미지 최적화에 집중하세요. 모바일 환경에서 어떻게 보이는지 항상 체크하고, 일주일에 한 번씩 점진적으로 개선해 나가는 것이 중요합니다.",
        Some(Level::Basic) => "플레이스의 기본 설정은 잘 되어 있습니다. 이제 콘텐츠의 품질과 다양성을 높이고, 고객 리뷰 수집에 집중하세요. 경쟁업체 분석을 통해 차별화 포인트를 발굴하고, 이를 시각적으로 잘 표현할 수 있는 콘텐츠 전략을 수립하세요. 한 달에 한 번 이상 정기적인 업데이트가 중요합니다.",
        Some(Level::Developing) => "플레이스 마케팅의 기반이 잘 갖춰져 있습니다. 이제 더 전략적인 접근으로 전환율을 높이는데 집중하세요. 고객 경험을 세분화하여 각 접점에서의 만족도를 높이고, 데이터를 기반으로 한 의사결정을 통해 지속적으로 최적화하세요. 정기적인 콘텐츠 업데이트와 리뷰 관리가 중요합니다.",
        Some(Level::Expert) => "높은 수준의 플레이스 마케팅을 실행하고 있습니다. 이제 고객 세그먼트별 맞춤형 전략과 통합 마케팅 접근법으로 더 높은 성과를 창출하세요. 다양한 채널과의 시너지를 극대화하고, 고객 데이터 분석을 통한 개인화된 경험 제공에 집중하세요. 트렌드를 선도하는 혁신적인 접근법을 고민하세요.",
        Some(Level::Master) => "최고 수준의 플레이스 마케팅을 구현하고 있습니다. 지속적인 혁신과 실험을 통해 경쟁 우위를 유지하세요. 고객 인사이트를 깊이 분석하여 새로운 기회를 발굴하고, 브랜드 스토리와 가치를 더욱 효과적으로 전달할 수 있는 전략을 모색하세요. 다른 비즈니스의 벤치마크가 될 수 있는 사례를 만들어가세요.",
        None => GENERIC_SUGGESTION,
    }
}

type TierItems = [[&'static str; 3]; 3];

/// Low, medium, high.
static ACTION_ITEMS: [(&str, TierItems); 5] = [
    (
        "인식하게 한다",
        [
            [
                "기본 키워드 5개를 설정하고 상세 설명에 핵심 키워드를 포함시키세요.",
                "비즈니스의 핵심 특성을 담은,3-5문장의 상세 설명을 작성하세요.",
                "찾아오는 길에 주변 랜드마크와 대중교통 정보를 추가하세요.",
            ],
            [
                "경쟁업체의 키워드를 분석하고 틈새 키워드를 발굴하세요.",
                "상세 설명에 상황별, 시즌별 키워드를 추가하세요.",
                "위치 정보에 주차 정보와 내비게이션 링크를 추가하세요.",
            ],
            [
                "키워드 조합 원리를 활용해 5개 키워드로 100개 이상의 키워드 노출을 확보하세요.",
                "주기적으로 트렌드 키워드를 업데이트하고 성과를 모니터링하세요.",
                "독점 키워드를 발굴하여 경쟁 없는 검색 결과를 확보하세요.",
            ],
        ],
    ),
    (
        "클릭하게 한다",
        [
            [
                "고화질의 매장 사진과 대표 메뉴 사진을 최소 5장 이상 등록하세요.",
                "다양한 각도와 시간대의 매장 사진을 추가하세요.",
                "비즈니스의 특성을 한 눈에 알 수 있는 캐치프레이즈를 추가하세요.",
            ],
            [
                "시즌별, 특별 이벤트별 사진을 주기적으로 업데이트하세요.",
                "메뉴/서비스의 독특한 특성이 드러나는 사진을 추가하세요.",
                "타겟 고객층에 어필할 수 있는 차별화된 캐치프레이즈를 개발하세요.",
            ],
            [
                "전문 사진작가의 도움을 받아 브랜드 이미지와 일관된 시각적 콘텐츠를 제작하세요.",
                "매장의 분위기, 스토리, 철학이 드러나는 시각적 스토리텔링을 구현하세요.",
                "정기적인 A/B 테스트를 통해 클릭률이 가장 높은 이미지와 문구를 선별하세요.",
            ],
        ],
    ),
    (
        "머물게 한다",
        [
            [
                "모든 메뉴/서비스에 대한 기본적인 설명과 가격 정보를 등록하세요.",
                "한 달에 한 번 이상 새로운 소식이나 이벤트를 등록하세요.",
                "고객 질문에 대해 24시간 이내에 응답하는 체계를 마련하세요.",
            ],
            [
                "메뉴/서비스 설명에 재료, 특징, 추천 포인트 등 상세 정보를 추가하세요.",
                "2주에 한 번 이상 시즌 메뉴, 프로모션 등의 콘텐츠를 업데이트하세요.",
                "자주 묻는 질문과 답변 섹션을 추가하여 고객의 체류시간을 늘리세요.",
            ],
            [
                "메뉴/서비스의 스토리텔링과 차별화된 가치 제안을 통해 콘텐츠의 깊이를 더하세요.",
                "주 1회 이상 콘텐츠를 업데이트하고 알림 받기 고객을 위한 독점 콘텐츠를 제공하세요.",
                "고객 피드백과 질문을 분석하여 FAQ와 콘텐츠 개선에 적극 반영하세요.",
            ],
        ],
    ),
    (
        "연락오게 한다",
        [
            [
                "기본적인 예약 기능을 활성화하고 스마트콜 설정을 완료하세요.",
                "시즌별 할인 쿠폰이나 프로모션을 준비하세요.",
                "방문/구매를 유도하는 명확한 CTA(Call-to-Action) 문구를 추가하세요.",
            ],
            [
                "예약 확인 및 리마인더 시스템을 구축하세요.",
                "첫 방문 고객, 재방문 고객을 위한 차별화된 혜택을 제공하세요.",
                "시간대별, 요일별 특별 프로모션으로 방문 유도를 강화하세요.",
            ],
            [
                "예약 고객을 위한 VIP 서비스와 특별 혜택 시스템을 구축하세요.",
                "고객 데이터를 분석하여 개인화된 혜택과 추천을 제공하세요.",
                "고객 여정 단계별 최적화된 CTA와 전환 전략을 개발하세요.",
            ],
        ],
    ),
    (
        "후속 피드백 받는다",
        [
            [
                "영수증에 리뷰 작성 안내와 혜택을 명시하세요.",
                "모든 리뷰에 48시간 이내 답변을 제공하세요.",
                "매장 내 저장/알림 받기 안내 POP을 설치하세요.",
            ],
            [
                "영수증 QR코드를 통해 네이버 검색-플레이스-리뷰로 이어지는 경로를 안내하세요.",
                "부정적 리뷰에 대해 개선 약속과 함께 보상 시스템을 마련하세요.",
                "저장/알림 받기 고객을 위한 월간 특별 혜택을 제공하세요.",
            ],
            [
                "리뷰 데이터를 분석하여 서비스/메뉴 개선에 반영하고 그 결과를 공유하세요.",
                "백링크 경로를 활용한 리뷰 유도 시스템을 최적화하세요.",
                "단골 고객의 선호도와 방문 패턴을 분석한 개인화된 로열티 프로그램을 운영하세요.",
            ],
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::scoring::{StageScore, StageScoreEntry};

    fn result_with(averages: &[(&str, f64)]) -> DiagnosisResult {
        DiagnosisResult {
            total_score: 0,
            avg_score: 0.0,
            max_score: 100,
            level: Level::Beginner,
            stage_scores: averages
                .iter()
                .map(|(stage, avg)| StageScoreEntry {
                    stage: stage.to_string(),
                    score: StageScore {
                        raw_score: (avg * 4.0) as u32,
                        avg_score: *avg,
                        max_score: 20,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::for_score(0.0), Tier::Low);
        assert_eq!(Tier::for_score(2.49), Tier::Low);
        assert_eq!(Tier::for_score(2.5), Tier::Medium);
        assert_eq!(Tier::for_score(3.99), Tier::Medium);
        assert_eq!(Tier::for_score(4.0), Tier::High);
    }

    #[test]
    fn ranks_weakest_stages_first() {
        let result = result_with(&[
            ("인식하게 한다", 4.5),
            ("클릭하게 한다", 1.0),
            ("머물게 한다", 3.0),
            ("연락오게 한다", 2.0),
            ("후속 피드백 받는다", 5.0),
        ]);
        let improvement = suggest_improvements(&result);
        let stages: Vec<_> = improvement.weak_stage_names().collect();
        assert_eq!(stages, vec!["클릭하게 한다", "연락오게 한다", "머물게 한다"]);
        assert_eq!(improvement.weak_areas[0].tier, Tier::Low);
        assert_eq!(improvement.weak_areas[2].tier, Tier::Medium);
        assert_eq!(
            improvement.weak_areas[2].action_items[0],
            "메뉴/서비스 설명에 재료, 특징, 추천 포인트 등 상세 정보를 추가하세요."
        );
    }

    #[test]
    fn fewer_stages_are_not_padded() {
        let result = result_with(&[("인식하게 한다", 2.0)]);
        assert_eq!(suggest_improvements(&result).weak_areas.len(), 1);
    }

    #[test]
    fn unknown_stage_uses_generic_items() {
        assert_eq!(
            action_items("새 단계", Tier::High),
            &["기본 정보 업데이트", "차별화 포인트 강화"]
        );
    }

    #[test]
    fn unknown_level_name_gets_generic_suggestion() {
        assert_eq!(overall_suggestion("없는 단계"), GENERIC_SUGGESTION);
        assert!(overall_suggestion("마스터 단계").starts_with("최고 수준"));
    }
}
