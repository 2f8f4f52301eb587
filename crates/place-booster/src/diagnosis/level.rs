use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Maturity tier derived from the overall average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Beginner,
    Basic,
    Developing,
    Expert,
    Master,
}

impl Level {
    pub const fn ordered() -> [Level; 5] {
        [
            Level::Beginner,
            Level::Basic,
            Level::Developing,
            Level::Expert,
            Level::Master,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Basic => "basic",
            Level::Developing => "developing",
            Level::Expert => "expert",
            Level::Master => "master",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Level::Beginner => "초보 단계",
            Level::Basic => "기초 단계",
            Level::Developing => "발전 단계",
            Level::Expert => "전문가 단계",
            Level::Master => "마스터 단계",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Level::Beginner => "네이버 플레이스 마케팅의 기초부터 시작해야 합니다. 기본적인 정보 등록과 키워드 설정부터 시작하세요.",
            Level::Basic => "기본적인 설정은 되어 있으나, 체계적인 관리가 필요합니다. 콘텐츠 품질과 다양성을 높여보세요.",
            Level::Developing => "플레이스 마케팅의 기본기가 잘 갖춰져 있습니다. 더 전략적인 접근으로 한 단계 발전시키세요.",
            Level::Expert => "높은 수준의 플레이스 마케팅을 실행하고 있습니다. 세부적인 최적화로 완성도를 높이세요.",
            Level::Master => "최고 수준의 플레이스 마케팅을 구현하고 있습니다. 지속적인 혁신으로 경쟁 우위를 유지하세요.",
        }
    }

    pub const fn next_step(self) -> &'static str {
        match self {
            Level::Beginner => "기본 정보 등록과 대표 키워드 설정에 집중하세요.",
            Level::Basic => "이미지 품질 향상과 상세 설명 최적화에 집중하세요.",
            Level::Developing => "리뷰 관리와 콘텐츠 업데이트 주기를 개선하세요.",
            Level::Expert => "고객 세그먼트별 전략과 전환율 최적화에 집중하세요.",
            Level::Master => "트렌드 분석과 데이터 기반 의사결정으로 더 발전시키세요.",
        }
    }

    /// Lower bound (inclusive) of the average score that reaches this level.
    pub const fn threshold(self) -> f64 {
        match self {
            Level::Beginner => 0.0,
            Level::Basic => 1.5,
            Level::Developing => 2.5,
            Level::Expert => 3.5,
            Level::Master => 4.5,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|level| level.name() == name.trim())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Level", 4)?;
        state.serialize_field("key", self.key())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("description", self.description())?;
        state.serialize_field("next_step", self.next_step())?;
        state.end()
    }
}

/// Classifies an average score; each upper bound is exclusive and the top
/// tier covers everything from 4.5 upward.
pub fn determine_level(avg_score: f64) -> Level {
    Level::ordered()
        .into_iter()
        .rev()
        .find(|level| avg_score >= level.threshold())
        .unwrap_or(Level::Beginner)
}
