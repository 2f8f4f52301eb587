use super::catalog::{AnswerOption, Question, Stage, OPTION_VALUES};

type QuestionRow = (&'static str, &'static str, [&'static str; 5]);

/// Built-in Smart Place catalog in wizard order. Option texts run A through E.
const STANDARD_CATALOG: [(&str, [QuestionRow; 4]); 5] = [
    (
        "인식하게 한다",
        [
            (
                "keywords_status",
                "대표 키워드 설정 상태",
                [
                    "키워드를 전혀 설정하지 않았다",
                    "1-2개 정도 기본적인 키워드만 설정했다",
                    "업종 관련 키워드 3-5개 정도 설정했다",
                    "다양한 키워드(지역명, 상황, 특징 등)를 체계적으로 설정했다",
                    "경쟁업체 분석을 통해 최적화된 키워드를 지속적으로 관리한다",
                ],
            ),
            (
                "description_status",
                "상세 설명 작성 상태",
                [
                    "상세 설명을 작성하지 않았다",
                    "간단한 정보만 기재했다 (1-2문장)",
                    "기본 정보와 매장 특징을 포함해 작성했다",
                    "핵심 키워드를 포함한 자세한 설명과 스토리를 작성했다",
                    "정기적으로 업데이트하며 키워드를 전략적으로 배치했다",
                ],
            ),
            (
                "location_accuracy",
                "매장 위치 정보 정확도",
                [
                    "주소만 기재했다",
                    "주소와 간단한 길 안내를 추가했다",
                    "주변 랜드마크와 대중교통 정보를 포함했다",
                    "상세한 찾아오는 길과 주차 정보까지 제공한다",
                    "위치 태그와 내비게이션 연동이 완벽하게 설정되어 있다",
                ],
            ),
            (
                "hours_info",
                "영업시간, 휴무일 정보 업데이트",
                [
                    "영업시간 정보가 없거나 부정확하다",
                    "기본적인 영업시간만 등록되어 있다",
                    "영업시간과 휴무일이 정확히 등록되어 있다",
                    "브레이크 타임, 라스트 오더 시간까지 상세히 기재되어 있다",
                    "특별 영업일, 임시 휴무 등의 변동사항도 실시간으로 업데이트한다",
                ],
            ),
        ],
    ),
    (
        "클릭하게 한다",
        [
            (
                "image_quality",
                "대표 이미지 품질",
                [
                    "이미지를 등록하지 않았거나 저품질 이미지를 사용 중이다",
                    "기본적인 매장/메뉴 사진이 등록되어 있다",
                    "매장 분위기와 대표 메뉴 사진이 잘 촬영되어 있다",
                    "전문적으로 촬영된 고품질 이미지를 사용하고 있다",
                    "시즌별, 메뉴별 다양한 고품질 이미지를 정기적으로 업데이트한다",
                ],
            ),
            (
                "image_diversity",
                "이미지 구성의 다양성",
                [
                    "이미지가 없거나 1-2개만 등록되어 있다",
                    "비슷한 유형의 이미지만 3-5개 정도 있다",
                    "매장 외관, 내부, 메뉴 등 다양한 측면의 이미지가 있다",
                    "전략적으로 구성된 다양한 이미지(공간, 메뉴, 서비스 등)가 있다",
                    "매장의 모든 강점을 보여주는 체계적인 이미지 포트폴리오가 있다",
                ],
            ),
            (
                "visual_differentiation",
                "매장 차별점의 시각적 표현",
                [
                    "매장 차별점이 이미지에서 드러나지 않는다",
                    "매장의 기본적인 특징만 확인할 수 있다",
                    "매장의 주요 차별점이 이미지를 통해 어느 정도 드러난다",
                    "매장의 독특한 분위기와 특별한 경험이 이미지에 잘 표현되어 있다",
                    "매장만의 고유한 가치와 스토리가 이미지를 통해 강력하게 전달된다",
                ],
            ),
            (
                "title_catchphrase",
                "플레이스 제목과 캐치프레이즈",
                [
                    "기본 상호명만 있다",
                    "상호명과 간단한 업종 설명이 있다",
                    "매장 특징을 나타내는 간단한 문구가 포함되어 있다",
                    "고객 관심을 끌 수 있는 매력적인 캐치프레이즈가 있다",
                    "차별화된 가치를 명확히 전달하는 강력한 문구가 있다",
                ],
            ),
        ],
    ),
    (
        "머물게 한다",
        [
            (
                "menu_detail",
                "메뉴/서비스 정보의 상세도",
                [
                    "메뉴/서비스 정보가 없거나 매우 기본적이다",
                    "메뉴명과 가격 정도만 나열되어 있다",
                    "메뉴 설명과 이미지가 함께 제공된다",
                    "재료, 조리법, 추천 포인트 등 상세한 정보가 있다",
                    "메뉴 스토리, 식재료 출처, 먹는 방법까지 풍부한 정보가 있다",
                ],
            ),
            (
                "content_update",
                "콘텐츠 업데이트 주기",
                [
                    "개설 이후 거의 업데이트하지 않았다",
                    "필요할 때만 간헐적으로 업데이트한다",
                    "1-2개월에 한 번 정도 업데이트한다",
                    "2주에 한 번 이상 정기적으로 업데이트한다",
                    "주 1회 이상 새로운 콘텐츠나 소식을 추가한다",
                ],
            ),
            (
                "news_events",
                "소식/이벤트 활용도",
                [
                    "소식/이벤트 기능을 사용하지 않는다",
                    "가끔 중요한 공지사항만 올린다",
                    "월 1회 정도 소식이나 이벤트를 게시한다",
                    "정기적으로 다양한 소식과 이벤트를 업데이트한다",
                    "전략적으로 계획된 다양한 콘텐츠를 지속적으로 게시한다",
                ],
            ),
            (
                "response_rate",
                "사용자 질문 응답률",
                [
                    "질문에 거의 응답하지 않는다",
                    "일부 질문에만 늦게 응답한다",
                    "대부분의 질문에 1-2일 내에 응답한다",
                    "모든 질문에 24시간 이내 응답한다",
                    "매우 신속하게(몇 시간 이내) 상세히 응답한다",
                ],
            ),
        ],
    ),
    (
        "연락오게 한다",
        [
            (
                "reservation",
                "예약 기능 활성화",
                [
                    "예약 기능을 설정하지 않았다",
                    "기본적인 예약 기능만 활성화했다",
                    "예약 기능이 활성화되어 있고 가끔 관리한다",
                    "예약 기능을 적극 활용하고 빠르게 대응한다",
                    "예약 전용 혜택과 함께 완벽하게 관리되고 있다",
                ],
            ),
            (
                "phone_system",
                "전화 응대 시스템",
                [
                    "스마트콜을 설정하지 않았다",
                    "스마트콜만 설정해 놓았다",
                    "스마트콜을 영업시간 동안 대체로 응대한다",
                    "스마트콜에 매우 빠르게 응대하고 있다",
                    "스마트콜 응대와 함께 부재 시 콜백 시스템도 갖추고 있다",
                ],
            ),
            (
                "coupons",
                "쿠폰/할인 혜택 제공",
                [
                    "쿠폰이나 할인 혜택을 제공하지 않는다",
                    "간헐적으로 간단한 할인 혜택을 제공한다",
                    "정기적인 쿠폰이나 할인 프로모션을 진행한다",
                    "다양한 타겟층을 위한 여러 유형의 혜택을 제공한다",
                    "전략적으로 설계된 단계별 고객 혜택 시스템을 운영한다",
                ],
            ),
            (
                "cta",
                "방문/구매 전환 유도 문구",
                [
                    "특별한 전환 유도 문구가 없다",
                    "기본적인 방문/구매 안내만 있다",
                    "명확한 행동 유도 문구가 있다",
                    "혜택과 함께 강력한 행동 유도 문구를 사용한다",
                    "고객 상황별 맞춤형 전환 유도 시스템을 갖추고 있다",
                ],
            ),
        ],
    ),
    (
        "후속 피드백 받는다",
        [
            (
                "review_collection",
                "리뷰 수집 활동",
                [
                    "리뷰 수집을 위한 활동을 하지 않는다",
                    "가끔 리뷰를 요청하는 정도다",
                    "영수증 리뷰 이벤트를 진행 중이다",
                    "체계적인 리뷰 수집 시스템을 운영 중이다",
                    "다양한 채널을 통한 종합적인 리뷰 수집 전략을 실행 중이다",
                ],
            ),
            (
                "review_management",
                "리뷰 관리와 응대",
                [
                    "리뷰에 거의 응답하지 않는다",
                    "긍정적인 리뷰에만 가끔 응답한다",
                    "대부분의 리뷰에 기본적인 답변을 한다",
                    "모든 리뷰에 개인화된 답변을 남긴다",
                    "리뷰 내용을 분석하고 서비스 개선에 적극 반영한다",
                ],
            ),
            (
                "save_alert",
                "저장/알림 받기 유도",
                [
                    "저장/알림 받기를 유도하지 않는다",
                    "기본적인 안내만 있다",
                    "저장/알림 받기를 위한 간단한 혜택을 제공한다",
                    "저장/알림 받기를 위한 특별한 인센티브를 제공한다",
                    "저장/알림 받은 고객을 위한 전용 혜택 시스템이 있다",
                ],
            ),
            (
                "regular_customers",
                "단골 고객 관리 프로그램",
                [
                    "특별한 단골 고객 관리를 하지 않는다",
                    "기본적인 단골 고객 혜택만 있다",
                    "정기적인 단골 고객 이벤트를 진행한다",
                    "체계적인 단골 고객 관리 시스템을 운영 중이다",
                    "고객 세그먼트별 차별화된 충성도 프로그램을 운영한다",
                ],
            ),
        ],
    ),
];

pub(crate) fn standard_stages() -> Vec<Stage> {
    STANDARD_CATALOG
        .iter()
        .map(|(name, rows)| Stage {
            name: (*name).to_string(),
            questions: rows.iter().map(question_from_row).collect(),
        })
        .collect()
}

fn question_from_row((id, prompt, texts): &QuestionRow) -> Question {
    Question {
        id: (*id).to_string(),
        prompt: (*prompt).to_string(),
        options: OPTION_VALUES
            .iter()
            .zip(texts.iter())
            .enumerate()
            .map(|(index, (value, text))| AnswerOption {
                value: (*value).to_string(),
                text: (*text).to_string(),
                score: (index + 1) as u8,
            })
            .collect(),
    }
}
