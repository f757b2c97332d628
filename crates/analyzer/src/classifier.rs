//! 성분 분류기 -- 키워드 부분 문자열 매칭
//!
//! 입력 텍스트를 소문자로 정규화한 뒤, 고정된 순서의 키워드 어휘를 차례로 검사합니다.
//! 키워드가 몇 번 등장하든 경고는 키워드당 최대 한 번 추가됩니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use healthscan_core::types::{Warning, WarningKind};

/// 키워드 규칙 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// 검색할 부분 문자열 (소문자로 저장)
    pub keyword: String,
    /// 매칭 시 생성할 경고 종류
    pub kind: WarningKind,
    /// 매칭 시 생성할 경고 메시지
    pub message: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            kind,
            message: message.into(),
        }
    }
}

/// 성분 분류기
///
/// 어휘는 생성 시 고정되며 이후 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct IngredientClassifier {
    rules: Vec<KeywordRule>,
}

impl Default for IngredientClassifier {
    fn default() -> Self {
        Self::new(default_vocabulary())
    }
}

impl IngredientClassifier {
    /// 주어진 어휘로 분류기를 생성합니다. 규칙 순서가 곧 출력 순서입니다.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| KeywordRule {
                keyword: rule.keyword.to_lowercase(),
                ..rule
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// 성분 텍스트에서 경고 목록을 생성합니다.
    ///
    /// 매칭되는 키워드가 없으면 빈 목록을 반환합니다
    /// (`unknown` 경고는 바코드 조회 실패 전용입니다).
    pub fn classify(&self, text: &str) -> Vec<Warning> {
        let normalized = text.to_lowercase();
        let warnings: Vec<Warning> = self
            .rules
            .iter()
            .filter(|rule| !rule.keyword.is_empty() && normalized.contains(&rule.keyword))
            .map(|rule| Warning::new(rule.kind, rule.message.clone()))
            .collect();

        debug!(
            input_len = text.len(),
            warnings = warnings.len(),
            "ingredients classified"
        );
        warnings
    }
}

/// 기본 어휘: sugar → caffeine → gluten
pub fn default_vocabulary() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("sugar", WarningKind::HighSugar, "Contains added sugar"),
        KeywordRule::new("caffeine", WarningKind::Caffeine, "Contains caffeine"),
        KeywordRule::new("gluten", WarningKind::Gluten, "Contains gluten"),
    ]
}
