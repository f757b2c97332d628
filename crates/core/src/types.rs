//! 도메인 타입: 상품, 경고, 가격, 건강 상태
//!
//! 모든 값은 생성 후 변경되지 않는 불변 레코드로 취급합니다.
//! 하나의 조회 결과보다 오래 유지되는 관계는 없습니다.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 상품 레코드
///
/// 카탈로그 조회, 조회 실패 시 합성, 또는 수동 성분 분석으로 생성됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// 상품명
    pub name: String,
    /// 성분 목록 (자유 텍스트)
    pub ingredients: String,
    /// 건강 경고 (순서 유지)
    #[serde(default)]
    pub warnings: Vec<Warning>,
    /// 이 상품이 주의 대상인 건강 상태
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<BTreeSet<HealthCondition>>,
    /// 더 건강한 대체 상품 (순서 유지)
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Product {
    /// 경고/대체품/상태 태그가 없는 상품을 생성합니다.
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
            warnings: Vec::new(),
            conditions: None,
            alternatives: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = HealthCondition>) -> Self {
        self.conditions = Some(conditions.into_iter().collect());
        self
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    /// 사용자가 선택한 건강 상태 중 이 상품이 주의 대상인 것들을 반환합니다.
    ///
    /// 경고 목록 자체는 건드리지 않습니다. 결과는 `HealthCondition` 정렬 순서입니다.
    pub fn condition_alerts(&self, selected: &HealthConditions) -> Vec<HealthCondition> {
        match &self.conditions {
            Some(tags) => tags
                .iter()
                .copied()
                .filter(|c| selected.is_selected(*c))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} warnings)", self.name, self.warnings.len())
    }
}

/// 건강 경고
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// 경고 종류
    #[serde(rename = "type")]
    pub kind: WarningKind,
    /// 사용자에게 보여줄 메시지
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// 경고 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// 당 함량
    HighSugar,
    /// 카페인
    Caffeine,
    /// 글루텐
    Gluten,
    /// 카탈로그에 없는 바코드 (수동 분석에서는 생성되지 않음)
    Unknown,
}

impl WarningKind {
    /// 직렬화 이름과 동일한 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSugar => "high-sugar",
            Self::Caffeine => "caffeine",
            Self::Gluten => "gluten",
            Self::Unknown => "unknown",
        }
    }

    /// 표시 단계
    pub fn tier(&self) -> WarningTier {
        match self {
            Self::HighSugar | Self::Caffeine | Self::Gluten => WarningTier::Alert,
            Self::Unknown => WarningTier::Info,
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 경고 표시 단계 (경고 아이콘 / 정보 아이콘)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningTier {
    Alert,
    Info,
}

/// 매장별 가격
///
/// 상품과 무관한 고정 데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePrice {
    /// 매장명
    pub store: String,
    /// 표시 가격 (통화 기호 포함)
    pub price: String,
}

impl StorePrice {
    pub fn new(store: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            price: price.into(),
        }
    }
}

/// 건강 상태 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    #[serde(alias = "glutenIntolerance", alias = "gluten_intolerance")]
    GlutenIntolerance,
}

impl HealthCondition {
    /// 정의된 모든 상태 (표시 순서)
    pub const ALL: [HealthCondition; 3] = [
        HealthCondition::Diabetes,
        HealthCondition::Hypertension,
        HealthCondition::GlutenIntolerance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Hypertension => "hypertension",
            Self::GlutenIntolerance => "gluten-intolerance",
        }
    }

    /// 사람이 읽는 이름
    pub fn label(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Hypertension => "Hypertension",
            Self::GlutenIntolerance => "Gluten Intolerance",
        }
    }

    /// 문자열에서 상태를 파싱합니다.
    ///
    /// 대소문자, `-`/`_`/공백 구분자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "diabetes" => Some(Self::Diabetes),
            "hypertension" => Some(Self::Hypertension),
            "glutenintolerance" | "gluten" | "celiac" => Some(Self::GlutenIntolerance),
            _ => None,
        }
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자가 선택한 건강 상태
///
/// 상태마다 하나의 불리언 필드를 가집니다. `[conditions]` 설정 섹션과 같은 모양입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConditions {
    pub diabetes: bool,
    pub hypertension: bool,
    pub gluten_intolerance: bool,
}

impl HealthConditions {
    pub fn is_selected(&self, condition: HealthCondition) -> bool {
        match condition {
            HealthCondition::Diabetes => self.diabetes,
            HealthCondition::Hypertension => self.hypertension,
            HealthCondition::GlutenIntolerance => self.gluten_intolerance,
        }
    }

    pub fn set(&mut self, condition: HealthCondition, selected: bool) {
        match condition {
            HealthCondition::Diabetes => self.diabetes = selected,
            HealthCondition::Hypertension => self.hypertension = selected,
            HealthCondition::GlutenIntolerance => self.gluten_intolerance = selected,
        }
    }

    /// 선택된 상태 목록 (표시 순서)
    pub fn selected(&self) -> Vec<HealthCondition> {
        HealthCondition::ALL
            .into_iter()
            .filter(|c| self.is_selected(*c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !(self.diabetes || self.hypertension || self.gluten_intolerance)
    }
}

impl FromIterator<HealthCondition> for HealthConditions {
    fn from_iter<T: IntoIterator<Item = HealthCondition>>(iter: T) -> Self {
        let mut conditions = Self::default();
        for condition in iter {
            conditions.set(condition, true);
        }
        conditions
    }
}
