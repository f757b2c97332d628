//! 워크플로 -- 스캔 / 바코드 / 수동 입력 / 결과 탭 상태 머신
//!
//! [`Session`]은 한 번의 사용 세션 동안의 입력과 마지막 결과를 보유합니다.
//! 바코드 조회나 수동 분석이 끝나면 항상 결과 탭으로 이동합니다.
//! 스캔 실패(카메라 획득 실패)만이 사용자에게 알림을 남기고 스캔 탭에 머무릅니다.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use healthscan_core::config::HealthscanConfig;
use healthscan_core::error::ScanError;
use healthscan_core::types::{HealthCondition, HealthConditions, Product, StorePrice};

use crate::catalog::ProductCatalog;
use crate::classifier::IngredientClassifier;
use crate::pricing::PriceTable;

/// 수동 분석 결과의 상품명
pub const MANUAL_ANALYSIS_NAME: &str = "Custom Ingredient Analysis";

/// 워크플로 탭
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Scan,
    Barcode,
    Manual,
    Results,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Barcode => write!(f, "barcode"),
            Self::Manual => write!(f, "manual"),
            Self::Results => write!(f, "results"),
        }
    }
}

/// 결과가 만들어진 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultSource {
    /// 카탈로그에 있는 바코드
    BarcodeMatch,
    /// 카탈로그에 없는 바코드
    BarcodeMiss,
    /// 수동 성분 분석
    Manual,
}

/// 조회/분류에 필요한 불변 데이터 묶음
#[derive(Debug, Clone)]
pub struct Analyzer {
    catalog: ProductCatalog,
    classifier: IngredientClassifier,
    prices: PriceTable,
    pricing_enabled: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(
            ProductCatalog::builtin(),
            IngredientClassifier::default(),
            PriceTable::default(),
        )
    }
}

impl Analyzer {
    pub fn new(catalog: ProductCatalog, classifier: IngredientClassifier, prices: PriceTable) -> Self {
        Self {
            catalog,
            classifier,
            prices,
            pricing_enabled: true,
        }
    }

    /// 가격 비교 표시 여부를 설정합니다.
    pub fn with_pricing(mut self, enabled: bool) -> Self {
        self.pricing_enabled = enabled;
        self
    }

    /// 설정과 이미 로드된 카탈로그로 분석기를 구성합니다.
    pub fn from_config(config: &HealthscanConfig, catalog: ProductCatalog) -> Self {
        Self::new(catalog, IngredientClassifier::default(), PriceTable::default())
            .with_pricing(config.pricing.enabled)
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &IngredientClassifier {
        &self.classifier
    }

    /// 새 세션을 시작합니다.
    pub fn session(&self, conditions: HealthConditions) -> Session<'_> {
        Session::new(self, conditions)
    }
}

/// 결과 탭 뷰 모델
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    /// 세션 ID
    pub session_id: String,
    /// 결과 경로
    pub source: ResultSource,
    /// 상품 레코드
    pub product: Product,
    /// 매장 가격 비교 (바코드 매칭 시에만)
    pub store_comparison: Vec<StorePrice>,
    /// 사용자가 선택한 상태 중 이 상품이 주의 대상인 것
    pub condition_alerts: Vec<HealthCondition>,
}

/// 사용 세션
#[derive(Debug)]
pub struct Session<'a> {
    analyzer: &'a Analyzer,
    id: Uuid,
    tab: Tab,
    barcode_input: String,
    manual_ingredients: String,
    conditions: HealthConditions,
    product: Option<(ResultSource, Product)>,
    store_comparison: Vec<StorePrice>,
    notice: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(analyzer: &'a Analyzer, conditions: HealthConditions) -> Self {
        Self {
            analyzer,
            id: Uuid::new_v4(),
            tab: Tab::default(),
            barcode_input: String::new(),
            manual_ingredients: String::new(),
            conditions,
            product: None,
            store_comparison: Vec::new(),
            notice: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// 탭 사이를 자유롭게 이동합니다.
    pub fn select_tab(&mut self, tab: Tab) {
        debug!(session = %self.id, from = %self.tab, to = %tab, "tab selected");
        self.tab = tab;
    }

    pub fn set_barcode_input(&mut self, code: impl Into<String>) {
        self.barcode_input = code.into();
    }

    pub fn barcode_input(&self) -> &str {
        &self.barcode_input
    }

    pub fn set_manual_ingredients(&mut self, text: impl Into<String>) {
        self.manual_ingredients = text.into();
    }

    pub fn manual_ingredients(&self) -> &str {
        &self.manual_ingredients
    }

    pub fn conditions(&self) -> &HealthConditions {
        &self.conditions
    }

    /// 건강 상태 체크박스 토글
    pub fn set_condition(&mut self, condition: HealthCondition, selected: bool) {
        self.conditions.set(condition, selected);
    }

    /// 마지막 스캔 실패 알림
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref().map(|(_, product)| product)
    }

    pub fn store_comparison(&self) -> &[StorePrice] {
        &self.store_comparison
    }

    /// 바코드 입력을 조회하고 결과 탭으로 이동합니다.
    ///
    /// 매칭되면 가격 비교를 채우고, 매칭되지 않으면 비웁니다.
    pub fn submit_barcode(&mut self) -> &Product {
        let analyzer = self.analyzer;
        let (source, product) = match analyzer.catalog.lookup(&self.barcode_input) {
            Some(product) => {
                self.store_comparison = if analyzer.pricing_enabled {
                    analyzer.prices.compare(product)
                } else {
                    Vec::new()
                };
                (ResultSource::BarcodeMatch, product.clone())
            }
            None => {
                self.store_comparison.clear();
                (
                    ResultSource::BarcodeMiss,
                    analyzer.catalog.resolve(&self.barcode_input),
                )
            }
        };
        debug!(session = %self.id, code = %self.barcode_input, ?source, "barcode submitted");
        self.finish(source, product)
    }

    /// 수동 입력 성분을 분석하고 결과 탭으로 이동합니다.
    pub fn analyze_manual(&mut self) -> &Product {
        let warnings = self.analyzer.classifier.classify(&self.manual_ingredients);
        let product = Product::new(MANUAL_ANALYSIS_NAME, self.manual_ingredients.clone())
            .with_warnings(warnings);
        self.store_comparison.clear();
        debug!(session = %self.id, warnings = product.warnings.len(), "manual analysis finished");
        self.finish(ResultSource::Manual, product)
    }

    /// 스캐너가 디코딩한 바코드를 입력으로 받아 조회합니다.
    pub fn accept_scan(&mut self, code: impl Into<String>) -> &Product {
        self.barcode_input = code.into();
        self.submit_barcode()
    }

    /// 스캔 실패를 기록합니다.
    ///
    /// 알림 하나를 남기고 스캔 탭(스캔 이전 상태)에 머무릅니다. 이전 결과는 유지됩니다.
    pub fn report_scan_failure(&mut self, err: &ScanError) {
        warn!(session = %self.id, error = %err, "scan failed");
        self.notice = Some(scan_notice(err));
        self.tab = Tab::Scan;
    }

    /// 결과 탭 뷰 모델. 아직 결과가 없으면 `None`입니다.
    pub fn results(&self) -> Option<ResultsView> {
        let (source, product) = self.product.as_ref()?;
        Some(ResultsView {
            session_id: self.id.to_string(),
            source: *source,
            product: product.clone(),
            store_comparison: self.store_comparison.clone(),
            condition_alerts: product.condition_alerts(&self.conditions),
        })
    }

    fn finish(&mut self, source: ResultSource, product: Product) -> &Product {
        self.notice = None;
        self.tab = Tab::Results;
        &self.product.insert((source, product)).1
    }
}

/// 스캔 실패를 사용자 알림 문구로 변환합니다.
pub fn scan_notice(err: &ScanError) -> String {
    match err {
        ScanError::PermissionDenied(_) | ScanError::CameraUnavailable(_) => {
            "Could not access the camera. Please check permissions.".to_owned()
        }
        ScanError::Cancelled => "Scan cancelled.".to_owned(),
        ScanError::NoBarcodeDetected { .. } => {
            "No barcode detected. Try again or enter the barcode manually.".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthscan_core::types::WarningKind;

    fn analyzer() -> Analyzer {
        Analyzer::default()
    }

    #[test]
    fn new_session_starts_on_scan_tab() {
        let analyzer = analyzer();
        let session = analyzer.session(HealthConditions::default());
        assert_eq!(session.tab(), Tab::Scan);
        assert!(session.results().is_none());
        assert!(session.notice().is_none());
    }

    #[test]
    fn select_tab_is_free_navigation() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.select_tab(Tab::Manual);
        assert_eq!(session.tab(), Tab::Manual);
        session.select_tab(Tab::Results);
        assert_eq!(session.tab(), Tab::Results);
        assert!(session.results().is_none(), "results tab may be empty");
    }

    #[test]
    fn barcode_hit_attaches_prices_and_advances() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.select_tab(Tab::Barcode);
        session.set_barcode_input("123456789");

        let product = session.submit_barcode();
        assert_eq!(product.name, "Coca-Cola");
        assert_eq!(session.tab(), Tab::Results);
        assert_eq!(session.store_comparison().len(), 3);

        let view = session.results().unwrap();
        assert_eq!(view.source, ResultSource::BarcodeMatch);
        assert_eq!(view.store_comparison.len(), 3);
    }

    #[test]
    fn barcode_miss_clears_prices() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.set_barcode_input("123456789");
        session.submit_barcode();

        session.set_barcode_input("000000000");
        let product = session.submit_barcode();
        assert_eq!(product.name, "Unknown Product");
        assert_eq!(session.tab(), Tab::Results);
        assert!(session.store_comparison().is_empty());
        assert_eq!(session.results().unwrap().source, ResultSource::BarcodeMiss);
    }

    #[test]
    fn pricing_disabled_never_attaches_prices() {
        let analyzer = analyzer().with_pricing(false);
        let mut session = analyzer.session(HealthConditions::default());
        session.set_barcode_input("987654321");
        session.submit_barcode();
        assert!(session.store_comparison().is_empty());
    }

    #[test]
    fn manual_analysis_builds_custom_product() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.set_barcode_input("123456789");
        session.submit_barcode();

        session.select_tab(Tab::Manual);
        session.set_manual_ingredients("Oats, Cane Sugar, Coffee Extract (caffeine)");
        let product = session.analyze_manual();

        assert_eq!(product.name, MANUAL_ANALYSIS_NAME);
        assert_eq!(product.ingredients, "Oats, Cane Sugar, Coffee Extract (caffeine)");
        let kinds: Vec<_> = product.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::HighSugar, WarningKind::Caffeine]);
        assert!(product.alternatives.is_empty());
        assert!(product.conditions.is_none());
        assert_eq!(session.tab(), Tab::Results);
        assert!(session.store_comparison().is_empty(), "manual analysis has no prices");
        assert_eq!(session.results().unwrap().source, ResultSource::Manual);
    }

    #[test]
    fn manual_analysis_of_empty_text_has_no_warnings() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        let product = session.analyze_manual();
        assert!(product.warnings.is_empty());
    }

    #[test]
    fn accept_scan_submits_decoded_code() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        let product = session.accept_scan("987654321");
        assert_eq!(product.name, "Whole Wheat Bread");
        assert_eq!(session.barcode_input(), "987654321");
        assert_eq!(session.tab(), Tab::Results);
    }

    #[test]
    fn scan_failure_stays_on_scan_tab_with_notice() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.report_scan_failure(&ScanError::PermissionDenied("camera".to_owned()));

        assert_eq!(session.tab(), Tab::Scan);
        assert_eq!(
            session.notice(),
            Some("Could not access the camera. Please check permissions.")
        );
        assert!(session.results().is_none());
    }

    #[test]
    fn successful_lookup_clears_notice() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.report_scan_failure(&ScanError::CameraUnavailable("none".to_owned()));
        session.accept_scan("123456789");
        assert!(session.notice().is_none());
    }

    #[test]
    fn condition_alerts_follow_selected_conditions() {
        let analyzer = analyzer();
        let mut session = analyzer.session(HealthConditions::default());
        session.set_barcode_input("123456789");
        session.submit_barcode();
        assert!(session.results().unwrap().condition_alerts.is_empty());

        session.set_condition(HealthCondition::Diabetes, true);
        let view = session.results().unwrap();
        assert_eq!(view.condition_alerts, vec![HealthCondition::Diabetes]);
        // 경고 목록은 상태 선택과 무관합니다.
        assert_eq!(view.product.warnings.len(), 2);
    }

    #[test]
    fn results_view_serializes() {
        let analyzer = analyzer();
        let conditions: HealthConditions = [HealthCondition::GlutenIntolerance].into_iter().collect();
        let mut session = analyzer.session(conditions);
        session.accept_scan("987654321");

        let json = serde_json::to_value(session.results().unwrap()).unwrap();
        assert_eq!(json["source"], "barcode-match");
        assert_eq!(json["product"]["name"], "Whole Wheat Bread");
        assert_eq!(json["condition_alerts"][0], "gluten-intolerance");
        assert_eq!(json["store_comparison"][0]["store"], "Walmart");
    }

    #[test]
    fn scan_notice_wording() {
        assert_eq!(scan_notice(&ScanError::Cancelled), "Scan cancelled.");
        assert!(scan_notice(&ScanError::NoBarcodeDetected { frames: 3 }).contains("manually"));
    }
}
