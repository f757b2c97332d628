//! 상품 카탈로그 -- 바코드 조회
//!
//! [`ProductCatalog`]는 바코드 → [`Product`] 매핑을 보유하는 불변 값입니다.
//! 조회는 항상 성공합니다: 알 수 없는 바코드는 "Unknown Product" 레코드로 대체됩니다.
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "code": "123456789",
//!     "name": "Coca-Cola",
//!     "ingredients": "Carbonated Water, Sugar, ...",
//!     "warnings": [{ "type": "high-sugar", "message": "High sugar content: 39g per can" }],
//!     "conditions": ["diabetes", "hypertension"],
//!     "alternatives": ["Coca-Cola Zero Sugar", "Sparkling Water"]
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use healthscan_core::config::CatalogConfig;
use healthscan_core::types::{HealthCondition, Product, Warning, WarningKind};

use crate::error::AnalyzerError;

/// 조회 실패 시 상품명
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// 조회 실패 시 성분 표시
pub const UNKNOWN_INGREDIENTS: &str = "N/A";

/// 조회 실패 경고 메시지
pub const UNKNOWN_PRODUCT_MESSAGE: &str = "Product not found in database";

/// 카탈로그 파일 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 바코드
    pub code: String,
    /// 상품 레코드
    #[serde(flatten)]
    pub product: Product,
}

/// 바코드 → 상품 카탈로그
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: HashMap<String, Product>,
}

impl ProductCatalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 내장 카탈로그
    pub fn builtin() -> Self {
        let mut products = HashMap::new();
        products.insert(
            "123456789".to_owned(),
            Product::new(
                "Coca-Cola",
                "Carbonated Water, Sugar, Caramel Color, Phosphoric Acid, Natural Flavors, Caffeine",
            )
            .with_warnings(vec![
                Warning::new(WarningKind::HighSugar, "High sugar content: 39g per can"),
                Warning::new(WarningKind::Caffeine, "Contains caffeine"),
            ])
            .with_conditions([HealthCondition::Diabetes, HealthCondition::Hypertension])
            .with_alternatives(["Coca-Cola Zero Sugar", "Sparkling Water"]),
        );
        products.insert(
            "987654321".to_owned(),
            Product::new(
                "Whole Wheat Bread",
                "Whole Wheat Flour, Water, Yeast, Salt, Sugar",
            )
            .with_conditions([HealthCondition::GlutenIntolerance])
            .with_alternatives(["Gluten-free Bread"]),
        );
        Self { products }
    }

    /// 항목 목록으로 카탈로그를 생성합니다.
    ///
    /// 같은 바코드가 두 번 나오면 [`AnalyzerError::DuplicateCode`]를 반환합니다.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, AnalyzerError> {
        let mut products = HashMap::with_capacity(entries.len());
        for entry in entries {
            if products.contains_key(&entry.code) {
                return Err(AnalyzerError::DuplicateCode(entry.code));
            }
            products.insert(entry.code, entry.product);
        }
        Ok(Self { products })
    }

    /// JSON 문자열에서 카탈로그를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, AnalyzerError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| AnalyzerError::CatalogParse(format!("failed to parse catalog JSON: {e}")))?;
        Self::from_entries(entries)
    }

    /// JSON 파일에서 카탈로그를 로드합니다.
    ///
    /// # Note
    ///
    /// 동기 I/O를 수행합니다. async 컨텍스트에서는
    /// `tokio::task::spawn_blocking`으로 감싸세요.
    pub fn load_file(path: &Path, max_file_size: u64) -> Result<Self, AnalyzerError> {
        let metadata = std::fs::metadata(path).map_err(|e| AnalyzerError::CatalogLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if metadata.len() > max_file_size {
            return Err(AnalyzerError::CatalogTooLarge {
                path: path.display().to_string(),
                size: metadata.len(),
                max: max_file_size,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::CatalogLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let catalog = Self::from_json(&content)?;
        debug!(path = %path.display(), products = catalog.len(), "catalog file loaded");
        Ok(catalog)
    }

    /// 설정에 따라 카탈로그를 구성합니다.
    ///
    /// - `path`가 비어 있으면 내장 카탈로그
    /// - `path`가 있으면 파일 카탈로그 (+ `include_builtin`이면 내장 상품 병합, 파일 우선)
    pub fn from_config(config: &CatalogConfig) -> Result<Self, AnalyzerError> {
        if config.path.is_empty() {
            return Ok(Self::builtin());
        }

        let file = Self::load_file(Path::new(&config.path), config.max_file_size)?;
        if config.include_builtin {
            Ok(Self::builtin().merged_with(file))
        } else {
            Ok(file)
        }
    }

    /// `other`의 항목으로 덮어쓴 새 카탈로그를 반환합니다.
    pub fn merged_with(mut self, other: ProductCatalog) -> Self {
        self.products.extend(other.products);
        self
    }

    /// 바코드와 정확히 일치하는 상품을 찾습니다.
    pub fn lookup(&self, code: &str) -> Option<&Product> {
        self.products.get(code)
    }

    /// 바코드를 상품으로 해석합니다.
    ///
    /// 일치하는 항목이 있으면 그대로, 없으면 [`unknown_product`]를 반환합니다.
    /// 빈 문자열이나 형식이 잘못된 입력도 에러 없이 처리됩니다.
    pub fn resolve(&self, code: &str) -> Product {
        match self.lookup(code) {
            Some(product) => {
                debug!(code, product = %product.name, "barcode resolved");
                product.clone()
            }
            None => {
                debug!(code, "barcode not in catalog");
                unknown_product()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// 바코드 순으로 정렬된 항목 목록
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .products
            .iter()
            .map(|(code, product)| CatalogEntry {
                code: code.clone(),
                product: product.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }
}

/// 카탈로그에 없는 바코드에 대한 대체 레코드
pub fn unknown_product() -> Product {
    Product::new(UNKNOWN_PRODUCT_NAME, UNKNOWN_INGREDIENTS).with_warnings(vec![Warning::new(
        WarningKind::Unknown,
        UNKNOWN_PRODUCT_MESSAGE,
    )])
}
