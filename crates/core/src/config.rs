//! 설정 관리: healthscan.toml 파싱 및 런타임 설정
//!
//! [`HealthscanConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HEALTHSCAN_CATALOG_PATH=products.json` 형식)
//! 3. 설정 파일 (`healthscan.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), healthscan_core::error::HealthscanError> {
//! use healthscan_core::config::HealthscanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HealthscanConfig::load("healthscan.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HealthscanConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, HealthscanError};

/// 허용되는 로그 레벨
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
use crate::types::HealthConditions;

/// healthscan 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 상품 카탈로그 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 스캐너(프레임 디코딩) 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// 가격 비교 설정
    #[serde(default)]
    pub pricing: PricingConfig,
    /// 기본 선택 건강 상태
    #[serde(default)]
    pub conditions: HealthConditions,
}

impl HealthscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HealthscanError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값을 사용하는 [`load`](Self::load)입니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, HealthscanError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(HealthscanError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HealthscanError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HealthscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HealthscanError::Io(e)
            }
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.catalog.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HealthscanError> {
        toml::from_str(toml_str).map_err(|e| {
            HealthscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HEALTHSCAN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HEALTHSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HEALTHSCAN_GENERAL_LOG_FORMAT");

        // Catalog
        override_string(&mut self.catalog.path, "HEALTHSCAN_CATALOG_PATH");
        override_bool(
            &mut self.catalog.include_builtin,
            "HEALTHSCAN_CATALOG_INCLUDE_BUILTIN",
        );
        override_u64(
            &mut self.catalog.max_file_size,
            "HEALTHSCAN_CATALOG_MAX_FILE_SIZE",
        );

        // Scanner
        override_usize(&mut self.scanner.max_frames, "HEALTHSCAN_SCANNER_MAX_FRAMES");
        override_usize(
            &mut self.scanner.min_code_len,
            "HEALTHSCAN_SCANNER_MIN_CODE_LEN",
        );
        override_usize(
            &mut self.scanner.max_code_len,
            "HEALTHSCAN_SCANNER_MAX_CODE_LEN",
        );

        // Pricing
        override_bool(&mut self.pricing.enabled, "HEALTHSCAN_PRICING_ENABLED");

        // Conditions
        override_bool(
            &mut self.conditions.diabetes,
            "HEALTHSCAN_CONDITIONS_DIABETES",
        );
        override_bool(
            &mut self.conditions.hypertension,
            "HEALTHSCAN_CONDITIONS_HYPERTENSION",
        );
        override_bool(
            &mut self.conditions.gluten_intolerance,
            "HEALTHSCAN_CONDITIONS_GLUTEN_INTOLERANCE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HealthscanError> {
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", LOG_LEVELS.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.catalog.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.max_file_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.scanner.min_code_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanner.min_code_len".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.scanner.min_code_len > self.scanner.max_code_len {
            return Err(ConfigError::InvalidValue {
                field: "scanner.min_code_len".to_owned(),
                reason: format!(
                    "must not exceed scanner.max_code_len ({})",
                    self.scanner.max_code_len
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 상품 카탈로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON 카탈로그 파일 경로 (비어 있으면 내장 카탈로그만 사용)
    pub path: String,
    /// 파일 카탈로그에 내장 상품을 병합할지 여부 (파일 항목이 우선)
    pub include_builtin: bool,
    /// 카탈로그 파일 최대 크기 (바이트)
    pub max_file_size: u64,
}

impl CatalogConfig {
    /// 상대 경로인 `path`를 `base` 기준으로 바꿉니다.
    ///
    /// 설정 파일의 카탈로그 경로는 설정 파일이 있는 디렉터리 기준입니다.
    /// 환경변수로 지정한 경로는 현재 디렉터리 기준 그대로 둡니다.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.path.is_empty() || Path::new(&self.path).is_absolute() {
            return;
        }
        self.path = base.join(&self.path).display().to_string();
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            include_builtin: true,
            max_file_size: 1024 * 1024, // 1MB
        }
    }
}

/// 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 최대 처리 프레임 수 (0이면 스트림 종료까지)
    pub max_frames: usize,
    /// 바코드로 인정할 최소 자릿수
    pub min_code_len: usize,
    /// 바코드로 인정할 최대 자릿수
    pub max_code_len: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_frames: 0,
            min_code_len: 8,   // EAN-8
            max_code_len: 14,  // GTIN-14
        }
    }
}

/// 가격 비교 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// 바코드 조회 성공 시 매장 가격 비교 표시 여부
    pub enabled: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
