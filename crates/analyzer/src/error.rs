//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 카탈로그 파일 로딩과 스캔 경로에서만 발생합니다.
//! 조회와 분류 자체는 실패하지 않습니다.
//! `From<AnalyzerError> for HealthscanError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.

use healthscan_core::error::{CatalogError, HealthscanError, ScanError};

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 카탈로그 파일 읽기 실패
    #[error("catalog load error: {path}: {reason}")]
    CatalogLoad {
        /// 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 카탈로그 JSON 파싱 실패
    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    /// 카탈로그 파일 크기 초과
    #[error("catalog too large: {path}: {size} bytes (max: {max})")]
    CatalogTooLarge {
        /// 파일 경로
        path: String,
        /// 실제 크기 (바이트)
        size: u64,
        /// 최대 허용 크기 (바이트)
        max: u64,
    },

    /// 동일 바코드 중복
    #[error("duplicate barcode: {0}")]
    DuplicateCode(String),

    /// 카메라/프레임 소스 에러
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl From<AnalyzerError> for HealthscanError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::CatalogLoad { path, reason } => {
                HealthscanError::Catalog(CatalogError::LoadFailed { path, reason })
            }
            AnalyzerError::CatalogParse(msg) => {
                HealthscanError::Catalog(CatalogError::ParseFailed(msg))
            }
            AnalyzerError::CatalogTooLarge { size, max, .. } => {
                HealthscanError::Catalog(CatalogError::TooLarge { size, max })
            }
            AnalyzerError::DuplicateCode(code) => {
                HealthscanError::Catalog(CatalogError::DuplicateCode(code))
            }
            AnalyzerError::Scan(e) => HealthscanError::Scan(e),
        }
    }
}
