//! 에러 타입: 도메인별 에러 정의
//!
//! 상품 조회(`resolve`)와 성분 분류(`classify`)는 실패하지 않습니다.
//! 여기 정의된 에러는 설정, 카탈로그 파일, 카메라(프레임 소스)처럼
//! 바깥 협력자에서만 발생합니다.

/// healthscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HealthscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 카탈로그 파일 에러
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// 스캔(카메라) 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 카탈로그 파일 에러
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 파일 읽기 실패
    #[error("failed to load catalog {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// JSON 파싱 실패
    #[error("failed to parse catalog: {0}")]
    ParseFailed(String),

    /// 파일 크기 초과
    #[error("catalog file too large: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: u64 },

    /// 동일 바코드가 파일 안에 두 번 등장
    #[error("duplicate barcode in catalog: {0}")]
    DuplicateCode(String),
}

/// 스캔(카메라) 에러
///
/// 시스템 전체에서 사용자에게 보이는 유일한 실패 경로입니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// 장치를 열 수 없음
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// 접근 권한 거부
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// 사용자가 스캔을 취소함
    #[error("scan cancelled")]
    Cancelled,

    /// 프레임 스트림이 끝날 때까지 바코드를 찾지 못함
    #[error("no barcode detected after {frames} frames")]
    NoBarcodeDetected { frames: usize },
}

impl ScanError {
    /// 장치 획득 단계의 실패인지 여부
    ///
    /// 획득 실패는 워크플로를 스캔 이전 상태로 되돌립니다.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(self, Self::CameraUnavailable(_) | Self::PermissionDenied(_))
    }
}
