//! healthscan.toml 통합 설정 테스트
//!
//! - healthscan.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use healthscan_core::config::HealthscanConfig;
use healthscan_core::error::{ConfigError, HealthscanError};

// =============================================================================
// healthscan.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../healthscan.toml.example");
    let config = HealthscanConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.general.log_format, "pretty");
    assert!(config.catalog.path.is_empty());
    assert!(config.catalog.include_builtin);
    assert_eq!(config.catalog.max_file_size, 1_048_576);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../healthscan.toml.example");
    let config = HealthscanConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../healthscan.toml.example");
    let parsed = HealthscanConfig::parse(content).expect("should parse");
    let defaults = HealthscanConfig::default();

    assert_eq!(parsed.scanner.max_frames, defaults.scanner.max_frames);
    assert_eq!(parsed.scanner.min_code_len, defaults.scanner.min_code_len);
    assert_eq!(parsed.scanner.max_code_len, defaults.scanner.max_code_len);
    assert_eq!(parsed.pricing.enabled, defaults.pricing.enabled);
    assert_eq!(parsed.conditions, defaults.conditions);
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn load_partial_file_merges_with_defaults() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("healthscan.toml");
    fs::write(&path, "[conditions]\nhypertension = true\n").expect("should write config");

    let config = HealthscanConfig::load(&path).await.expect("should load");
    assert!(config.conditions.hypertension);
    assert!(!config.conditions.diabetes);
    assert_eq!(config.general.log_format, "pretty");
}

#[tokio::test]
#[serial]
async fn load_empty_file_uses_defaults() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").expect("should write empty file");

    let config = HealthscanConfig::load(&path).await.expect("should load");
    assert!(config.pricing.enabled);
}

#[tokio::test]
#[serial]
async fn load_resolves_catalog_path_against_config_dir() {
    let dir = TempDir::new().expect("should create temp dir");
    let conf_dir = dir.path().join("conf");
    fs::create_dir(&conf_dir).expect("should create conf dir");
    let path = conf_dir.join("healthscan.toml");
    fs::write(&path, "[catalog]\npath = \"data/products.json\"\n").expect("should write config");

    let config = HealthscanConfig::load(&path).await.expect("should load");
    assert_eq!(
        config.catalog.path,
        conf_dir.join("data/products.json").display().to_string()
    );
}

#[tokio::test]
#[serial]
async fn load_keeps_absolute_catalog_path() {
    let dir = TempDir::new().expect("should create temp dir");
    let catalog = dir.path().join("products.json");
    let path = dir.path().join("nested").join("healthscan.toml");
    fs::create_dir_all(path.parent().expect("has parent")).expect("should create dir");
    fs::write(
        &path,
        format!("[catalog]\npath = {:?}\n", catalog.display().to_string()),
    )
    .expect("should write config");

    let config = HealthscanConfig::load(&path).await.expect("should load");
    assert_eq!(config.catalog.path, catalog.display().to_string());
}

#[tokio::test]
async fn load_malformed_file_fails() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let err = HealthscanConfig::load(&path).await.unwrap_err();
    assert!(matches!(
        err,
        HealthscanError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn load_invalid_value_fails_validation() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("invalid.toml");
    fs::write(&path, "[scanner]\nmin_code_len = 20\nmax_code_len = 10\n")
        .expect("should write config");

    let err = HealthscanConfig::load(&path).await.unwrap_err();
    assert!(matches!(
        err,
        HealthscanError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn load_missing_file_is_not_found() {
    let err = HealthscanConfig::load("/nonexistent/healthscan.toml")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HealthscanError::Config(ConfigError::FileNotFound { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn env_overrides_file_values() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("healthscan.toml");
    fs::write(&path, "[pricing]\nenabled = true\n").expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("HEALTHSCAN_PRICING_ENABLED", "false") };
    let result = HealthscanConfig::load(&path).await;
    unsafe { std::env::remove_var("HEALTHSCAN_PRICING_ENABLED") };

    let config = result.expect("should load");
    assert!(!config.pricing.enabled, "env var should win over file");
}

#[tokio::test]
#[serial]
async fn env_override_invalid_value_is_rejected_by_validation() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("healthscan.toml");
    fs::write(&path, "").expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("HEALTHSCAN_GENERAL_LOG_FORMAT", "xml") };
    let result = HealthscanConfig::load(&path).await;
    unsafe { std::env::remove_var("HEALTHSCAN_GENERAL_LOG_FORMAT") };

    assert!(result.is_err(), "invalid env value should fail validation");
}
