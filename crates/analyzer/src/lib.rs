#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`AnalyzerError`)
//! - [`catalog`]: 바코드 조회 (`ProductCatalog`, `CatalogEntry`)
//! - [`classifier`]: 성분 키워드 분류 (`IngredientClassifier`, `KeywordRule`)
//! - [`pricing`]: 고정 매장 가격표 (`PriceTable`)
//! - [`scanner`]: 프레임 소스/디코더 seam (`FrameSource`, `FrameDecoder`, `BarcodeScanner`)
//! - [`workflow`]: 탭 상태 머신 (`Analyzer`, `Session`, `ResultsView`)

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod pricing;
pub mod scanner;
pub mod workflow;

// --- Public API Re-exports ---

pub use catalog::{CatalogEntry, ProductCatalog, unknown_product};
pub use classifier::{IngredientClassifier, KeywordRule};
pub use error::AnalyzerError;
pub use pricing::PriceTable;
pub use scanner::{
    BarcodeScanner, DigitFrameDecoder, Frame, FrameDecoder, FrameInput, FrameSource,
    LineFrameSource, MAX_FRAME_BYTES, ScanOutcome,
};
pub use workflow::{Analyzer, ResultSource, ResultsView, Session, Tab};
