//! 매장 가격 비교
//!
//! 가격은 상품과 무관한 고정 데이터입니다. 실제 가격 조회 서비스가 아닙니다.

use healthscan_core::types::{Product, StorePrice};

/// 고정 가격표
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: Vec<StorePrice>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(vec![
            StorePrice::new("Walmart", "$1.50"),
            StorePrice::new("Target", "$1.75"),
            StorePrice::new("Amazon", "$1.65"),
        ])
    }
}

impl PriceTable {
    pub fn new(prices: Vec<StorePrice>) -> Self {
        Self { prices }
    }

    /// 상품의 매장별 가격 목록. 현재 상품 내용은 결과에 영향을 주지 않습니다.
    pub fn compare(&self, _product: &Product) -> Vec<StorePrice> {
        self.prices.clone()
    }
}
