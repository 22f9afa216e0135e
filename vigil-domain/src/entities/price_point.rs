// Price observation entity
// One historical price sample, recorded on first sight or on price change

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub item_id: String,
    pub price: Decimal,
    pub time_ms: i64,
    pub source: String,
}
