// Tracked item entity
// Current market state of one inventory item

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::current_millis;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u64,
    pub owner: String,
    pub last_updated_ms: i64,
}

impl TrackedItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        quantity: u64,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            owner: owner.into(),
            last_updated_ms: current_millis(),
        }
    }
}
