// Application-facing request and view types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpdateApi {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u64,
    pub owner: String,
}

impl ItemUpdateApi {
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            price: self.price,
            quantity: self.quantity,
            owner: self.owner.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub user: Option<String>,
    pub min_severity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceStats {
    pub item_id: String,
    pub average: Decimal,
    pub volatility: f64,
    pub samples: usize,
}
