// Activity kind value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    PriceManipulation,
    UnrealisticQuantity,
    RapidTransactions,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::PriceManipulation => "PRICE_MANIPULATION",
            ActivityKind::UnrealisticQuantity => "UNREALISTIC_QUANTITY",
            ActivityKind::RapidTransactions => "RAPID_TRANSACTIONS",
        }
    }
}
