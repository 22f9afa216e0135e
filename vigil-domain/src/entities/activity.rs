// Suspicious activity entity
// A finding produced when a detection rule fires

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::current_millis;
use crate::value_objects::ActivityKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousActivity {
    pub id: String,
    pub user_id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub severity: f64,
    pub detected_at_ms: i64,
    pub evidence: ActivityEvidence,
}

impl SuspiciousActivity {
    pub fn new(
        kind: ActivityKind,
        user_id: impl Into<String>,
        description: impl Into<String>,
        severity: f64,
        evidence: ActivityEvidence,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            description: description.into(),
            severity,
            detected_at_ms: current_millis(),
            evidence,
        }
    }
}

// One closed variant per activity kind instead of a free-form key/value bag,
// so every finding carries exactly the context its rule produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvidence {
    PriceShift {
        item_id: String,
        item_name: String,
        previous_price: Decimal,
        current_price: Decimal,
        change_ratio: f64,
    },
    QuantitySpike {
        item_id: String,
        item_name: String,
        quantity: u64,
    },
    UpdateBurst {
        update_count: u64,
        window_ms: i64,
    },
}
