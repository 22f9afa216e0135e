use std::sync::Arc;

use vigil_domain::services::{AnomalyDetector, PriceLedger};

use crate::Metrics;

// The detector must be built over the same ledger handle it is stored
// next to; bootstrap wires that up.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<PriceLedger>,
    pub detector: Arc<AnomalyDetector>,
    pub metrics: Arc<Metrics>,
}
