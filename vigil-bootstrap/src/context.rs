use std::sync::Arc;

use anyhow::Result;

use vigil_application::{AppState, Metrics};
use vigil_domain::services::{AnomalyDetector, PriceLedger};
use vigil_infrastructure::AppConfig;

pub struct AppContext {
    pub config: AppConfig,
    pub state: AppState,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        let config = AppConfig::load()?;
        let ledger = Arc::new(PriceLedger::new());
        let detector = Arc::new(AnomalyDetector::new(Arc::clone(&ledger)));
        let state = AppState {
            ledger,
            detector,
            metrics: Arc::new(Metrics::default()),
        };
        Ok(Self { config, state })
    }
}
