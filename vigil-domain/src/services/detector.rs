use std::sync::{Arc, Mutex};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::entities::{ActivityEvidence, SuspiciousActivity, TrackedItem};
use crate::services::PriceLedger;
use crate::utils::current_millis;
use crate::value_objects::ActivityKind;

/// Relative price change above which an update counts as manipulation.
pub const PRICE_CHANGE_THRESHOLD: f64 = 0.5;
/// Updates inside the trailing window above which a user counts as bursting.
pub const RAPID_TX_THRESHOLD: usize = 10;
/// Trailing window for rapid-transaction counting.
pub const RAPID_TX_WINDOW_MS: i64 = 60_000;
/// Quantity above which a holding is considered unrealistic.
pub const QUANTITY_THRESHOLD: u64 = 100_000;
/// Threshold applied by the high-severity listing when none is given.
pub const DEFAULT_SEVERITY_THRESHOLD: f64 = 50.0;

const QUANTITY_SEVERITY_CAP: f64 = 100.0;

/// Rule-based anomaly scorer over the ledger's price history.
///
/// Reads ledger state, never mutates it; findings accumulate in an internal
/// log until purged. The ledger lock and the log lock are taken one after
/// the other, never together.
pub struct AnomalyDetector {
    ledger: Arc<PriceLedger>,
    activities: Mutex<Vec<SuspiciousActivity>>,
}

impl AnomalyDetector {
    pub fn new(ledger: Arc<PriceLedger>) -> Self {
        Self {
            ledger,
            activities: Mutex::new(Vec::new()),
        }
    }

    /// Run the price-manipulation and quantity checks against one item
    /// update, log any findings, and return them.
    pub fn analyze_item_update(&self, item: &TrackedItem) -> Vec<SuspiciousActivity> {
        let mut findings = Vec::new();
        if let Some(found) = self.check_price_manipulation(item) {
            findings.push(found);
        }
        if let Some(found) = check_quantity(item) {
            findings.push(found);
        }
        if !findings.is_empty() {
            let mut log = self.activities.lock().unwrap();
            log.extend(findings.iter().cloned());
        }
        findings
    }

    fn check_price_manipulation(&self, item: &TrackedItem) -> Option<SuspiciousActivity> {
        let history = self.ledger.price_history(&item.id);
        if history.len() < 2 {
            return None;
        }
        // earlier of the two most recent observations
        let previous = history[history.len() - 2].price;
        if previous == Decimal::ZERO {
            return None;
        }
        let current = item.price;
        let ratio = ((current - previous).abs() / previous)
            .to_f64()
            .unwrap_or(0.0);
        if ratio <= PRICE_CHANGE_THRESHOLD {
            return None;
        }
        Some(SuspiciousActivity::new(
            ActivityKind::PriceManipulation,
            item.owner.clone(),
            format!(
                "price of {} moved {} -> {} ({:.1}% change)",
                item.name,
                previous,
                current,
                ratio * 100.0
            ),
            ratio * 100.0,
            ActivityEvidence::PriceShift {
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                previous_price: previous,
                current_price: current,
                change_ratio: ratio,
            },
        ))
    }

    /// Count the supplied items owned by `user_id` and updated inside the
    /// trailing window; above the threshold, log and return a finding.
    ///
    /// The caller assembles the candidate list; the detector does not query
    /// the ledger for it.
    pub fn detect_rapid_transactions(
        &self,
        user_id: &str,
        recent_items: &[TrackedItem],
    ) -> Option<SuspiciousActivity> {
        let now = current_millis();
        let count = recent_items
            .iter()
            .filter(|item| {
                let age_ms = now - item.last_updated_ms;
                item.owner == user_id && (0..=RAPID_TX_WINDOW_MS).contains(&age_ms)
            })
            .count();
        if count <= RAPID_TX_THRESHOLD {
            return None;
        }
        let found = SuspiciousActivity::new(
            ActivityKind::RapidTransactions,
            user_id,
            format!(
                "{} item updates by {} within {}s",
                count,
                user_id,
                RAPID_TX_WINDOW_MS / 1_000
            ),
            count as f64 * 5.0,
            ActivityEvidence::UpdateBurst {
                update_count: count as u64,
                window_ms: RAPID_TX_WINDOW_MS,
            },
        );
        self.activities.lock().unwrap().push(found.clone());
        Some(found)
    }

    /// Every logged finding, newest first.
    pub fn all_activities(&self) -> Vec<SuspiciousActivity> {
        let mut all = self.activities.lock().unwrap().clone();
        all.sort_by(|a, b| b.detected_at_ms.cmp(&a.detected_at_ms));
        all
    }

    /// Logged findings for one user, newest first.
    pub fn user_activities(&self, user_id: &str) -> Vec<SuspiciousActivity> {
        let mut matching: Vec<SuspiciousActivity> = {
            let log = self.activities.lock().unwrap();
            log.iter()
                .filter(|activity| activity.user_id == user_id)
                .cloned()
                .collect()
        };
        matching.sort_by(|a, b| b.detected_at_ms.cmp(&a.detected_at_ms));
        matching
    }

    /// Findings at or above the threshold (50.0 when `None`), highest
    /// severity first; equal severities keep no particular order.
    pub fn high_severity_activities(&self, threshold: Option<f64>) -> Vec<SuspiciousActivity> {
        let threshold = threshold.unwrap_or(DEFAULT_SEVERITY_THRESHOLD);
        let mut matching: Vec<SuspiciousActivity> = {
            let log = self.activities.lock().unwrap();
            log.iter()
                .filter(|activity| activity.severity >= threshold)
                .cloned()
                .collect()
        };
        matching.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matching
    }

    /// Drop findings detected before `now - max_age_ms`; returns how many
    /// were removed.
    pub fn clear_old_activities(&self, max_age_ms: i64) -> usize {
        self.clear_activities_before(current_millis() - max_age_ms)
    }

    fn clear_activities_before(&self, cutoff_ms: i64) -> usize {
        let mut log = self.activities.lock().unwrap();
        let before = log.len();
        log.retain(|activity| activity.detected_at_ms >= cutoff_ms);
        before - log.len()
    }
}

fn check_quantity(item: &TrackedItem) -> Option<SuspiciousActivity> {
    if item.quantity <= QUANTITY_THRESHOLD {
        return None;
    }
    let severity = (item.quantity as f64 / 1_000.0).min(QUANTITY_SEVERITY_CAP);
    Some(SuspiciousActivity::new(
        ActivityKind::UnrealisticQuantity,
        item.owner.clone(),
        format!("unrealistic quantity {} of {}", item.quantity, item.name),
        severity,
        ActivityEvidence::QuantitySpike {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            quantity: item.quantity,
        },
    ))
}
