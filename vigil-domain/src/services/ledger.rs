use std::collections::HashMap;
use std::sync::Mutex;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::entities::{PricePoint, TrackedItem};
use crate::utils::current_millis;

#[derive(Debug, Default)]
struct LedgerState {
    items: HashMap<String, TrackedItem>,
    observations: Vec<PricePoint>,
}

/// Authoritative store of current item state plus the append-only price
/// observation history.
///
/// One mutex guards the item map and the observation list together, so
/// concurrent callers always see both in a consistent state. Every getter
/// hands out clones; stored records cannot be reached from outside.
#[derive(Debug, Default)]
pub struct PriceLedger {
    state: Mutex<LedgerState>,
}

impl PriceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `item.id`.
    ///
    /// An observation is appended when the id is new or when the incoming
    /// price differs from the stored one; the stored copy gets a fresh
    /// `last_updated_ms` stamp.
    pub fn upsert_item(&self, mut item: TrackedItem) {
        let now = current_millis();
        let mut state = self.state.lock().unwrap();
        let price_changed = match state.items.get(&item.id) {
            Some(existing) => existing.price != item.price,
            None => true,
        };
        if price_changed {
            state.observations.push(PricePoint {
                item_id: item.id.clone(),
                price: item.price,
                time_ms: now,
                source: item.owner.clone(),
            });
        }
        item.last_updated_ms = now;
        state.items.insert(item.id.clone(), item);
    }

    pub fn get_item(&self, id: &str) -> Option<TrackedItem> {
        self.state.lock().unwrap().items.get(id).cloned()
    }

    /// All stored items in unspecified order.
    pub fn list_items(&self) -> Vec<TrackedItem> {
        self.state.lock().unwrap().items.values().cloned().collect()
    }

    /// Observations for `id`, ascending by `time_ms`.
    pub fn price_history(&self, id: &str) -> Vec<PricePoint> {
        let state = self.state.lock().unwrap();
        let mut history: Vec<PricePoint> = state
            .observations
            .iter()
            .filter(|point| point.item_id == id)
            .cloned()
            .collect();
        history.sort_by_key(|point| point.time_ms);
        history
    }

    /// Every observation across all items, ascending by `time_ms`.
    pub fn all_price_history(&self) -> Vec<PricePoint> {
        let mut history = self.state.lock().unwrap().observations.clone();
        history.sort_by_key(|point| point.time_ms);
        history
    }

    /// Mean observation price for `id` over the trailing window, or zero
    /// when nothing falls inside it.
    pub fn average_price(&self, id: &str, window_ms: i64) -> Decimal {
        let now = current_millis();
        let state = self.state.lock().unwrap();
        mean_price(&prices_in_window(
            &state.observations,
            id,
            now - window_ms,
            now,
        ))
    }

    /// Population standard deviation of observation prices for `id` over the
    /// trailing window; zero with fewer than two samples.
    pub fn price_volatility(&self, id: &str, window_ms: i64) -> f64 {
        let now = current_millis();
        let state = self.state.lock().unwrap();
        population_std_dev(&prices_in_window(
            &state.observations,
            id,
            now - window_ms,
            now,
        ))
    }

    /// Delete the stored record for `id`, reporting whether it existed.
    /// Historical observations for the id are retained.
    pub fn remove_item(&self, id: &str) -> bool {
        self.state.lock().unwrap().items.remove(id).is_some()
    }
}

fn prices_in_window(
    observations: &[PricePoint],
    id: &str,
    from_ms: i64,
    to_ms: i64,
) -> Vec<Decimal> {
    observations
        .iter()
        .filter(|point| point.item_id == id && point.time_ms >= from_ms && point.time_ms <= to_ms)
        .map(|point| point.price)
        .collect()
}

fn mean_price(prices: &[Decimal]) -> Decimal {
    if prices.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = prices.iter().copied().sum();
    sum / Decimal::from(prices.len() as u64)
}

fn population_std_dev(prices: &[Decimal]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let mean = mean_price(prices).to_f64().unwrap_or(0.0);
    let sq_diff: f64 = prices
        .iter()
        .map(|price| {
            let value = price.to_f64().unwrap_or(0.0);
            (value - mean).powi(2)
        })
        .sum();
    (sq_diff / prices.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rust_decimal_macros::dec;

    use super::*;

    fn item(id: &str, price: Decimal, owner: &str) -> TrackedItem {
        TrackedItem::new(id, "Iron Sword", price, 10, owner)
    }

    #[test]
    fn first_update_records_one_observation() {
        let ledger = PriceLedger::new();
        let before = current_millis();
        ledger.upsert_item(item("iron_sword", dec!(25), "alice"));

        let history = ledger.price_history("iron_sword");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, dec!(25));
        assert_eq!(history[0].item_id, "iron_sword");
        assert_eq!(history[0].source, "alice");

        let stored = ledger.get_item("iron_sword").expect("stored item");
        assert!(stored.last_updated_ms >= before);
        assert!(stored.last_updated_ms <= current_millis());
    }

    #[test]
    fn unchanged_price_is_not_observed_again() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(25), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(25), "bob"));

        assert_eq!(ledger.price_history("iron_sword").len(), 1);
        // the record itself is still replaced
        assert_eq!(
            ledger.get_item("iron_sword").expect("stored item").owner,
            "bob"
        );
    }

    #[test]
    fn distinct_prices_append_observations() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(10), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(12), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(12), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(15), "alice"));

        let prices: Vec<Decimal> = ledger
            .price_history("iron_sword")
            .into_iter()
            .map(|point| point.price)
            .collect();
        assert_eq!(prices, vec![dec!(10), dec!(12), dec!(15)]);
    }

    #[test]
    fn get_item_returns_independent_copy() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(25), "alice"));

        let mut copy = ledger.get_item("iron_sword").expect("stored item");
        copy.price = dec!(999);
        copy.owner = "mallory".to_string();

        let stored = ledger.get_item("iron_sword").expect("stored item");
        assert_eq!(stored.price, dec!(25));
        assert_eq!(stored.owner, "alice");
    }

    #[test]
    fn average_price_defaults_to_zero() {
        let ledger = PriceLedger::new();
        assert_eq!(ledger.average_price("unknown", 60_000), Decimal::ZERO);
    }

    #[test]
    fn average_price_over_recent_window() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(90), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(100), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(110), "alice"));

        assert_eq!(ledger.average_price("iron_sword", 3_600_000), dec!(100));
    }

    #[test]
    fn volatility_zero_for_single_observation() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(42), "alice"));
        assert_eq!(ledger.price_volatility("iron_sword", 3_600_000), 0.0);
    }

    #[test]
    fn volatility_of_two_spread_prices() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(10), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(20), "alice"));

        // population std dev of [10, 20]: sqrt(((10-15)^2 + (20-15)^2) / 2)
        assert_eq!(ledger.price_volatility("iron_sword", 3_600_000), 5.0);
    }

    #[test]
    fn mean_price_of_constant_series() {
        let prices = vec![dec!(100), dec!(100), dec!(100)];
        assert_eq!(mean_price(&prices), dec!(100));
        assert_eq!(mean_price(&[]), Decimal::ZERO);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let observations = vec![
            PricePoint {
                item_id: "x".to_string(),
                price: dec!(1),
                time_ms: 1_000,
                source: "a".to_string(),
            },
            PricePoint {
                item_id: "x".to_string(),
                price: dec!(2),
                time_ms: 2_000,
                source: "a".to_string(),
            },
            PricePoint {
                item_id: "y".to_string(),
                price: dec!(9),
                time_ms: 2_000,
                source: "a".to_string(),
            },
            PricePoint {
                item_id: "x".to_string(),
                price: dec!(3),
                time_ms: 3_000,
                source: "a".to_string(),
            },
        ];

        assert_eq!(
            prices_in_window(&observations, "x", 1_000, 3_000),
            vec![dec!(1), dec!(2), dec!(3)]
        );
        assert_eq!(
            prices_in_window(&observations, "x", 2_000, 2_000),
            vec![dec!(2)]
        );
        assert!(prices_in_window(&observations, "x", 3_001, 9_000).is_empty());
    }

    #[test]
    fn remove_item_reports_presence() {
        let ledger = PriceLedger::new();
        assert!(!ledger.remove_item("unknown"));

        ledger.upsert_item(item("iron_sword", dec!(25), "alice"));
        assert!(ledger.remove_item("iron_sword"));
        assert!(ledger.get_item("iron_sword").is_none());
        assert!(ledger.list_items().is_empty());
        assert!(!ledger.remove_item("iron_sword"));
    }

    #[test]
    fn remove_item_keeps_history() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(10), "alice"));
        ledger.upsert_item(item("iron_sword", dec!(20), "alice"));
        ledger.remove_item("iron_sword");

        assert_eq!(ledger.price_history("iron_sword").len(), 2);
    }

    #[test]
    fn all_price_history_is_time_ordered() {
        let ledger = PriceLedger::new();
        ledger.upsert_item(item("iron_sword", dec!(10), "alice"));
        ledger.upsert_item(item("healing_potion", dec!(5), "bob"));
        ledger.upsert_item(item("iron_sword", dec!(12), "alice"));

        let all = ledger.all_price_history();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|pair| pair[0].time_ms <= pair[1].time_ms));
    }

    #[test]
    fn concurrent_upserts_stay_consistent() {
        let ledger = Arc::new(PriceLedger::new());
        let mut workers = Vec::new();
        for worker in 0..4 {
            let ledger = Arc::clone(&ledger);
            workers.push(thread::spawn(move || {
                let id = format!("item_{worker}");
                for step in 0..50 {
                    ledger.upsert_item(item(&id, Decimal::from(step), "trader"));
                }
            }));
        }
        for worker in workers {
            worker.join().expect("worker thread");
        }

        assert_eq!(ledger.list_items().len(), 4);
        for worker in 0..4 {
            // each worker wrote 50 distinct prices for its own item
            assert_eq!(ledger.price_history(&format!("item_{worker}")).len(), 50);
        }
        assert_eq!(ledger.all_price_history().len(), 200);
    }
}
