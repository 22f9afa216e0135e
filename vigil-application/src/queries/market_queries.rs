use crate::dtos::PriceStats;
use crate::{AppError, AppState};
use vigil_domain::{current_millis, PricePoint, TrackedItem};

/// Current items sorted by id for stable display.
pub fn market_snapshot(state: &AppState) -> Result<Vec<TrackedItem>, AppError> {
    let mut items = state.ledger.list_items();
    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}

pub fn item_price_history(state: &AppState, item_id: &str) -> Result<Vec<PricePoint>, AppError> {
    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(AppError::BadRequest("item id is required".to_string()));
    }
    Ok(state.ledger.price_history(item_id))
}

pub fn full_price_history(state: &AppState) -> Result<Vec<PricePoint>, AppError> {
    Ok(state.ledger.all_price_history())
}

/// Windowed average, volatility and sample count for one item; all three
/// describe the same `[now - window_ms, now]` slice of the history.
pub fn price_stats(
    state: &AppState,
    item_id: &str,
    window_ms: i64,
) -> Result<PriceStats, AppError> {
    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(AppError::BadRequest("item id is required".to_string()));
    }
    if window_ms < 0 {
        return Err(AppError::BadRequest(
            "window must be non-negative".to_string(),
        ));
    }
    let now = current_millis();
    let history = state.ledger.price_history(item_id);
    Ok(PriceStats {
        item_id: item_id.to_string(),
        average: state.ledger.average_price(item_id, window_ms),
        volatility: state.ledger.price_volatility(item_id, window_ms),
        samples: samples_in_window(&history, now - window_ms, now),
    })
}

fn samples_in_window(history: &[PricePoint], from_ms: i64, to_ms: i64) -> usize {
    history
        .iter()
        .filter(|point| point.time_ms >= from_ms && point.time_ms <= to_ms)
        .count()
}
