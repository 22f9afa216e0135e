use rust_decimal::Decimal;
use tracing::warn;

use crate::dtos::ItemUpdateApi;
use crate::{AppError, AppState};
use vigil_domain::{SuspiciousActivity, TrackedItem};

/// Validate one incoming market update, store it, and run detection on it.
/// Returns whatever findings the update produced.
pub fn record_item_update(
    state: &AppState,
    update: ItemUpdateApi,
) -> Result<Vec<SuspiciousActivity>, AppError> {
    let update = update.normalized();
    if let Err(err) = validate_update(&update) {
        state.metrics.record_rejected_update();
        return Err(err);
    }

    let item = TrackedItem::new(
        update.id,
        update.name,
        update.price,
        update.quantity,
        update.owner,
    );
    state.ledger.upsert_item(item.clone());
    state.metrics.record_item_update();

    let findings = state.detector.analyze_item_update(&item);
    if !findings.is_empty() {
        state.metrics.record_findings(findings.len());
        for finding in &findings {
            warn!(
                "{} by {}: {}",
                finding.kind.as_str(),
                finding.user_id,
                finding.description
            );
        }
    }
    Ok(findings)
}

pub fn remove_item(state: &AppState, id: &str) -> Result<bool, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("item id is required".to_string()));
    }
    Ok(state.ledger.remove_item(id))
}

fn validate_update(update: &ItemUpdateApi) -> Result<(), AppError> {
    if update.id.is_empty() {
        return Err(AppError::BadRequest("item id is required".to_string()));
    }
    if update.name.is_empty() {
        return Err(AppError::BadRequest(format!(
            "name is required for '{}'",
            update.id
        )));
    }
    if update.owner.is_empty() {
        return Err(AppError::BadRequest(format!(
            "owner is required for '{}'",
            update.id
        )));
    }
    if update.price < Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "price must be non-negative for '{}'",
            update.id
        )));
    }
    Ok(())
}
