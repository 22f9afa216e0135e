use tracing::{info, warn};

use crate::{AppError, AppState};
use vigil_domain::SuspiciousActivity;

/// Run the rapid-transaction check for one user over the ledger's current
/// items.
pub fn scan_rapid_updates(
    state: &AppState,
    user_id: &str,
) -> Result<Option<SuspiciousActivity>, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("user id is required".to_string()));
    }
    let recent = state.ledger.list_items();
    let finding = state.detector.detect_rapid_transactions(user_id, &recent);
    if let Some(found) = &finding {
        state.metrics.record_findings(1);
        warn!(
            "{} by {}: {}",
            found.kind.as_str(),
            found.user_id,
            found.description
        );
    }
    Ok(finding)
}

pub fn purge_stale_activities(state: &AppState, max_age_ms: i64) -> Result<usize, AppError> {
    if max_age_ms < 0 {
        return Err(AppError::BadRequest(
            "max age must be non-negative".to_string(),
        ));
    }
    let removed = state.detector.clear_old_activities(max_age_ms);
    state.metrics.record_purged_activities(removed);
    info!("purged {} stale findings", removed);
    Ok(removed)
}
