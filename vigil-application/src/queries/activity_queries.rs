use crate::dtos::ActivityQuery;
use crate::{AppError, AppState};
use vigil_domain::SuspiciousActivity;

/// List logged findings, optionally restricted to one user and/or a minimum
/// severity. With a severity floor the result is ordered by severity,
/// otherwise newest first.
pub fn list_activities(
    state: &AppState,
    query: ActivityQuery,
) -> Result<Vec<SuspiciousActivity>, AppError> {
    if let Some(min) = query.min_severity {
        if !min.is_finite() || min < 0.0 {
            return Err(AppError::BadRequest(format!(
                "invalid min_severity {}",
                min
            )));
        }
    }

    let mut rows = match query.min_severity {
        Some(min) => state.detector.high_severity_activities(Some(min)),
        None => state.detector.all_activities(),
    };
    if let Some(user) = query.user.as_deref() {
        rows.retain(|row| row.user_id == user);
    }
    Ok(rows)
}
