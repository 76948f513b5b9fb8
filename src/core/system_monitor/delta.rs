//! Cross-run battery discharge detection.
//!
//! The previous value is the one persisted at the end of the previous run,
//! not a live trend inside the current process.

/// Percentage points lost since the previous run, if a baseline exists.
pub fn discharge_delta(current_pct: f64, previous_pct: Option<f64>) -> Option<f64> {
    previous_pct
        .filter(|p| p.is_finite())
        .map(|previous| previous - current_pct)
}

/// Battery is already at or below `discharge_threshold` and dropped by more
/// than `delta_threshold` points since the previous run.
///
/// Without a baseline this is always `false`.
pub fn is_discharging(
    current_pct: f64,
    previous_pct: Option<f64>,
    discharge_threshold: f64,
    delta_threshold: f64,
) -> bool {
    match discharge_delta(current_pct, previous_pct) {
        Some(delta) => current_pct <= discharge_threshold && delta > delta_threshold,
        None => false,
    }
}
