//! Threshold evaluation: pure functions from a sample and a threshold to a verdict.
//!
//! Every comparison is inclusive: a unit whose value equals the threshold is
//! offending.

use serde::{Deserialize, Serialize};

use super::metrics::MetricSample;

/// Severity attached to a threshold breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    High,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::High => "HIGH",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

/// Outcome of evaluating one metric in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Ok,
    ThresholdExceeded {
        level: AlertLevel,
        offending: MetricSample,
    },
    /// Battery only: charge is low and fell more than the allowed delta since
    /// the previous run.
    Discharging {
        offending: MetricSample,
        delta: f64,
    },
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }

    pub fn offending(&self) -> Option<&MetricSample> {
        match self {
            Verdict::Ok => None,
            Verdict::ThresholdExceeded { offending, .. } | Verdict::Discharging { offending, .. } => {
                Some(offending)
            }
        }
    }
}

/// Whether a single value breaches a threshold (inclusive).
pub fn is_offending(value: f64, threshold: f64) -> bool {
    value >= threshold
}

/// Every unit at or above the threshold, in sample order.
pub fn offending_units(sample: &MetricSample, threshold: f64) -> MetricSample {
    sample
        .iter()
        .filter(|unit| is_offending(unit.value, threshold))
        .cloned()
        .collect()
}

/// Evaluate a percentage sample (CPU, memory) against one threshold.
pub fn evaluate(sample: &MetricSample, threshold: f64) -> Verdict {
    let offending = offending_units(sample, threshold);
    if offending.is_empty() {
        Verdict::Ok
    } else {
        Verdict::ThresholdExceeded {
            level: AlertLevel::High,
            offending,
        }
    }
}

/// Evaluate temperature units against their own high/critical limits.
///
/// Any unit at or above `critical` makes the whole metric `CRITICAL`, and
/// resolution stops at the first such unit. Otherwise every unit at or above
/// `high` is collected. Units without limits are ignored.
pub fn evaluate_temperatures(sample: &MetricSample) -> Verdict {
    let with_limits = || {
        sample
            .iter()
            .filter_map(|unit| unit.limits.map(|limits| (unit, limits)))
    };

    if let Some((unit, _)) =
        with_limits().find(|(unit, limits)| is_offending(unit.value, limits.critical))
    {
        return Verdict::ThresholdExceeded {
            level: AlertLevel::Critical,
            offending: MetricSample::from_iter([unit.clone()]),
        };
    }

    let high: MetricSample = with_limits()
        .filter(|(unit, limits)| is_offending(unit.value, limits.high))
        .map(|(unit, _)| unit.clone())
        .collect();

    if high.is_empty() {
        Verdict::Ok
    } else {
        Verdict::ThresholdExceeded {
            level: AlertLevel::High,
            offending: high,
        }
    }
}
