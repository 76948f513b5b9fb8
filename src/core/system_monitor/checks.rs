//! Per-metric checks behind a single capability set.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::alerts::alert_body;
use super::delta::{discharge_delta, is_discharging};
use super::evaluator::{self, Verdict};
use super::metrics::{HostSnapshot, MetricSample, SampleUnit};
use crate::core::config::Config;
use crate::core::stats::PersistedStats;

/// Metrics that can raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Battery,
    Memory,
    Cpu,
    Temperature,
}

impl MetricKind {
    /// Order in which checks are evaluated and alerts dispatched.
    pub const DISPATCH_ORDER: [MetricKind; 4] = [
        MetricKind::Battery,
        MetricKind::Memory,
        MetricKind::Cpu,
        MetricKind::Temperature,
    ];

    /// Notification title
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Battery => "Battery",
            MetricKind::Memory => "Memory",
            MetricKind::Cpu => "CPU",
            MetricKind::Temperature => "Temperature",
        }
    }

    /// Suffix appended to every value in a message
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Battery => "",
            MetricKind::Memory | MetricKind::Cpu => "%",
            MetricKind::Temperature => "º",
        }
    }

    /// Decimal places used when formatting values
    pub fn precision(&self) -> usize {
        match self {
            MetricKind::Battery => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Immutable inputs shared by every check in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub config: &'a Config,
    pub stats: &'a PersistedStats,
}

pub trait MetricCheck {
    fn kind(&self) -> MetricKind;

    /// Extract this metric's sample from the cycle snapshot.
    /// `None` when the hardware is absent.
    fn sample(&self, snapshot: &HostSnapshot) -> Option<MetricSample>;

    fn evaluate(&self, sample: &MetricSample, ctx: &EvaluationContext<'_>) -> Verdict;

    /// Notification body for a verdict, `None` for `Ok`.
    fn format(&self, verdict: &Verdict) -> Option<String> {
        alert_body(self.kind(), verdict)
    }
}

/// Checks in dispatch order.
pub fn default_checks() -> Vec<Box<dyn MetricCheck>> {
    vec![
        Box::new(BatteryCheck),
        Box::new(MemoryCheck),
        Box::new(CpuCheck),
        Box::new(TemperatureCheck),
    ]
}

fn missing_threshold(kind: MetricKind, key: &str) -> Verdict {
    log::warn!("{} is not set, skipping the {} check", key, kind.title());
    Verdict::Ok
}

pub struct CpuCheck;

impl MetricCheck for CpuCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Cpu
    }

    fn sample(&self, snapshot: &HostSnapshot) -> Option<MetricSample> {
        let mut sample = MetricSample::new();
        sample.push(SampleUnit::new("CPU", snapshot.cpu.aggregate));
        for (i, usage) in snapshot.cpu.per_core.iter().enumerate() {
            sample.push(SampleUnit::new(format!("Core{}", i), *usage));
        }
        Some(sample)
    }

    fn evaluate(&self, sample: &MetricSample, ctx: &EvaluationContext<'_>) -> Verdict {
        match ctx.config.high_usage_cpu {
            Some(threshold) => evaluator::evaluate(sample, threshold),
            None => missing_threshold(self.kind(), "HIGH_USAGE_CPU"),
        }
    }
}

pub struct MemoryCheck;

impl MetricCheck for MemoryCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Memory
    }

    fn sample(&self, snapshot: &HostSnapshot) -> Option<MetricSample> {
        if snapshot.memory.total_bytes == 0 {
            return None;
        }
        Some(MetricSample::from_pairs([(
            "Memory",
            snapshot.memory.usage_percent,
        )]))
    }

    fn evaluate(&self, sample: &MetricSample, ctx: &EvaluationContext<'_>) -> Verdict {
        match ctx.config.high_usage_mem {
            Some(threshold) => evaluator::evaluate(sample, threshold),
            None => missing_threshold(self.kind(), "HIGH_USAGE_MEM"),
        }
    }
}

/// Delta-based discharge check. Plug state is not consulted.
pub struct BatteryCheck;

impl MetricCheck for BatteryCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Battery
    }

    fn sample(&self, snapshot: &HostSnapshot) -> Option<MetricSample> {
        let battery = snapshot.battery?;
        Some(MetricSample::from_pairs([(
            "Battery",
            battery.rounded_percent(),
        )]))
    }

    fn evaluate(&self, sample: &MetricSample, ctx: &EvaluationContext<'_>) -> Verdict {
        let Some(current) = sample.first_value() else {
            return Verdict::Ok;
        };
        let Some(discharge_threshold) = ctx.config.discharging_battery else {
            return missing_threshold(self.kind(), "DISCHARGING_BATTERY");
        };
        let Some(delta_threshold) = ctx.config.delta_battery else {
            return missing_threshold(self.kind(), "DELTA_BATTERY");
        };

        let previous = ctx.stats.battery_status;
        if !is_discharging(current, previous, discharge_threshold, delta_threshold) {
            return Verdict::Ok;
        }

        Verdict::Discharging {
            offending: sample.clone(),
            delta: discharge_delta(current, previous).unwrap_or_default(),
        }
    }
}

pub struct TemperatureCheck;

impl MetricCheck for TemperatureCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Temperature
    }

    fn sample(&self, snapshot: &HostSnapshot) -> Option<MetricSample> {
        let sample: MetricSample = snapshot
            .valid_sensors()
            .into_iter()
            .map(|sensor| SampleUnit::with_limits(sensor.label, sensor.current, sensor.limits))
            .collect();

        if sample.is_empty() {
            None
        } else {
            Some(sample)
        }
    }

    fn evaluate(&self, sample: &MetricSample, _ctx: &EvaluationContext<'_>) -> Verdict {
        evaluator::evaluate_temperatures(sample)
    }
}
