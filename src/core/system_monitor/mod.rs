//! Host vitals monitoring.
//!
//! Sampling ([`collector`]), threshold and delta evaluation ([`evaluator`],
//! [`delta`], [`checks`]), alert dispatch ([`alerts`]) and the polling cycle
//! that ties them together ([`orchestrator`]).

pub mod alerts;
pub mod checks;
pub mod collector;
pub mod delta;
pub mod evaluator;
mod metrics;
pub mod orchestrator;

pub use alerts::{
    alert_body, generate_message, AlertDispatcher, AlertEvent, Notifier, RecordingNotifier,
    SentNotification,
};
pub use checks::{
    default_checks, BatteryCheck, CpuCheck, EvaluationContext, MemoryCheck, MetricCheck,
    MetricKind, TemperatureCheck,
};
pub use collector::{sample_snapshot, HostMetricSource, MetricSource, CPU_SAMPLE_WINDOW};
pub use delta::{discharge_delta, is_discharging};
pub use evaluator::{evaluate, evaluate_temperatures, AlertLevel, Verdict};
pub use metrics::{
    round2, BatteryReading, CpuInfo, CpuReading, DiskIo, DiskPartition, HostDetails, HostInfo,
    HostSnapshot, MemoryReading, MetricSample, NetworkInterface, NetworkIo, PartitionUsage,
    SampleUnit, SensorReading, SwapReading, TemperatureLimits, TemperatureReading,
    TemperatureSensor,
};
pub use orchestrator::{
    evaluate_all, latest_stats, CycleOutcome, CycleState, InfoMode, PollingOrchestrator,
    RunOptions, RunSummary,
};
