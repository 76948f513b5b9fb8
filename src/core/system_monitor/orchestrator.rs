//! Polling cycle: INIT → SAMPLE → EVALUATE → REPORT → (loop → SAMPLE | DONE).

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::alerts::{AlertDispatcher, AlertEvent, Notifier};
use super::checks::{default_checks, EvaluationContext, MetricCheck, MetricKind};
use super::collector::{sample_snapshot, MetricSource};
use super::evaluator::Verdict;
use super::metrics::HostSnapshot;
use crate::core::config::{AppPaths, Config};
use crate::core::stats::PersistedStats;
use crate::error::Result;
use crate::ui::report;

/// How much to print each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoMode {
    /// Every diagnostic section
    Full,
    /// One condensed line per metric
    #[default]
    Status,
}

/// Flags resolved from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub info: InfoMode,
    pub loop_mode: bool,
    pub notifications: bool,
    pub sound: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            info: InfoMode::Status,
            loop_mode: false,
            notifications: true,
            sound: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Init,
    Sample,
    Evaluate,
    Report,
    Done,
}

/// Result of one completed cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub verdicts: Vec<(MetricKind, Verdict)>,
    pub alerts: Vec<AlertEvent>,
    /// Values to persist if this turns out to be the last cycle
    pub latest: PersistedStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub alerts_sent: usize,
    pub interrupted: bool,
}

pub struct PollingOrchestrator {
    options: RunOptions,
    paths: AppPaths,
    source: Box<dyn MetricSource>,
    dispatcher: AlertDispatcher,
    checks: Vec<Box<dyn MetricCheck>>,
    stop: Arc<AtomicBool>,
    out: Box<dyn Write>,
    state: CycleState,
}

impl PollingOrchestrator {
    pub fn new(
        options: RunOptions,
        paths: AppPaths,
        source: Box<dyn MetricSource>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            options,
            paths,
            source,
            dispatcher: AlertDispatcher::new(notifier),
            checks: default_checks(),
            stop: Arc::new(AtomicBool::new(false)),
            out: Box::new(std::io::stdout()),
            state: CycleState::Init,
        }
    }

    /// Redirect report output (stdout by default).
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Share an externally owned stop flag, e.g. one set by a Ctrl+C handler.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn transition(&mut self, next: CycleState) {
        log::trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run until the single pass ends or, in loop mode, until the stop flag
    /// is raised. Persists the last completed cycle's values on exit.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.transition(CycleState::Init);
        let mut config = Config::load(&self.paths.config_file, &self.paths.home)?;
        let stats = PersistedStats::load(&self.paths.stats_file)?;

        let mut summary = RunSummary::default();
        let mut last_completed: Option<PersistedStats> = None;

        loop {
            if self.stop_requested() {
                summary.interrupted = true;
                break;
            }

            if summary.cycles > 0 {
                config = self.reload_config(config);
            }

            match self.run_cycle(&config, &stats)? {
                Some(outcome) => {
                    summary.cycles += 1;
                    summary.alerts_sent += outcome.alerts.len();
                    last_completed = Some(outcome.latest);
                }
                None => {
                    log::debug!("Cycle interrupted before evaluation, discarding it");
                    summary.interrupted = true;
                    break;
                }
            }

            if !self.options.loop_mode {
                break;
            }
        }

        self.transition(CycleState::Done);
        if let Some(latest) = last_completed {
            stats.updated_with(&latest).save(&self.paths.stats_file)?;
        }

        Ok(summary)
    }

    fn reload_config(&self, current: Config) -> Config {
        match Config::load(&self.paths.config_file, &self.paths.home) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Keeping previous configuration: {}", e);
                current
            }
        }
    }

    /// One SAMPLE → EVALUATE → REPORT pass. Returns `None` when the stop
    /// flag was raised while sampling.
    pub fn run_cycle(&mut self, config: &Config, stats: &PersistedStats) -> Result<Option<CycleOutcome>> {
        self.transition(CycleState::Sample);
        let include_details = self.options.info == InfoMode::Full;
        let snapshot = sample_snapshot(self.source.as_mut(), include_details);

        if self.stop_requested() {
            return Ok(None);
        }

        self.transition(CycleState::Evaluate);
        let ctx = EvaluationContext { config, stats };
        let verdicts = evaluate_all(&self.checks, &snapshot, &ctx);
        for (kind, verdict) in &verdicts {
            match verdict {
                Verdict::Ok => {}
                Verdict::ThresholdExceeded { level, .. } => {
                    log::info!("{} is {}", kind, level.as_str());
                }
                Verdict::Discharging { delta, .. } => {
                    log::info!("Battery dropped {:.2} points since the previous run", delta);
                }
            }
        }

        self.transition(CycleState::Report);
        // Output is best effort: a closed stdout must not stop alerts or the stats write
        if let Err(e) = self.report(&snapshot) {
            log::warn!("Failed to write report: {}", e);
        }

        let mut alerts = Vec::new();
        if self.options.notifications {
            self.dispatcher.begin_cycle();
            for (kind, verdict) in &verdicts {
                if let Some(event) = self.dispatcher.dispatch(*kind, verdict, config, self.options.sound) {
                    alerts.push(event);
                }
            }
        }

        Ok(Some(CycleOutcome {
            verdicts,
            alerts,
            latest: latest_stats(&snapshot),
        }))
    }

    fn report(&mut self, snapshot: &HostSnapshot) -> Result<()> {
        match self.options.info {
            InfoMode::Full => report::print_full(&mut self.out, snapshot)?,
            InfoMode::Status => report::print_status(&mut self.out, snapshot)?,
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Evaluate every check independently, in dispatch order. Metrics without a
/// sample (absent hardware) produce no verdict.
pub fn evaluate_all(
    checks: &[Box<dyn MetricCheck>],
    snapshot: &HostSnapshot,
    ctx: &EvaluationContext<'_>,
) -> Vec<(MetricKind, Verdict)> {
    checks
        .iter()
        .filter_map(|check| {
            let sample = check.sample(snapshot)?;
            Some((check.kind(), check.evaluate(&sample, ctx)))
        })
        .collect()
}

/// Values tracked across runs.
pub fn latest_stats(snapshot: &HostSnapshot) -> PersistedStats {
    PersistedStats {
        battery_status: snapshot.battery.map(|b| b.rounded_percent()),
        cpu_status: Some(snapshot.cpu.aggregate),
        memory_status: (snapshot.memory.total_bytes > 0).then_some(snapshot.memory.usage_percent),
    }
}
