//! Alert composition and dispatch.
//!
//! Turns verdicts into notification text and hands each one to a [`Notifier`],
//! at most once per metric per cycle.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::checks::MetricKind;
use super::evaluator::Verdict;
use super::metrics::MetricSample;
use crate::core::config::Config;
use crate::error::Result;

/// A notification ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: MetricKind,
    pub title: String,
    pub body: String,
    pub play_sound: bool,
}

/// Delivery backend for alerts. Fire-and-forget: callers only log failures.
pub trait Notifier {
    fn send(&self, title: &str, body: &str, icon: Option<&Path>, sound: Option<&Path>) -> Result<()>;
}

/// Join `"{label}: {value}{unit}"` for every unit with `", "`.
pub fn generate_message(sample: &MetricSample, unit: &str, precision: usize) -> String {
    sample
        .iter()
        .map(|u| format!("{}: {:.*}{}", u.label, precision, u.value, unit))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Notification body for a verdict, `None` when there is nothing to report.
pub fn alert_body(kind: MetricKind, verdict: &Verdict) -> Option<String> {
    let message = |sample: &MetricSample| generate_message(sample, kind.unit(), kind.precision());

    match verdict {
        Verdict::Ok => None,
        Verdict::Discharging { offending, .. } => Some(format!(
            "The battery is discharging! ({})",
            message(offending)
        )),
        Verdict::ThresholdExceeded { level, offending } => Some(match kind {
            MetricKind::Cpu => format!("The CPU usage has reached! ({})", message(offending)),
            MetricKind::Memory => {
                format!("The memory usage has reached! ({})", message(offending))
            }
            MetricKind::Temperature => format!(
                "Temperature is {}! ({})",
                level.as_str(),
                message(offending)
            ),
            MetricKind::Battery => format!("The battery level is low! ({})", message(offending)),
        }),
    }
}

/// Sends alerts through a [`Notifier`], never more than one per metric per cycle.
pub struct AlertDispatcher {
    notifier: Box<dyn Notifier>,
    dispatched: HashSet<MetricKind>,
    total_sent: usize,
}

impl AlertDispatcher {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            dispatched: HashSet::new(),
            total_sent: 0,
        }
    }

    /// Reset the per-cycle bookkeeping.
    pub fn begin_cycle(&mut self) {
        self.dispatched.clear();
    }

    /// Number of alerts handed to the notifier since creation.
    pub fn total_sent(&self) -> usize {
        self.total_sent
    }

    /// Build the event for a verdict without sending it.
    pub fn compose(kind: MetricKind, verdict: &Verdict, sound_enabled: bool) -> Option<AlertEvent> {
        let body = alert_body(kind, verdict)?;
        Some(AlertEvent {
            kind,
            title: kind.title().to_string(),
            body,
            play_sound: sound_enabled,
        })
    }

    /// Compose and send the alert for one metric.
    ///
    /// Returns `None` when the metric's notification toggle is off, the
    /// verdict is `Ok`, or the metric already alerted this cycle. A notifier
    /// failure is logged and the event is still returned.
    pub fn dispatch(
        &mut self,
        kind: MetricKind,
        verdict: &Verdict,
        config: &Config,
        sound_enabled: bool,
    ) -> Option<AlertEvent> {
        if !config.is_notification_enabled(kind) {
            return None;
        }
        if self.dispatched.contains(&kind) {
            log::debug!("{} already alerted this cycle", kind);
            return None;
        }

        let event = Self::compose(kind, verdict, sound_enabled)?;
        self.dispatched.insert(kind);
        self.total_sent += 1;

        let sound = if event.play_sound {
            config.notif_sound.as_deref()
        } else {
            None
        };

        if let Err(e) = self
            .notifier
            .send(&event.title, &event.body, config.notif_icon.as_deref(), sound)
        {
            log::warn!("Failed to send {} notification: {}", kind, e);
        }

        Some(event)
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub title: String,
    pub body: String,
    pub icon: Option<PathBuf>,
    pub sound: Option<PathBuf>,
}

/// In-memory notifier. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, title: &str, body: &str, icon: Option<&Path>, sound: Option<&Path>) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentNotification {
                title: title.to_string(),
                body: body.to_string(),
                icon: icon.map(Path::to_path_buf),
                sound: sound.map(Path::to_path_buf),
            });
        }
        Ok(())
    }
}
