use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::system_monitor::MetricKind;
use crate::error::{PcStatusError, Result};

const APP_DIR: &str = "pc_status";
const CONFIG_FILE_NAME: &str = "config.txt";
const STATS_FILE_NAME: &str = "stats.txt";

/// Filesystem locations used by a run, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub stats_file: PathBuf,
}

impl AppPaths {
    /// Default layout under the user's home directory:
    /// `~/pc_status/config/{config.txt,stats.txt}`
    pub fn from_home_dir() -> Result<Self> {
        let home = dirs::home_dir().ok_or(PcStatusError::HomeDirNotFound)?;
        Ok(Self::with_home(home))
    }

    pub fn with_home<P: Into<PathBuf>>(home: P) -> Self {
        let home = home.into();
        let config_dir = home.join(APP_DIR).join("config");

        Self {
            config_file: config_dir.join(CONFIG_FILE_NAME),
            stats_file: config_dir.join(STATS_FILE_NAME),
            home,
        }
    }

    /// Replace the config and/or stats location (CLI `--config` / `--stats`).
    /// Overrides are tilde-expanded against the same home directory.
    pub fn with_overrides(mut self, config: Option<&str>, stats: Option<&str>) -> Self {
        if let Some(path) = config {
            self.config_file = expand_tilde(path, &self.home);
        }
        if let Some(path) = stats {
            self.stats_file = expand_tilde(path, &self.home);
        }
        self
    }
}

/// Expand a leading `~` to the given home directory.
pub fn expand_tilde(value: &str, home: &Path) -> PathBuf {
    match value.strip_prefix('~') {
        Some(rest) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(value),
    }
}

/// Thresholds and notification toggles read from `config.txt`.
///
/// Toggles are stored in the file as `"yes"`; any other value (or a missing
/// key) disables the notification for that metric. `Default` is the same as
/// an empty file: no thresholds, every toggle off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "HIGH_USAGE_CPU", default, skip_serializing_if = "Option::is_none")]
    pub high_usage_cpu: Option<f64>,
    #[serde(rename = "HIGH_USAGE_MEM", default, skip_serializing_if = "Option::is_none")]
    pub high_usage_mem: Option<f64>,
    #[serde(rename = "DISCHARGING_BATTERY", default, skip_serializing_if = "Option::is_none")]
    pub discharging_battery: Option<f64>,
    #[serde(rename = "DELTA_BATTERY", default, skip_serializing_if = "Option::is_none")]
    pub delta_battery: Option<f64>,

    #[serde(rename = "NOTIFICATION_CPU", default, with = "toggle")]
    pub notification_cpu: bool,
    #[serde(rename = "NOTIFICATION_MEMORY", default, with = "toggle")]
    pub notification_memory: bool,
    #[serde(rename = "NOTIFICATION_BATTERY", default, with = "toggle")]
    pub notification_battery: bool,
    #[serde(rename = "NOTIFICATION_TEMPERATURE", default, with = "toggle")]
    pub notification_temperature: bool,

    #[serde(rename = "PATH_NOTIF_ICON", default, skip_serializing_if = "Option::is_none")]
    pub notif_icon: Option<PathBuf>,
    #[serde(rename = "PATH_NOTIF_SOUND", default, skip_serializing_if = "Option::is_none")]
    pub notif_sound: Option<PathBuf>,
}

impl Config {
    /// Read and validate the config file. A missing or malformed file is an error.
    pub fn load(path: &Path, home: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PcStatusError::config(format!(
                "Parameters file '{}' could not be read: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_json_str(&content, home).map_err(|e| match e {
            PcStatusError::Json(err) => PcStatusError::config(format!(
                "Problem in the data format of file '{}': {}",
                path.display(),
                err
            )),
            other => other,
        })?;

        log::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse config JSON, expanding `~` in every string value.
    pub fn from_json_str(content: &str, home: &Path) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(content)?;
        let expanded: Map<String, Value> = raw
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) if s.starts_with('~') => {
                        Value::String(expand_tilde(&s, home).to_string_lossy().into_owned())
                    }
                    other => other,
                };
                (key, value)
            })
            .collect();

        let config: Config = serde_json::from_value(Value::Object(expanded))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every configured threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let percentages = [
            ("HIGH_USAGE_CPU", self.high_usage_cpu),
            ("HIGH_USAGE_MEM", self.high_usage_mem),
            ("DISCHARGING_BATTERY", self.discharging_battery),
        ];

        for (name, value) in percentages {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(PcStatusError::config(format!(
                        "{} must be a percentage between 0 and 100 (got {})",
                        name, v
                    )));
                }
            }
        }

        if let Some(delta) = self.delta_battery {
            if !delta.is_finite() {
                return Err(PcStatusError::config(format!(
                    "DELTA_BATTERY must be a finite number (got {})",
                    delta
                )));
            }
        }

        Ok(())
    }

    /// Whether desktop notifications are enabled for a metric.
    pub fn is_notification_enabled(&self, kind: MetricKind) -> bool {
        match kind {
            MetricKind::Battery => self.notification_battery,
            MetricKind::Memory => self.notification_memory,
            MetricKind::Cpu => self.notification_cpu,
            MetricKind::Temperature => self.notification_temperature,
        }
    }
}

mod toggle {
    use super::*;

    pub fn serialize<S: Serializer>(enabled: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(if *enabled { "yes" } else { "no" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str() == Some("yes"))
    }
}
