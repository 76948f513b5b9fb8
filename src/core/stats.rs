//! Previous-run snapshot used for cross-run delta checks.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{PcStatusError, Result};

/// Last observed values, persisted between invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedStats {
    #[serde(rename = "BATTERY_STATUS", default, skip_serializing_if = "Option::is_none")]
    pub battery_status: Option<f64>,
    #[serde(rename = "CPU_STATUS", default, skip_serializing_if = "Option::is_none")]
    pub cpu_status: Option<f64>,
    #[serde(rename = "MEMORY_STATUS", default, skip_serializing_if = "Option::is_none")]
    pub memory_status: Option<f64>,
}

impl PersistedStats {
    /// Read the stats file.
    ///
    /// The file must exist and parse. A first run starts from a file with no
    /// keys (`{}`), which leaves every baseline empty.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PcStatusError::stats(format!(
                "Stats file '{}' could not be read: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PcStatusError::stats(format!(
                "Problem in the data format of file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the stats file atomically: a sibling temp file is renamed over
    /// the target, so an interrupted write never leaves a truncated file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;
        let file_name = path
            .file_name()
            .ok_or_else(|| PcStatusError::stats(format!("Invalid stats path: {}", path.display())))?;
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::debug!("Stats written to {}", path.display());
        Ok(())
    }

    /// Merge the latest readings over this snapshot. Metrics absent in the
    /// latest run keep their previous value.
    pub fn updated_with(&self, latest: &PersistedStats) -> PersistedStats {
        PersistedStats {
            battery_status: latest.battery_status.or(self.battery_status),
            cpu_status: latest.cpu_status.or(self.cpu_status),
            memory_status: latest.memory_status.or(self.memory_status),
        }
    }
}
