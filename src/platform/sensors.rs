//! Temperature sensor discovery.
//!
//! On Linux the hwmon sysfs tree is read directly because it is the only
//! source exposing per-sensor `high` and `critical` trip points. Other
//! platforms fall back to `sysinfo::Components`.

use crate::core::system_monitor::TemperatureReading;

#[cfg(target_os = "linux")]
const HWMON_ROOT: &str = "/sys/class/hwmon";

#[cfg(target_os = "linux")]
pub fn read_temperatures() -> Vec<TemperatureReading> {
    hwmon::read_from(std::path::Path::new(HWMON_ROOT))
}

#[cfg(not(target_os = "linux"))]
pub fn read_temperatures() -> Vec<TemperatureReading> {
    use sysinfo::Components;

    let components = Components::new_with_refreshed_list();
    components
        .iter()
        .map(|comp| {
            let critical = comp.critical().map(f64::from);
            TemperatureReading {
                label: comp.label().to_string(),
                current: comp.temperature().map(f64::from),
                // No separate "high" trip point is exposed here
                high: critical,
                critical,
            }
        })
        .collect()
}

/// Fill a missing trip point from the other one.
pub(crate) fn normalize_limits(high: Option<f64>, critical: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (high, critical) {
        (Some(h), None) => (Some(h), Some(h)),
        (None, Some(c)) => (Some(c), Some(c)),
        other => other,
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) mod hwmon {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::normalize_limits;
    use crate::core::system_monitor::TemperatureReading;

    fn read_millidegrees(path: &Path) -> Option<f64> {
        let content = fs::read_to_string(path).ok()?;
        let raw = content.trim().parse::<i64>().ok()?;
        Some(raw as f64 / 1000.0)
    }

    fn read_label(path: &Path) -> Option<String> {
        fs::read_to_string(path).ok().map(|s| s.trim().to_string())
    }

    fn input_files(dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("temp") && n.ends_with("_input"))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Read every `temp*_input` under each `hwmon*` directory of `root`.
    pub fn read_from(root: &Path) -> Vec<TemperatureReading> {
        let Ok(entries) = fs::read_dir(root) else {
            log::debug!("No hwmon tree at {}", root.display());
            return Vec::new();
        };

        let mut devices: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        devices.sort();

        let mut readings = Vec::new();
        for device in devices {
            let mut inputs = input_files(&device);
            inputs.extend(input_files(&device.join("device")));
            inputs.sort();

            for input in inputs {
                let Some(name) = input.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let base = name.trim_end_matches("_input");
                let sibling = |suffix: &str| input.with_file_name(format!("{}_{}", base, suffix));

                let (high, critical) = normalize_limits(
                    read_millidegrees(&sibling("max")),
                    read_millidegrees(&sibling("crit")),
                );

                readings.push(TemperatureReading {
                    label: read_label(&sibling("label")).unwrap_or_default(),
                    current: read_millidegrees(&input),
                    high,
                    critical,
                });
            }
        }

        readings
    }
}
