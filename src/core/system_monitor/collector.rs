use std::thread;
use std::time::Duration;

use battery::units::ratio::percent;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use super::metrics::*;
use crate::error::Result;
use crate::platform::sensors;

/// Length of the blocking window used to measure per-core CPU usage.
pub const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Read-only access to host counters.
///
/// Methods take `&mut self` because most backends refresh internal state on
/// each read. Absent hardware is reported as `None` or an empty list, never as
/// an error.
pub trait MetricSource {
    /// Overall CPU usage (%) over the most recent measurement window.
    fn cpu_aggregate(&mut self) -> f64;

    /// Per-core CPU usage (%). Blocks for [`CPU_SAMPLE_WINDOW`].
    fn cpu_per_core(&mut self) -> Vec<f64>;

    fn memory(&mut self) -> MemoryReading;

    fn swap(&mut self) -> SwapReading;

    /// `None` when the host has no battery or it cannot be read.
    fn battery(&mut self) -> Option<BatteryReading>;

    fn temperatures(&mut self) -> Vec<TemperatureReading>;

    fn disk_partitions(&mut self) -> Vec<DiskPartition>;

    fn disk_io(&mut self) -> Option<DiskIo>;

    fn network_interfaces(&mut self) -> Vec<NetworkInterface>;

    fn network_io(&mut self) -> NetworkIo;

    fn host_info(&mut self) -> HostInfo;

    fn cpu_info(&mut self) -> CpuInfo;
}

/// Take a complete snapshot. Per-core CPU is read first so the aggregate
/// comes from the same measurement window.
pub fn sample_snapshot(source: &mut dyn MetricSource, include_details: bool) -> HostSnapshot {
    let per_core = source.cpu_per_core();
    let aggregate = source.cpu_aggregate();

    let details = if include_details {
        Some(HostDetails {
            host: source.host_info(),
            cpu: source.cpu_info(),
            partitions: source.disk_partitions(),
            disk_io: source.disk_io(),
            interfaces: source.network_interfaces(),
            network_io: source.network_io(),
        })
    } else {
        None
    };

    HostSnapshot {
        timestamp: chrono::Utc::now().timestamp(),
        cpu: CpuReading {
            aggregate,
            per_core,
        },
        memory: source.memory(),
        swap: source.swap(),
        battery: source.battery(),
        temperatures: source.temperatures(),
        details,
    }
}

/// [`MetricSource`] backed by `sysinfo`, the `battery` crate and platform
/// temperature sensors.
pub struct HostMetricSource {
    system: System,
    disks: Disks,
    networks: Networks,
    last_aggregate: Option<f64>,
}

impl HostMetricSource {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            last_aggregate: None,
        }
    }

    fn measure_window(&mut self) {
        self.system.refresh_cpu_usage();
        thread::sleep(CPU_SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_usage();
        self.last_aggregate = Some(self.system.global_cpu_usage() as f64);
    }

    fn read_battery() -> Result<Option<BatteryReading>> {
        let manager = battery::Manager::new()?;

        let mut readings = Vec::new();
        for maybe_battery in manager.batteries()? {
            let battery = maybe_battery?;
            let charge = battery.state_of_charge().get::<percent>() as f64;
            let plugged = !matches!(battery.state(), battery::State::Discharging);
            readings.push((charge, plugged));
        }

        if readings.is_empty() {
            return Ok(None);
        }

        let count = readings.len() as f64;
        Ok(Some(BatteryReading {
            percent: readings.iter().map(|(c, _)| c).sum::<f64>() / count,
            plugged: readings.iter().any(|(_, p)| *p),
        }))
    }
}

impl Default for HostMetricSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for HostMetricSource {
    fn cpu_aggregate(&mut self) -> f64 {
        match self.last_aggregate.take() {
            Some(aggregate) => aggregate,
            None => {
                self.measure_window();
                self.last_aggregate.take().unwrap_or_default()
            }
        }
    }

    fn cpu_per_core(&mut self) -> Vec<f64> {
        self.measure_window();
        self.system
            .cpus()
            .iter()
            .map(|cpu| cpu.cpu_usage() as f64)
            .collect()
    }

    fn memory(&mut self) -> MemoryReading {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let available = self.system.available_memory();

        MemoryReading {
            total_bytes: total,
            available_bytes: available,
            used_bytes: self.system.used_memory(),
            usage_percent: percent_of(total.saturating_sub(available), total),
        }
    }

    fn swap(&mut self) -> SwapReading {
        let total = self.system.total_swap();
        let used = self.system.used_swap();

        SwapReading {
            total_bytes: total,
            used_bytes: used,
            free_bytes: self.system.free_swap(),
            usage_percent: percent_of(used, total),
        }
    }

    fn battery(&mut self) -> Option<BatteryReading> {
        match Self::read_battery() {
            Ok(reading) => reading,
            Err(e) => {
                log::debug!("Battery not available: {}", e);
                None
            }
        }
    }

    fn temperatures(&mut self) -> Vec<TemperatureReading> {
        sensors::read_temperatures()
    }

    fn disk_partitions(&mut self) -> Vec<DiskPartition> {
        self.disks.refresh(true);
        self.disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);

                let usage = if total > 0 {
                    Some(PartitionUsage {
                        total_bytes: total,
                        used_bytes: used,
                        free_bytes: free,
                        usage_percent: round2(percent_of(used, total)),
                    })
                } else {
                    log::debug!(
                        "Skipping usage for {}: not readable",
                        disk.mount_point().display()
                    );
                    None
                };

                DiskPartition {
                    device: disk.name().to_string_lossy().to_string(),
                    mount_point: disk.mount_point().to_string_lossy().to_string(),
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    usage,
                }
            })
            .collect()
    }

    fn disk_io(&mut self) -> Option<DiskIo> {
        if self.disks.list().is_empty() {
            return None;
        }

        let io = self.disks.iter().fold(DiskIo::default(), |acc, disk| {
            let usage = disk.usage();
            DiskIo {
                read_bytes: acc.read_bytes + usage.total_read_bytes,
                write_bytes: acc.write_bytes + usage.total_written_bytes,
            }
        });
        Some(io)
    }

    fn network_interfaces(&mut self) -> Vec<NetworkInterface> {
        self.networks.refresh(true);
        let mut interfaces: Vec<_> = self
            .networks
            .iter()
            .map(|(name, data)| NetworkInterface {
                name: name.to_string(),
                addresses: data
                    .ip_networks()
                    .iter()
                    .map(|net| format!("{}/{}", net.addr, net.prefix))
                    .collect(),
                mac_address: Some(data.mac_address().to_string())
                    .filter(|mac| mac != "00:00:00:00:00:00"),
                bytes_received: data.total_received(),
                bytes_sent: data.total_transmitted(),
            })
            .collect();

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        interfaces
    }

    fn network_io(&mut self) -> NetworkIo {
        self.networks
            .values()
            .fold(NetworkIo::default(), |acc, data| NetworkIo {
                bytes_sent: acc.bytes_sent + data.total_transmitted(),
                bytes_received: acc.bytes_received + data.total_received(),
            })
    }

    fn host_info(&mut self) -> HostInfo {
        HostInfo {
            system: System::name().unwrap_or_else(|| "Unknown".to_string()),
            node_name: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
            release: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            machine: std::env::consts::ARCH.to_string(),
            boot_time: System::boot_time() as i64,
        }
    }

    fn cpu_info(&mut self) -> CpuInfo {
        let cpus = self.system.cpus();

        CpuInfo {
            brand: cpus
                .first()
                .map(|c| c.brand().trim().to_string())
                .unwrap_or_default(),
            physical_cores: System::physical_core_count(),
            logical_cores: cpus.len(),
            frequency_mhz: cpus.first().map(|c| c.frequency()).unwrap_or(0),
        }
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
