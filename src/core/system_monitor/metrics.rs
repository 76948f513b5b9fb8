use serde::{Deserialize, Serialize};

/// One named reading inside a [`MetricSample`], e.g. `("Core3", 97.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleUnit {
    pub label: String,
    pub value: f64,
    /// Reference points, only present on temperature units
    pub limits: Option<TemperatureLimits>,
}

impl SampleUnit {
    pub fn new<S: Into<String>>(label: S, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            limits: None,
        }
    }

    pub fn with_limits<S: Into<String>>(label: S, value: f64, limits: TemperatureLimits) -> Self {
        Self {
            label: label.into(),
            value,
            limits: Some(limits),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureLimits {
    pub high: f64,
    pub critical: f64,
}

/// Ordered list of named readings for one metric.
///
/// Insertion order is kept (aggregate first, then per-unit breakdown) and is
/// reused verbatim when composing messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    units: Vec<SampleUnit>,
}

impl MetricSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            units: pairs
                .into_iter()
                .map(|(label, value)| SampleUnit::new(label, value))
                .collect(),
        }
    }

    pub fn push(&mut self, unit: SampleUnit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[SampleUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// First value of the sample (the aggregate unit for CPU).
    pub fn first_value(&self) -> Option<f64> {
        self.units.first().map(|u| u.value)
    }
}

impl FromIterator<SampleUnit> for MetricSample {
    fn from_iter<I: IntoIterator<Item = SampleUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuReading {
    /// Overall usage (%) over the last measurement window
    pub aggregate: f64,
    pub per_core: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub brand: String,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub frequency_mhz: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    pub percent: f64,
    pub plugged: bool,
}

impl BatteryReading {
    /// Charge rounded to two decimals, the precision used in messages and stats.
    pub fn rounded_percent(&self) -> f64 {
        round2(self.percent)
    }
}

/// Raw sensor reading as exposed by the host. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub label: String,
    pub current: Option<f64>,
    pub high: Option<f64>,
    pub critical: Option<f64>,
}

/// A sensor that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSensor {
    pub label: String,
    pub current: f64,
    pub limits: TemperatureLimits,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SensorReading {
    Valid(TemperatureSensor),
    /// Missing label/value/limits or a zero reading: treated as absent hardware
    Absent,
}

impl TemperatureReading {
    /// Validity predicate applied before a sensor enters a sample.
    pub fn is_valid(&self) -> bool {
        matches!(self.to_sensor(), SensorReading::Valid(_))
    }

    pub fn to_sensor(&self) -> SensorReading {
        let (Some(current), Some(high), Some(critical)) = (self.current, self.high, self.critical)
        else {
            return SensorReading::Absent;
        };

        if self.label.trim().is_empty()
            || current == 0.0
            || !current.is_finite()
            || !high.is_finite()
            || !critical.is_finite()
            || critical < high
        {
            return SensorReading::Absent;
        }

        SensorReading::Valid(TemperatureSensor {
            label: self.label.clone(),
            current,
            limits: TemperatureLimits { high, critical },
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskPartition {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    /// `None` when the partition could not be queried
    pub usage: Option<PartitionUsage>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiskIo {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub addresses: Vec<String>,
    pub mac_address: Option<String>,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkIo {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostInfo {
    pub system: String,
    pub node_name: String,
    pub release: String,
    pub version: String,
    pub machine: String,
    pub boot_time: i64, // Unix timestamp
}

/// Sections only shown by the full report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostDetails {
    pub host: HostInfo,
    pub cpu: CpuInfo,
    pub partitions: Vec<DiskPartition>,
    pub disk_io: Option<DiskIo>,
    pub interfaces: Vec<NetworkInterface>,
    pub network_io: NetworkIo,
}

/// Everything sampled in one cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub timestamp: i64, // Unix timestamp
    pub cpu: CpuReading,
    pub memory: MemoryReading,
    pub swap: SwapReading,
    pub battery: Option<BatteryReading>,
    pub temperatures: Vec<TemperatureReading>,
    pub details: Option<HostDetails>,
}

impl HostSnapshot {
    /// Sensors that pass validation, one per label.
    ///
    /// A label keeps the position of its first valid reading and the value of
    /// its last one (several NVMe drives all report `Composite`).
    pub fn valid_sensors(&self) -> Vec<TemperatureSensor> {
        let mut sensors: Vec<TemperatureSensor> = Vec::new();
        for reading in &self.temperatures {
            let SensorReading::Valid(sensor) = reading.to_sensor() else {
                continue;
            };
            match sensors.iter_mut().find(|s| s.label == sensor.label) {
                Some(existing) => *existing = sensor,
                None => sensors.push(sensor),
            }
        }
        sensors
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
