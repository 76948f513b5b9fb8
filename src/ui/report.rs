//! Console rendering of a [`HostSnapshot`].

use std::io::{self, Write};

use colored::*;

use super::formatters::{convert_units, format_local_time, SEPARATOR};
use crate::core::system_monitor::{
    generate_message, CpuCheck, HostSnapshot, MetricCheck, MetricKind, TemperatureCheck,
};

/// Banner printed once per invocation.
pub fn print_credits(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(
        out,
        "{}: Display the status of your computer.",
        "pc_status".bold().bright_cyan()
    )?;
    writeln!(out, "Version {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "{}", SEPARATOR)
}

pub fn cpu_usage_line(snapshot: &HostSnapshot) -> String {
    let kind = MetricKind::Cpu;
    CpuCheck
        .sample(snapshot)
        .map(|sample| generate_message(&sample, kind.unit(), kind.precision()))
        .unwrap_or_default()
}

pub fn temperature_line(snapshot: &HostSnapshot) -> String {
    let kind = MetricKind::Temperature;
    match TemperatureCheck.sample(snapshot) {
        Some(sample) => format!(
            "Temperature: {}",
            generate_message(&sample, kind.unit(), kind.precision())
        ),
        None => "Temperature: no sensors available".to_string(),
    }
}

pub fn memory_line(snapshot: &HostSnapshot) -> String {
    format!(
        "Memory: {:.1}% (swap: {:.1}%)",
        snapshot.memory.usage_percent, snapshot.swap.usage_percent
    )
}

pub fn battery_line(snapshot: &HostSnapshot) -> String {
    match snapshot.battery {
        Some(battery) => format!("Battery percentage: {:.2}%", battery.rounded_percent()),
        None => "Battery percentage: no battery".to_string(),
    }
}

/// Condensed view: one line per metric.
pub fn print_status(out: &mut dyn Write, snapshot: &HostSnapshot) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "{}", cpu_usage_line(snapshot))?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "{}", temperature_line(snapshot))?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "{}", memory_line(snapshot))?;
    writeln!(out, "{}", battery_line(snapshot))?;
    writeln!(out, "{}", SEPARATOR)
}

fn section_header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", title.bold().green())?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

/// Every diagnostic section, unfiltered.
pub fn print_full(out: &mut dyn Write, snapshot: &HostSnapshot) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Sampled at: {}", format_local_time(snapshot.timestamp))?;

    if let Some(details) = &snapshot.details {
        let host = &details.host;
        section_header(out, "System")?;
        writeln!(out, "  System: {}", host.system)?;
        writeln!(out, "  Node Name: {}", host.node_name)?;
        writeln!(out, "  Release: {}", host.release)?;
        writeln!(out, "  Version: {}", host.version)?;
        writeln!(out, "  Machine: {}", host.machine)?;

        section_header(out, "Boot Time")?;
        writeln!(out, "  Boot Time: {}", format_local_time(host.boot_time))?;

        let cpu = &details.cpu;
        section_header(out, "CPU")?;
        if !cpu.brand.is_empty() {
            writeln!(out, "  Model: {}", cpu.brand)?;
        }
        match cpu.physical_cores {
            Some(physical) => writeln!(out, "  Physical Cores: {}", physical)?,
            None => writeln!(out, "  Physical Cores: unknown")?,
        }
        writeln!(out, "  Total Cores: {}", cpu.logical_cores)?;
        writeln!(out, "  Current Frequency: {:.2}Mhz", cpu.frequency_mhz as f64)?;
    } else {
        section_header(out, "CPU")?;
    }
    writeln!(out, "  {}", cpu_usage_line(snapshot))?;

    let memory = &snapshot.memory;
    section_header(out, "Memory")?;
    writeln!(out, "  Memory: {}", convert_units(memory.total_bytes))?;
    writeln!(out, "  Available Memory: {}", convert_units(memory.available_bytes))?;
    writeln!(out, "  Used Memory: {}", convert_units(memory.used_bytes))?;
    writeln!(out, "  Memory Usage: {:.1}%", memory.usage_percent)?;

    let swap = &snapshot.swap;
    section_header(out, "Swap")?;
    writeln!(out, "  Swap Memory: {}", convert_units(swap.total_bytes))?;
    writeln!(out, "  Free Swap Memory: {}", convert_units(swap.free_bytes))?;
    writeln!(out, "  Used Swap Memory: {}", convert_units(swap.used_bytes))?;
    writeln!(out, "  Swap Memory Usage: {:.1}%", swap.usage_percent)?;

    if let Some(details) = &snapshot.details {
        section_header(out, "Disk")?;
        for partition in &details.partitions {
            writeln!(out, "  Device: {}", partition.device)?;
            writeln!(out, "\tMountpoint: {}", partition.mount_point)?;
            writeln!(out, "\tFile system type: {}", partition.fs_type)?;
            if let Some(usage) = &partition.usage {
                writeln!(out, "\tTotal Size part: {}", convert_units(usage.total_bytes))?;
                writeln!(out, "\tUsed part: {}", convert_units(usage.used_bytes))?;
                writeln!(out, "\tFree part: {}", convert_units(usage.free_bytes))?;
                writeln!(out, "\tOccupancy part: {:.1}%", usage.usage_percent)?;
            }
        }
        if let Some(io) = details.disk_io {
            writeln!(out, "  Total read since boot: {}", convert_units(io.read_bytes))?;
            writeln!(out, "  Total write since boot: {}", convert_units(io.write_bytes))?;
        }

        section_header(out, "Network")?;
        for interface in &details.interfaces {
            writeln!(out, "  Interface: {}", interface.name)?;
            for address in &interface.addresses {
                writeln!(out, "\tIP Address: {}", address)?;
            }
            if let Some(mac) = &interface.mac_address {
                writeln!(out, "\tMAC Address: {}", mac)?;
            }
        }
        writeln!(out, "  Total bytes sent: {}", convert_units(details.network_io.bytes_sent))?;
        writeln!(
            out,
            "  Total bytes received: {}",
            convert_units(details.network_io.bytes_received)
        )?;
    }

    section_header(out, "Battery")?;
    match snapshot.battery {
        Some(battery) => {
            writeln!(out, "  {}", battery_line(snapshot))?;
            let unplugged = if battery.plugged {
                "False".normal()
            } else {
                "True".yellow()
            };
            writeln!(out, "  Unplugged: {}", unplugged)?;
        }
        None => writeln!(out, "  No battery detected")?,
    }

    section_header(out, "Temperature")?;
    let sensors = snapshot.valid_sensors();
    if sensors.is_empty() {
        writeln!(out, "  No sensors available")?;
    }
    for sensor in sensors {
        writeln!(
            out,
            "  {}: Current temperature: {:.1}{}",
            sensor.label,
            sensor.current,
            MetricKind::Temperature.unit()
        )?;
    }

    writeln!(out, "{}", SEPARATOR)
}
