use chrono::{DateTime, Local};

/// Horizontal rule printed between report sections.
pub const SEPARATOR: &str = "--------------------------------------------------------------------------------";

const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Format a byte count with 1024-based units and two decimals (`512.00B`, `1.50KB`).
pub fn convert_units(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.2}{}B", value, unit)
}

/// Format a Unix timestamp in local time as `dd/mm/YYYY HH:MM:SS`.
pub fn format_local_time(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string(),
        None => "unknown".to_string(),
    }
}
