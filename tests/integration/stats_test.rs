use std::fs;

use pc_status::core::stats::PersistedStats;
use tempfile::TempDir;

#[test]
fn test_write_then_read_keeps_two_decimals() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stats.txt");

    for value in [0.01, 12.34, 47.83, 99.99, 100.0] {
        let stats = PersistedStats {
            battery_status: Some(value),
            cpu_status: Some(value),
            memory_status: Some(value),
        };
        stats.save(&path).unwrap();

        let loaded = PersistedStats::load(&path).unwrap();
        assert_eq!(loaded, stats);
    }
}

#[test]
fn test_file_uses_uppercase_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stats.txt");

    PersistedStats {
        battery_status: Some(80.5),
        cpu_status: Some(3.0),
        memory_status: None,
    }
    .save(&path)
    .unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["BATTERY_STATUS"], 80.5);
    assert_eq!(raw["CPU_STATUS"], 3.0);
    assert!(raw.get("MEMORY_STATUS").is_none());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stats.txt");

    let first = PersistedStats {
        battery_status: Some(90.0),
        ..Default::default()
    };
    first.save(&path).unwrap();

    let second = PersistedStats {
        battery_status: Some(60.0),
        ..Default::default()
    };
    second.save(&path).unwrap();

    assert_eq!(PersistedStats::load(&path).unwrap(), second);
}

#[test]
fn test_reads_file_written_by_hand() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stats.txt");
    fs::write(
        &path,
        r#"{"BATTERY_STATUS": 55, "CPU_STATUS": 10.5, "MEMORY_STATUS": 40.25}"#,
    )
    .unwrap();

    let stats = PersistedStats::load(&path).unwrap();
    assert_eq!(stats.battery_status, Some(55.0));
    assert_eq!(stats.memory_status, Some(40.25));
}
