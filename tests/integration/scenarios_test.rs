use pc_status::core::config::Config;
use pc_status::core::stats::PersistedStats;
use pc_status::core::system_monitor::*;
use tempfile::TempDir;

use super::support::{home_with_config, orchestrator, sensor, Reading};

#[test]
fn test_cpu_over_threshold_sends_one_alert() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    let notifier = RecordingNotifier::new();
    let reading = Reading {
        cpu: 91.0,
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    let summary = orch.run().unwrap();

    let sent = notifier.sent();
    assert_eq!(summary.alerts_sent, 1);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "CPU");
    assert!(sent[0].body.contains("CPU: 91.0%"));
}

#[test]
fn test_battery_toggle_off_suppresses_alerts() {
    let (_home, paths) = home_with_config(
        r#"{"DISCHARGING_BATTERY": 50, "DELTA_BATTERY": 10, "NOTIFICATION_BATTERY": "no"}"#,
    );
    PersistedStats {
        battery_status: Some(55.0),
        ..Default::default()
    }
    .save(&paths.stats_file)
    .unwrap();

    let notifier = RecordingNotifier::new();
    let reading = Reading {
        battery: Some(40.0),
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    orch.run().unwrap();

    assert!(notifier.sent().is_empty());
}

#[test]
fn test_battery_discharge_against_previous_run() {
    let (_home, paths) = home_with_config(
        r#"{"DISCHARGING_BATTERY": 50, "DELTA_BATTERY": 10, "NOTIFICATION_BATTERY": "yes"}"#,
    );
    PersistedStats {
        battery_status: Some(55.0),
        ..Default::default()
    }
    .save(&paths.stats_file)
    .unwrap();

    let notifier = RecordingNotifier::new();
    let reading = Reading {
        battery: Some(40.0),
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    orch.run().unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "The battery is discharging! (Battery: 40.00)");

    // The new level becomes the next run's baseline
    let stats = PersistedStats::load(&paths.stats_file).unwrap();
    assert_eq!(stats.battery_status, Some(40.0));
}

#[test]
fn test_first_run_never_reports_discharge() {
    let (_home, paths) = home_with_config(
        r#"{"DISCHARGING_BATTERY": 50, "DELTA_BATTERY": 10, "NOTIFICATION_BATTERY": "yes"}"#,
    );
    let notifier = RecordingNotifier::new();
    let reading = Reading {
        battery: Some(5.0),
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    let summary = orch.run().unwrap();

    assert_eq!(summary.alerts_sent, 0);
    // The empty baseline is replaced by this run's reading
    let stats = PersistedStats::load(&paths.stats_file).unwrap();
    assert_eq!(stats.battery_status, Some(5.0));
}

#[test]
fn test_many_offending_cores_single_event() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    let notifier = RecordingNotifier::new();
    let reading = Reading {
        cpu: 97.0,
        cores: vec![99.0; 8],
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    orch.run().unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("CPU: 97.0%"));
    assert!(sent[0].body.contains("Core7: 99.0%"));
}

#[test]
fn test_critical_temperature_wins_over_high() {
    let (_home, paths) = home_with_config(r#"{"NOTIFICATION_TEMPERATURE": "yes"}"#);
    let notifier = RecordingNotifier::new();
    let reading = Reading {
        temperatures: vec![
            sensor("Core 0", 86.0, 85.0, 100.0),
            sensor("Core 1", 101.0, 85.0, 100.0),
        ],
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);
    orch.run().unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Temperature is CRITICAL! (Core 1: 101.0º)");
}

#[test]
fn test_boundary_value_is_offending() {
    let config = Config::from_json_str(r#"{"HIGH_USAGE_MEM": 80}"#, TempDir::new().unwrap().path()).unwrap();
    let stats = PersistedStats::default();
    let ctx = EvaluationContext {
        config: &config,
        stats: &stats,
    };

    let at = MetricSample::from_pairs([("Memory", 80.0)]);
    let below = MetricSample::from_pairs([("Memory", 80.0 - f64::EPSILON * 100.0)]);

    assert!(!MemoryCheck.evaluate(&at, &ctx).is_ok());
    assert!(MemoryCheck.evaluate(&below, &ctx).is_ok());
}

#[test]
fn test_icon_and_sound_paths_are_expanded() {
    let (home, paths) = home_with_config(
        r#"{
            "HIGH_USAGE_CPU": 50, "NOTIFICATION_CPU": "yes",
            "PATH_NOTIF_ICON": "~/icons/pc.png",
            "PATH_NOTIF_SOUND": "~/sounds/alert.wav"
        }"#,
    );
    let notifier = RecordingNotifier::new();
    let options = RunOptions {
        sound: true,
        ..Default::default()
    };
    let reading = Reading {
        cpu: 75.0,
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(options, &paths, vec![reading], &notifier);
    orch.run().unwrap();

    let sent = notifier.sent();
    assert_eq!(sent[0].icon, Some(home.path().join("icons/pc.png")));
    assert_eq!(sent[0].sound, Some(home.path().join("sounds/alert.wav")));
}
