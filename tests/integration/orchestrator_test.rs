use std::fs;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pc_status::core::stats::PersistedStats;
use pc_status::core::system_monitor::*;

use super::support::{home_with_config, orchestrator, orchestrator_with_source, Reading, ScriptedSource};

#[test]
fn test_status_report_output() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90}"#);
    let reading = Reading {
        cpu: 12.5,
        cores: vec![10.0, 15.0],
        memory: Some(33.3),
        battery: Some(81.256),
        ..Default::default()
    };

    let (mut orch, output) = orchestrator(
        RunOptions::default(),
        &paths,
        vec![reading],
        &RecordingNotifier::new(),
    );
    orch.run().unwrap();

    let text = output.text();
    assert!(text.contains("CPU: 12.5%, Core0: 10.0%, Core1: 15.0%"));
    assert!(text.contains("Temperature: no sensors available"));
    assert!(text.contains("Memory: 33.3% (swap: 0.0%)"));
    assert!(text.contains("Battery percentage: 81.26%"));
}

#[test]
fn test_full_report_includes_host_sections() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90}"#);
    let options = RunOptions {
        info: InfoMode::Full,
        ..Default::default()
    };
    let reading = Reading {
        cpu: 5.0,
        cores: vec![5.0],
        memory: Some(20.0),
        ..Default::default()
    };

    let (mut orch, output) = orchestrator(options, &paths, vec![reading], &RecordingNotifier::new());
    orch.run().unwrap();

    let text = output.text();
    assert!(text.contains("System: TestOS"));
    assert!(text.contains("Node Name: test-host"));
    assert!(text.contains("Total Cores: 1"));
    assert!(text.contains("No battery detected"));
}

#[test]
fn test_stats_persist_last_cycle_and_carry_forward() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90}"#);
    PersistedStats {
        battery_status: Some(66.0),
        cpu_status: Some(1.0),
        memory_status: Some(2.0),
    }
    .save(&paths.stats_file)
    .unwrap();

    // No battery and no memory total on this host
    let reading = Reading {
        cpu: 42.0,
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &RecordingNotifier::new());
    orch.run().unwrap();

    let stats = PersistedStats::load(&paths.stats_file).unwrap();
    assert_eq!(stats.cpu_status, Some(42.0));
    assert_eq!(stats.battery_status, Some(66.0));
    assert_eq!(stats.memory_status, Some(2.0));
}

#[test]
fn test_malformed_config_aborts_without_writing_stats() {
    let (_home, paths) = home_with_config("HIGH_USAGE_CPU = 90");

    let (mut orch, _) = orchestrator(
        RunOptions::default(),
        &paths,
        vec![Reading::default()],
        &RecordingNotifier::new(),
    );

    assert!(orch.run().is_err());
    assert_eq!(fs::read_to_string(&paths.stats_file).unwrap(), "{}");
}

#[test]
fn test_malformed_stats_is_fatal() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90}"#);
    fs::write(&paths.stats_file, "not json").unwrap();

    let (mut orch, _) = orchestrator(
        RunOptions::default(),
        &paths,
        vec![Reading::default()],
        &RecordingNotifier::new(),
    );

    assert!(orch.run().is_err());
    // The corrupt file is left for the user to inspect
    assert_eq!(fs::read_to_string(&paths.stats_file).unwrap(), "not json");
}

#[test]
fn test_stop_before_start_runs_no_cycle() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90}"#);
    let options = RunOptions {
        loop_mode: true,
        ..Default::default()
    };

    let (mut orch, output) = orchestrator(options, &paths, vec![Reading::default()], &RecordingNotifier::new());
    orch.stop_flag().store(true, Ordering::Relaxed);

    let summary = orch.run().unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.cycles, 0);
    assert!(output.text().is_empty());
    assert_eq!(fs::read_to_string(&paths.stats_file).unwrap(), "{}");
}

#[test]
fn test_dispatcher_resets_between_cycles() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    let config = pc_status::Config::load(&paths.config_file, &paths.home).unwrap();
    let stats = PersistedStats::default();
    let notifier = RecordingNotifier::new();
    let hot = Reading {
        cpu: 95.0,
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![hot.clone(), hot], &notifier);

    let first = orch.run_cycle(&config, &stats).unwrap().unwrap();
    let second = orch.run_cycle(&config, &stats).unwrap().unwrap();

    assert_eq!(first.alerts.len(), 1);
    assert_eq!(second.alerts.len(), 1);
    assert_eq!(notifier.sent().len(), 2);
}

#[test]
fn test_missing_stats_file_aborts_run() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    fs::remove_file(&paths.stats_file).unwrap();
    let notifier = RecordingNotifier::new();
    let reading = Reading {
        cpu: 95.0,
        ..Default::default()
    };

    let (mut orch, _) = orchestrator(RunOptions::default(), &paths, vec![reading], &notifier);

    let err = orch.run().unwrap_err();
    assert!(err.to_string().contains("stats.txt"));
    assert!(notifier.sent().is_empty());
    assert!(!paths.stats_file.exists());
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}

#[test]
fn test_closed_stdout_does_not_stop_the_loop() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    let notifier = RecordingNotifier::new();
    let options = RunOptions {
        loop_mode: true,
        ..Default::default()
    };
    let reading = Reading {
        cpu: 95.0,
        ..Default::default()
    };

    // Stop during the third sample; two cycles complete
    let stop = Arc::new(AtomicBool::new(false));
    let stop_hook = stop.clone();
    let source = ScriptedSource::new(vec![reading]).with_hook(move |n| {
        if n == 3 {
            stop_hook.store(true, Ordering::Relaxed);
        }
    });

    let (orch, _) = orchestrator_with_source(options, &paths, source, &notifier);
    let mut orch = orch.with_output(Box::new(ClosedPipe)).with_stop_flag(stop);

    let summary = orch.run().unwrap();
    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.alerts_sent, 2);
    assert_eq!(notifier.sent().len(), 2);

    let stats = PersistedStats::load(&paths.stats_file).unwrap();
    assert_eq!(stats.cpu_status, Some(95.0));
}

#[test]
fn test_config_is_reloaded_every_loop_cycle() {
    let (_home, paths) = home_with_config(r#"{"HIGH_USAGE_CPU": 90, "NOTIFICATION_CPU": "yes"}"#);
    let notifier = RecordingNotifier::new();
    let options = RunOptions {
        loop_mode: true,
        ..Default::default()
    };

    let config_file = paths.config_file.clone();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_hook = stop.clone();
    let source = ScriptedSource::new(vec![Reading {
        cpu: 85.0,
        ..Default::default()
    }])
    .with_hook(move |n| match n {
        // Written while cycle 1 samples, picked up by cycle 2
        1 => fs::write(&config_file, r#"{"HIGH_USAGE_CPU": 80, "NOTIFICATION_CPU": "yes"}"#).unwrap(),
        // Cycle 3 fails to reload and keeps the threshold of 80
        2 => fs::write(&config_file, "{ broken").unwrap(),
        4 => stop_hook.store(true, Ordering::Relaxed),
        _ => {}
    });

    let (orch, _) = orchestrator_with_source(options, &paths, source, &notifier);
    let mut orch = orch.with_stop_flag(stop);

    let summary = orch.run().unwrap();
    assert_eq!(summary.cycles, 3);

    // 85% is below the initial 90 but above the reloaded 80: cycles 2 and 3 alert
    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.body.contains("CPU: 85.0%")));
}
