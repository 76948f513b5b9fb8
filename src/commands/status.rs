use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;

use crate::core::config::AppPaths;
use crate::core::system_monitor::{HostMetricSource, InfoMode, PollingOrchestrator, RunOptions};
use crate::platform::DesktopNotifier;
use crate::ui::print_credits;

/// Translate parsed CLI flags into run options.
pub fn run_options(matches: &ArgMatches) -> RunOptions {
    let yes = |id: &str| matches.get_one::<String>(id).map(|v| v == "y").unwrap_or(false);

    let info = match matches.get_one::<String>("info").map(String::as_str) {
        Some("full") => InfoMode::Full,
        _ => InfoMode::Status,
    };

    RunOptions {
        info,
        loop_mode: yes("loop"),
        notifications: yes("notifications"),
        sound: yes("sound"),
    }
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let options = run_options(matches);
    let paths = AppPaths::from_home_dir()?.with_overrides(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("stats").map(String::as_str),
    );
    log::debug!("Config: {}", paths.config_file.display());
    log::debug!("Stats: {}", paths.stats_file.display());

    print_credits(&mut std::io::stdout())?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    if options.loop_mode {
        println!("{}", "Press Ctrl+C to stop".dimmed());
    }

    let mut orchestrator = PollingOrchestrator::new(
        options,
        paths,
        Box::new(HostMetricSource::new()),
        Box::new(DesktopNotifier::default()),
    )
    .with_stop_flag(stop);

    let summary = orchestrator.run().context("Status run failed")?;
    log::info!(
        "{} cycle(s) completed, {} alert(s) sent",
        summary.cycles,
        summary.alerts_sent
    );

    if summary.interrupted {
        println!("\nExit program!");
    }

    Ok(())
}
