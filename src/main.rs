use clap::{Arg, ArgMatches, Command};
use colored::*;

use pc_status::commands;

fn build_cli() -> Command {
    Command::new("pc-status")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Display the status of your computer and alert on high usage")
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .value_name("MODE")
                .help("Information to display")
                .value_parser(["full", "status"])
                .default_value("status")
        )
        .arg(
            Arg::new("loop")
                .short('l')
                .long("loop")
                .value_name("Y/N")
                .help("Keep sampling until interrupted")
                .value_parser(["y", "n"])
                .default_value("n")
        )
        .arg(
            Arg::new("notifications")
                .short('n')
                .long("notifications")
                .value_name("Y/N")
                .help("Send desktop notifications")
                .value_parser(["y", "n"])
                .default_value("y")
        )
        .arg(
            Arg::new("sound")
                .short('s')
                .long("sound")
                .value_name("Y/N")
                .help("Play the configured sound with notifications")
                .value_parser(["y", "n"])
                .default_value("n")
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ~/pc_status/config/config.txt)")
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .value_name("PATH")
                .help("Stats file (default: ~/pc_status/config/stats.txt)")
        )
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    commands::status(matches)
}

fn main() {
    pc_status::init_logging();

    let matches = build_cli().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
