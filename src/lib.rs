// pc_status library - public API

// Re-export error types
pub mod error;
pub use error::{PcStatusError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::{AppPaths, Config};
pub use crate::core::stats::PersistedStats;

/// Initialize logging. `RUST_LOG` overrides the default `warn` level; output
/// goes to stderr so it never mixes with the report.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
