// Core business logic module

pub mod config;
pub mod stats;
pub mod system_monitor;

// Re-export commonly used items
pub use config::{AppPaths, Config};
pub use stats::PersistedStats;
pub use system_monitor::{PollingOrchestrator, RunOptions, RunSummary};
