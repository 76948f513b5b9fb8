use std::io;
use thiserror::Error;

/// Custom error type for pc_status
#[derive(Error, Debug)]
pub enum PcStatusError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stats file error: {0}")]
    Stats(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Notification failed: {0}")]
    Notifier(String),

    #[error("Could not determine the home directory")]
    HomeDirNotFound,
}

/// Result type alias for pc_status
pub type Result<T> = std::result::Result<T, PcStatusError>;

impl PcStatusError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PcStatusError::Config(msg.into())
    }

    /// Create a stats file error
    pub fn stats<S: Into<String>>(msg: S) -> Self {
        PcStatusError::Stats(msg.into())
    }

    pub fn notifier<S: Into<String>>(msg: S) -> Self {
        PcStatusError::Notifier(msg.into())
    }
}

impl From<battery::Error> for PcStatusError {
    fn from(err: battery::Error) -> Self {
        PcStatusError::MetricCollection(format!("battery: {}", err))
    }
}
