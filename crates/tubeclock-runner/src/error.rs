//! Error types for the runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// I/O error on the link or the file system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The settings file is not valid YAML for [`RunnerSettings`](crate::RunnerSettings).
    #[error("failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings parsed but make no sense.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The TCP link could not be started.
    #[error("failed to start TCP link on port {port}: {source}")]
    TcpBind {
        port: u16,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
