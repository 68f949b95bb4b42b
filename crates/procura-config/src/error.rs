use std::io;

use thiserror::Error;

/// Failures while reading, writing or validating the installation config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("config file is not valid JSON: {0}")]
    Serde(String),

    #[error("config value rejected: {0}")]
    Invalid(String),
}
