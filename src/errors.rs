use procura_config::ConfigError;
use procura_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the dashboard layer.
#[derive(Debug, Error)]
pub enum ProcuraError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
