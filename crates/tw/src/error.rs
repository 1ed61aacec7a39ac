//! CLI error types.

use tw_config::ConfigError;
use tw_pages::PageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Initial load failed: {0}")]
    Load(#[from] PageError),

    #[error("{0}")]
    Server(String),
}
