//! Errors at the I/O boundary. The layout engine itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SwimflowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid process description: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
