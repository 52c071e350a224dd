//! Error types
//!
//! The simulation itself never fails; these cover startup and the storage
//! boundary.

use std::io;

/// Top-level error for starting and running the game shell
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Startup cannot proceed without somewhere to draw
    #[error("Render target unavailable: {0}")]
    MissingRenderTarget(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
