use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing environment variable: {name}")]
    MissingSecret { name: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid snapshot file {path}: {message}")]
    InvalidSnapshot { path: PathBuf, message: String },

    #[error("Logging setup error: {0}")]
    Logging(String),
}
