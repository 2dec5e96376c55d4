use thiserror::Error;

/// Custom error types for the options-surface library
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, OptionsError>;
