//! Error types for the monster AI
//!
//! Nothing inside a tick fails: anomalies there are handled as policy and
//! logged. Errors only come from building and loading configuration.

use thiserror::Error;

/// Monster AI errors
#[derive(Debug, Error)]
pub enum AiError {
    /// Configuration failed validation
    #[error("Invalid monster configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is not valid JSON for the expected shape
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for monster AI operations
pub type Result<T> = std::result::Result<T, AiError>;
