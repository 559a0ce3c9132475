//! Simulation errors

use cave_ai::AiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Monster error: {0}")]
    Ai(#[from] AiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
