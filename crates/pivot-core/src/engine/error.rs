use crate::core::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Pivot index {index} is out of range for a polymer with {steps} points")]
    InvalidPivotIndex { index: usize, steps: usize },

    #[error("Operator acts on dimension {found} but the polymer has dimension {expected}")]
    OperatorDimensionMismatch { expected: usize, found: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
