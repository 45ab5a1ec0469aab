use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown polymer species '{0}'")]
    UnknownSpecies(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid lattice dimension {0}: the dimension must be at least 1")]
    InvalidDimension(usize),

    #[error("A polymer needs at least one point")]
    EmptyPath,

    #[error("Requested {steps} steps but the explicit path has {path_len} points")]
    StepsMismatch { steps: usize, path_len: usize },

    #[error("Point {index} has dimension {found}, expected {expected}")]
    PointDimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Path visits the same site at indices {first} and {second}")]
    SelfIntersectingPath { first: usize, second: usize },

    #[error("Invalid norm order {0}: the order must lie in [1, inf]")]
    InvalidNormOrder(f64),

    #[error("The rotation group in dimension {dimension} has no non-identity element")]
    TrivialSymmetryGroup { dimension: usize },
}
