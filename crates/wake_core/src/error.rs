//! Host error types

use thiserror::Error;

/// Errors reported by host primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// Selector syntax the host cannot evaluate
    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),

    /// Intersection threshold outside `[0, 1]`
    #[error("Intersection threshold out of range: {0}")]
    InvalidThreshold(f64),

    /// Root margin that is not a list of one to four pixel/percent lengths
    #[error("Invalid root margin: {0:?}")]
    InvalidRootMargin(String),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, HostError>;
