//! Animation error types

use thiserror::Error;
use wake_core::HostError;

/// Errors raised while loading motion configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML syntax or shape error
    #[error("Failed to parse motion config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Easing name or curve the engine does not know
    #[error("Invalid easing: {0:?}")]
    InvalidEasing(String),

    /// Allow-list entry outside transform/opacity
    #[error("Property {0:?} is not animatable; only transform and opacity are allowed")]
    DisallowedProperty(String),

    /// Duration token that must be positive
    #[error("Motion token `{0}` must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Errors surfaced by the animation engine
#[derive(Error, Debug)]
pub enum MotionError {
    /// The animator could not be constructed
    #[error("Animation engine unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, MotionError>;
