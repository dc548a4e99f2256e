//! Error types for the particle field.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    /// The host could not provide a drawing context.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
