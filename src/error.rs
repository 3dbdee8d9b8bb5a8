//! Error types.
//!
//! Two kinds of failure exist in this crate:
//! - [`SourceError`]: an upstream input terminated with an error. It travels
//!   as the `Err` side of every output that reads that input.
//! - [`ConfigError`]: header layout constants that cannot produce sensible
//!   geometry. Reported at construction time.

use thiserror::Error;

/// Terminal failure of an input stream.
///
/// Cloned into every derived that reads the failing input, so it stays
/// small: a label plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("source `{source_name}` failed: {message}")]
pub struct SourceError {
    pub source_name: String,
    pub message: String,
}

impl SourceError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Invalid header layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("`default_height` must be positive, got {0}")]
    NonPositiveDefaultHeight(f64),

    #[error("`header_offset` must not be negative, got {0}")]
    NegativeHeaderOffset(f64),

    #[error("`large_height` ({large}) is smaller than `default_height` ({default})")]
    LargeBelowDefault { large: f64, default: f64 },

    #[error("failed to parse header config: {0}")]
    Parse(#[from] toml::de::Error),
}
