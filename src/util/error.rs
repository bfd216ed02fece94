//! Error types for detdecode.

use thiserror::Error;

/// Result alias for detdecode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while validating inputs or decoding detections.
///
/// Validation runs before any decoding work, so a failed call never yields
/// partial output.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The tensor dimensions are inconsistent with the buffer or the config.
    #[error("shape mismatch ({context}): expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which dimension or length disagreed.
        context: &'static str,
        /// Value implied by the config or shape.
        expected: usize,
        /// Value actually observed.
        got: usize,
    },
    /// A caller-supplied configuration value is out of range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// Reading a raw tensor file failed.
    #[error("tensor io error: {reason}")]
    Io { reason: String },
    /// Image decoding failed (only produced with the `image-io` feature).
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl DecodeError {
    pub(crate) fn shape(context: &'static str, expected: usize, got: usize) -> Self {
        Self::ShapeMismatch {
            context,
            expected,
            got,
        }
    }

    pub(crate) fn config(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}
