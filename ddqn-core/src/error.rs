//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// They are propagated to the caller and never retried.
#[derive(Error, Debug, PartialEq)]
pub enum DdqnError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A batch was requested from a replay buffer holding fewer transitions.
    #[error("Insufficient data in replay buffer: requested {requested}, available {available}")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,

        /// Number of transitions in the buffer.
        available: usize,
    },

    /// An observation does not have the shape the model was built for.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape the model expects.
        expected: Vec<usize>,

        /// Shape of the given observation.
        actual: Vec<usize>,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parameters of two networks cannot be copied into each other.
    #[error("Architecture mismatch: {0}")]
    ArchitectureMismatch(String),
}
