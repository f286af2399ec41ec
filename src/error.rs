use std::{error::Error, fmt};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Failures surfaced when inputs violate the model's invariants.
///
/// Every variant is a caller error, not a transient condition; nothing in
/// this crate retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    /// A user or item index falls outside its allocated table.
    OutOfRange {
        /// Which table was indexed (e.g. "user", "item").
        what: &'static str,
        /// The offending index.
        index: usize,
        /// The table length it was checked against.
        len: usize,
    },

    /// Two parallel sequences, or a buffer and its layout, disagree in length.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "targets", "grads").
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),
}

impl fmt::Display for FactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorError::OutOfRange { what, index, len } => {
                write!(f, "{what} index {index} is out of range for table of length {len}")
            }
            FactorError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            FactorError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl Error for FactorError {}
