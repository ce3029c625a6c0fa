//! Error types for Adquirir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Adquirir operations.
///
/// Covers pool bookkeeping violations, acquisition-function contract
/// breaches, and numeric corruption during scoring or training.
///
/// # Examples
///
/// ```
/// use adquirir::error::AdquirirError;
///
/// let err = AdquirirError::PoolExhausted { requested: 10, remaining: 3 };
/// assert!(err.to_string().contains("pool exhausted"));
/// ```
/// Which index space an offending index belongs to.
///
/// Pool operations deal in two spaces: logical positions into the current
/// (shrunken) pool view, and absolute positions into the immutable backing
/// collection. Stale-index diagnostics name the space so the two are never
/// confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    /// Position in the current pool view.
    Logical,
    /// Position in the immutable backing collection.
    Absolute,
}

#[derive(Debug)]
pub enum AdquirirError {
    /// A labelling request referenced an index that is no longer in the
    /// unlabelled pool (stale or duplicate request).
    AlreadyLabelled {
        /// The offending index
        index: usize,
        /// Index space the value refers to
        space: IndexSpace,
    },

    /// An acquisition requested more points than the pool holds.
    PoolExhausted {
        /// Batch size requested
        requested: usize,
        /// Points remaining in the pool
        remaining: usize,
    },

    /// An acquisition function violated its output contract.
    ShapeMismatch {
        /// Expected shape description
        expected: String,
        /// Actual shape found
        actual: String,
    },

    /// An acquisition score came out non-finite. Fatal: a corrupt score
    /// silently poisons the ranking.
    NonFiniteScore {
        /// Logical pool index of the item that produced the score
        index: usize,
        /// The offending value
        value: f32,
    },

    /// A training loss came out non-finite. Fatal: indicates a
    /// configuration or data error, never retried.
    NumericInstability {
        /// Where the value was observed (e.g. "semi-supervised step 412")
        context: String,
        /// The offending value
        value: f32,
    },

    /// Mutually exclusive or invalid configuration, raised before any
    /// state mutation.
    Config {
        /// What was misconfigured
        message: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AdquirirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdquirirError::AlreadyLabelled { index, space } => match space {
                IndexSpace::Logical => write!(
                    f,
                    "logical index {index} is stale: it no longer resolves into the unlabelled pool"
                ),
                IndexSpace::Absolute => write!(
                    f,
                    "absolute index {index} is no longer in the unlabelled pool (already labelled or duplicated in the request)"
                ),
            },
            AdquirirError::PoolExhausted {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "pool exhausted: requested {requested} points, {remaining} remaining"
                )
            }
            AdquirirError::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "acquisition shape mismatch: expected {expected}, got {actual}"
                )
            }
            AdquirirError::NonFiniteScore { index, value } => {
                write!(
                    f,
                    "non-finite acquisition score {value} for pool item {index}"
                )
            }
            AdquirirError::NumericInstability { context, value } => {
                write!(f, "non-finite loss {value} during {context}")
            }
            AdquirirError::Config { message } => write!(f, "invalid configuration: {message}"),
            AdquirirError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            AdquirirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AdquirirError {}

impl From<&str> for AdquirirError {
    fn from(msg: &str) -> Self {
        AdquirirError::Other(msg.to_string())
    }
}

impl From<String> for AdquirirError {
    fn from(msg: String) -> Self {
        AdquirirError::Other(msg)
    }
}

impl AdquirirError {
    /// Create a shape mismatch error with descriptive context.
    #[must_use]
    pub fn shape_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AdquirirError>;
