//! Error types for picostate operations.

use crate::{Path, Seg};
use thiserror::Error;

/// Result type alias for picostate operations.
pub type PicoResult<T> = Result<T, PicoError>;

/// Errors that can occur while assembling or transitioning a tree.
#[derive(Debug, Error)]
pub enum PicoError {
    /// Meta was looked up on an absent context.
    ///
    /// Signals a malformed tree or API misuse; never recovered.
    #[error("cannot look up meta of a missing context")]
    MissingContext,

    /// No child node exists at the path.
    #[error("no substate at {path}")]
    PathNotFound {
        /// The path that was addressed.
        path: Path,
    },

    /// Array index is out of bounds for a raw write.
    #[error("index {index} out of bounds (len: {len})")]
    IndexOutOfBounds {
        /// The index that was written.
        index: usize,
        /// The actual length of the array.
        len: usize,
    },

    /// A slot name does not fit the shape of the raw value it addresses.
    #[error("cannot address {seg} in {found} value")]
    SlotMismatch {
        /// The slot that was addressed.
        seg: Seg,
        /// Kind of the value found.
        found: &'static str,
    },

    /// A transition was applied to a node of another type.
    #[error("transition `{transition}` expects {expected}, found {found}")]
    TypeMismatch {
        /// Name of the transition.
        transition: &'static str,
        /// Rust type the transition is bound to.
        expected: &'static str,
        /// Lifted type name of the receiving node.
        found: String,
    },

    /// A composed lens was written through an absent intermediate focus.
    #[error("composed lens has no intermediate focus")]
    FocusNotFound,

    /// Assembly recursed past the configured depth.
    #[error("assembly nested deeper than {limit} levels")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// Invalid operation error.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PicoError {
    /// Create a path not found error.
    #[inline]
    pub fn path_not_found(path: Path) -> Self {
        PicoError::PathNotFound { path }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        PicoError::IndexOutOfBounds { index, len }
    }

    /// Create a slot mismatch error.
    #[inline]
    pub fn slot_mismatch(seg: Seg, found: &'static str) -> Self {
        PicoError::SlotMismatch { seg, found }
    }

    /// Create an invalid operation error.
    #[inline]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        PicoError::InvalidOperation {
            message: message.into(),
        }
    }
}
