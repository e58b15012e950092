//! Error types for sequence mutations
//!
//! These are contract violations: the session validates drag input before it
//! reaches a [`SequenceModel`](super::sequence::SequenceModel), so in normal
//! use they are logged and dropped rather than shown to the user.

/// Errors raised by position-addressed sequence operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Position outside the valid interval for the operation
    #[error("position {position} out of range for sequence of length {len}")]
    OutOfRange { position: usize, len: usize },

    /// Operation not permitted for this structure kind
    #[error("invalid operation on {kind}: {message}")]
    InvalidOperation { kind: &'static str, message: String },
}
