use crate::TransferId;

/// Errors that can occur when using the ALSZ sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("invalid count {count}, must be in (0, {max}]")]
    InvalidCount { count: usize, max: usize },
    #[error("count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("id mismatch: expected {0}, got {1}")]
    IdMismatch(TransferId, TransferId),
    #[error("invalid extend: expected {expected} columns, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("invalid extend: column {column} has {actual} bytes, expected {expected}")]
    ColumnLengthMismatch {
        column: usize,
        expected: usize,
        actual: usize,
    },
    #[error("not enough OTs are setup: expected {expected}, actual {actual}")]
    InsufficientSetup { expected: usize, actual: usize },
}

/// Errors that can occur when using the ALSZ receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("invalid count {count}, must be in (0, {max}]")]
    InvalidCount { count: usize, max: usize },
    #[error("not enough OTs are setup: expected {expected}, actual {actual}")]
    InsufficientSetup { expected: usize, actual: usize },
}
