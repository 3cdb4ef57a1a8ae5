/// Errors that can occur when using the base OT sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("invalid count: must transfer at least one OT")]
    InvalidCount,
    #[error("count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("blinded choice {0} is not a valid point")]
    InvalidPoint(usize),
}

/// Errors that can occur when using the base OT receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("invalid count: must transfer at least one OT")]
    InvalidCount,
    #[error("sender public key is not a valid point")]
    InvalidPoint,
}
