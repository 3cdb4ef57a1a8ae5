//! Messages for the base OT protocol.

use curve25519_dalek::ristretto::CompressedRistretto;
use serde::{Deserialize, Serialize};

/// Sender setup message, `S = y·G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderSetup {
    /// The sender's public key.
    pub public_key: CompressedRistretto,
}

/// Receiver payload, one blinded choice `R = x·G + c·S` per instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverPayload {
    /// The receiver's blinded choices, in index order.
    pub blinded_choices: Vec<CompressedRistretto>,
}
