//! Correlated oblivious transfer extension based on
//! [`ALSZ13`](https://eprint.iacr.org/2016/602), semi-honest variant.
//!
//! `CSP` base OTs are extended to an arbitrary number of correlated OTs using
//! a PRG and a single message from the receiver to the sender. The COT
//! receiver acts as the base OT sender and the COT sender acts as the base OT
//! receiver, whose choice bits form the global correlation `Δ`.
//!
//! Each column PRG keeps its position across extensions, so the base OT keys
//! are expanded only once and every extension consumes fresh output.

mod config;
mod error;
mod receiver;
mod sender;

pub use config::{
    ReceiverConfig, ReceiverConfigBuilder, ReceiverConfigBuilderError, SenderConfig,
    SenderConfigBuilder, SenderConfigBuilderError, DEFAULT_MAX_COUNT,
};
pub use error::{ReceiverError, SenderError};
pub use receiver::{state as receiver_state, Receiver};
pub use sender::{state as sender_state, Sender};

use cotgen_core::Block;
use serde::{Deserialize, Serialize};

use crate::TransferId;

/// Computational security parameter, the number of base OTs.
pub const CSP: usize = 128;

/// Returns the number of bytes per column for `count` COTs.
#[inline]
pub fn column_bytes(count: usize) -> usize {
    count.div_ceil(8)
}

/// Transposes `CSP` columns of `column_bytes(count)` bytes each into `count`
/// rows of `CSP` bits.
pub(crate) fn transpose_rows(mut matrix: Vec<u8>, count: usize) -> Vec<Block> {
    matrix_transpose::transpose_bits(&mut matrix, CSP).expect("matrix is rectangular");

    matrix
        .chunks_exact(CSP / 8)
        .take(count)
        .map(|row| {
            let mut block = [0u8; 16];
            block.copy_from_slice(row);
            Block::new(block)
        })
        .collect()
}

/// Extend message sent from the receiver to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extend {
    /// Transfer id.
    pub id: TransferId,
    /// Number of COTs.
    pub count: usize,
    /// The `u` columns, in base OT index order.
    pub columns: Vec<Vec<u8>>,
}
