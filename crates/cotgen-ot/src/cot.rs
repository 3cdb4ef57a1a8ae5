use cotgen_common::Context;
use cotgen_core::Block;
use cotgen_ot_core::correlated::{CotReceiverOutput, CotSenderOutput};

use crate::ClassifyError;

/// A correlated OT sender.
pub trait CotSender {
    /// Error type.
    type Error: ClassifyError;

    /// Performs the one-time setup with the peer.
    fn setup(&mut self, ctx: &mut Context) -> Result<(), Self::Error>;

    /// Returns the global correlation `Δ`, unless the sender failed.
    fn delta(&self) -> Option<Block>;

    /// Sends `count` correlated OTs.
    fn send_cot(&mut self, ctx: &mut Context, count: usize)
        -> Result<CotSenderOutput, Self::Error>;
}

/// A correlated OT receiver.
pub trait CotReceiver {
    /// Error type.
    type Error: ClassifyError;

    /// Performs the one-time setup with the peer.
    fn setup(&mut self, ctx: &mut Context) -> Result<(), Self::Error>;

    /// Receives `count` correlated OTs with random choice bits.
    fn receive_cot(
        &mut self,
        ctx: &mut Context,
        count: usize,
    ) -> Result<CotReceiverOutput, Self::Error>;
}
