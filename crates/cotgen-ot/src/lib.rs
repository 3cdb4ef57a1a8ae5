//! Correlated oblivious transfer engines.
//!
//! The engines in this crate drive the state machines of `cotgen-ot-core`
//! over a [`Context`](cotgen_common::Context). Every call either completes or
//! fails with an error classified by [`ErrorKind`]. An engine which failed
//! after it started communicating is left in an error state and must be
//! replaced, as partially consumed correlated randomness can not be reused.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod base;
mod cot;
pub mod extension;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;

pub use cot::{CotReceiver, CotSender};
pub use cotgen_ot_core::{
    correlated::{CotReceiverOutput, CotSenderOutput},
    BaseOtReceiverOutput, BaseOtSenderOutput, TransferId,
};

/// The kind of an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The protocol was aborted, eg. because the peer sent a malformed
    /// message or the channel failed. The session must be restarted.
    Abort,
    /// The caller passed an invalid argument. Nothing was sent and the engine
    /// is unchanged.
    Parameter,
    /// The engine was not in a state which permits the call.
    State,
}

/// An error which can be classified by [`ErrorKind`].
pub trait ClassifyError: std::error::Error + Send + Sync + 'static {
    /// Returns the kind of the error.
    fn kind(&self) -> ErrorKind;
}
