//! Networked correlated OT extension.
//!
//! The sender and receiver bootstrap with `CSP` base OTs, either executed
//! over the context with [`Sender::setup`] and [`Receiver::setup`], or supplied
//! by the caller with `init`. Each `execute` then costs a single message from
//! the receiver to the sender.

mod receiver;
mod sender;

pub use receiver::{Receiver, ReceiverError};
pub use sender::{Sender, SenderError};

pub use cotgen_ot_core::alsz::{
    ReceiverConfig, ReceiverConfigBuilder, ReceiverConfigBuilderError, SenderConfig,
    SenderConfigBuilder, SenderConfigBuilderError, CSP,
};
