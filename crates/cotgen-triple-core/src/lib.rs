//! Boolean multiplication triples derived from correlated OT.
//!
//! Each party runs two COT extensions per round, once as the sender and once
//! as the receiver. The sender output yields the party's share of `a`, the
//! receiver output its share of `b`, and together they give a share of
//! `c = a ∧ b` without any further communication.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod bitvec;
mod derive;
mod triple;

pub use derive::{combine, receiver_half, sender_half, tweak, ReceiverHalf, SenderHalf};
pub use triple::{TripleError, Z2Triple};
