//! Common functionality for `cotgen`.
//!
//! This crate provides the transport used to execute two-party protocols: a
//! blocking, ordered and reliable [`Context`] which addresses every message by
//! session, step, sender and receiver.
//!
//! This crate does not provide any cryptographic primitives, see `cotgen-core`
//! for that.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod context;
mod id;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
pub mod io;

pub use context::{Context, ContextError, ErrorKind};
pub use id::{Counter, PartyId, SessionId};
