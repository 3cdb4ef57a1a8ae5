//! Low-level crate containing the state machines for correlated oblivious
//! transfer.
//!
//! The types in this crate perform no I/O. The networked engines which drive
//! them are provided by the `cotgen-ot` crate.
//!
//! # ⚠️ Warning ⚠️
//!
//! Some implementations make assumptions about invariants which may not be
//! checked if using these low-level APIs naively. Failing to uphold these
//! invariants may result in security vulnerabilities.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use serde::{Deserialize, Serialize};

pub mod alsz;
pub mod base;
pub mod correlated;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use base::{BaseOtReceiverOutput, BaseOtSenderOutput};
pub use correlated::{CotReceiverOutput, CotSenderOutput};

/// An oblivious transfer identifier.
///
/// Every extension is assigned the next identifier, so both parties can detect
/// a transcript which has fallen out of sync.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransferId(u64);

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

impl TransferId {
    /// Returns the identifier as a `u64`.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the current transfer ID, incrementing `self` in-place.
    pub(crate) fn next(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}
