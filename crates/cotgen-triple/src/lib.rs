//! Boolean multiplication triple generation.
//!
//! A [`Generator`] composes one correlated OT sender and one correlated OT
//! receiver. Every round runs both engines against the peer with swapped roles
//! and derives one batch of triple shares, which is buffered until a caller
//! asks for it.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod config;
mod generator;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;

pub use config::{
    GeneratorConfig, GeneratorConfigBuilder, GeneratorConfigBuilderError, DEFAULT_MAX_ROUND,
};
pub use generator::{AlszGenerator, Generator, GeneratorError, Role};

pub use cotgen_ot::{ClassifyError, ErrorKind};
pub use cotgen_triple_core::Z2Triple;

use cotgen_common::Context;

/// A generator of boolean multiplication triples.
pub trait TripleGenerator {
    /// Error type.
    type Error: ClassifyError;

    /// Initializes the generator.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Thread context.
    /// * `expected_total` - Expected number of triples over the lifetime of
    ///   the generator, which bounds the size of each round.
    fn init(&mut self, ctx: &mut Context, expected_total: usize) -> Result<(), Self::Error>;

    /// Returns shares of exactly `num` triples.
    fn generate(&mut self, ctx: &mut Context, num: usize) -> Result<Z2Triple, Self::Error>;
}
