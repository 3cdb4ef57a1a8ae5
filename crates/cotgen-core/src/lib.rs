//! Core types and primitives for the `cotgen` workspace.
//!
//! This crate contains the symmetric-key building blocks shared by the
//! oblivious transfer and triple generation crates: 128-bit [`Block`]s, a
//! seed-expanding [`Prg`](prg::Prg), a fixed-key AES correlation-robust hash
//! and the [`Buffer`](buffer::Buffer) abstraction for streaming correlated
//! randomness.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod aes;
mod block;
pub mod buffer;
pub mod prg;

pub use block::Block;
pub use buffer::{Buffer, BufferError};
