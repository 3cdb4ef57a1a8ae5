//! Seed-expanding pseudo-random generator.

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use rand::{CryptoRng, Error, RngCore, SeedableRng};

use crate::Block;

/// A PRG which expands a [`Block`] seed into an arbitrary-length stream using
/// AES-128 in counter mode.
///
/// The stream is stateful: consecutive calls to [`RngCore::fill_bytes`]
/// continue where the previous call stopped.
#[derive(Clone)]
pub struct Prg(Ctr128BE<Aes128>);

opaque_debug::implement!(Prg);

impl Prg {
    /// Creates a new PRG seeded from the thread-local RNG.
    pub fn new() -> Self {
        Self::from_seed(rand::random::<Block>())
    }

    /// Creates a new PRG from a seed.
    pub fn new_with_seed(seed: [u8; 16]) -> Self {
        Self::from_seed(Block::new(seed))
    }}

impl Default for Prg {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Prg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
        self.0.apply_keystream(dest);
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Prg {
    type Seed = Block;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        let key = seed.to_bytes();
        Self(Ctr128BE::<Aes128>::new(&key.into(), &[0u8; 16].into()))
    }
}

impl CryptoRng for Prg {}
