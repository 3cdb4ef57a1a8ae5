use std::{
    array::TryFromSliceError,
    ops::{BitAnd, BitAndAssign, BitXor, BitXorAssign},
};

use itybity::IntoBits;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

/// A 128-bit block.
///
/// Bits are indexed in LSB0 order: bit `i` is bit `i % 8` of byte `i / 8`.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block([u8; 16]);

impl Block {
    /// The length of a block in bytes.
    pub const LEN: usize = 16;
    /// The length of a block in bits.
    pub const BITS: usize = 128;
    /// A block with all bits set to 0.
    pub const ZERO: Self = Self([0; 16]);
    /// A block with all bits set to 1.
    pub const ONES: Self = Self([0xff; 16]);

    /// Creates a new block.
    #[inline]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generates a random block using the provided RNG.
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen())
    }

    /// Returns the byte representation of the block.
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns the least significant bit of the block.
    #[inline]
    pub fn lsb(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Sets the least significant bit of the block.
    #[inline]
    pub fn set_lsb(&mut self, bit: bool) {
        self.0[0] = (self.0[0] & 0xfe) | bit as u8;
    }

    /// Returns the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 128`.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        (self.0[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Returns an iterator over the bits of the block in LSB0 order.
    pub fn iter_lsb0(&self) -> impl Iterator<Item = bool> {
        self.0.into_iter().flat_map(|byte| byte.into_iter_lsb0())
    }

    /// Returns the bits of the block in LSB0 order.
    pub fn to_lsb0_vec(&self) -> Vec<bool> {
        self.iter_lsb0().collect()
    }

    /// Creates a block from 128 bits in LSB0 order.
    ///
    /// Returns `None` if the iterator does not yield exactly 128 bits.
    pub fn from_lsb0_iter(bits: impl IntoIterator<Item = bool>) -> Option<Self> {
        let mut bytes = [0u8; 16];
        let mut count = 0;
        for bit in bits {
            if count == Self::BITS {
                return None;
            }
            bytes[count / 8] |= (bit as u8) << (count % 8);
            count += 1;
        }

        (count == Self::BITS).then_some(Self(bytes))
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({})", hex::encode(self.0))
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(block: Block) -> Self {
        block.0
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(value: u128) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<Block> for u128 {
    #[inline]
    fn from(block: Block) -> Self {
        u128::from_le_bytes(block.0)
    }
}

impl TryFrom<&[u8]> for Block {
    type Error = TryFromSliceError;

    #[inline]
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(bytes).map(Self)
    }
}

impl AsRef<[u8]> for Block {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(mut self, rhs: Self) -> Self::Output {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a ^= b);
    }
}

impl BitAnd for Block {
    type Output = Self;

    #[inline]
    fn bitand(mut self, rhs: Self) -> Self::Output {
        self &= rhs;
        self
    }
}

impl BitAndAssign for Block {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a &= b);
    }
}

impl Distribution<Block> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block::new(rng.gen())
    }
}
