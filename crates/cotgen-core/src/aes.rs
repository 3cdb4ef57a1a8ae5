//! Fixed-key AES and the correlation-robust hash built on it.

use std::sync::LazyLock;

use aes::{
    cipher::{BlockEncrypt, KeyInit},
    Aes128,
};

use crate::Block;

/// Key of the process-wide [`FIXED_KEY_AES`] instance.
pub const FIXED_KEY: [u8; 16] = [
    105, 67, 45, 12, 90, 243, 18, 7, 33, 155, 201, 88, 2, 171, 64, 39,
];

/// Fixed-key AES cipher.
pub static FIXED_KEY_AES: LazyLock<FixedKeyAes> = LazyLock::new(|| FixedKeyAes::new(FIXED_KEY));

/// Fixed-key AES, modeled as a random permutation `π`.
pub struct FixedKeyAes {
    aes: Aes128,
}

opaque_debug::implement!(FixedKeyAes);

impl FixedKeyAes {
    /// Creates a new instance with the given key.
    pub fn new(key: [u8; 16]) -> Self {
        Self {
            aes: Aes128::new(&key.into()),
        }
    }

    /// Applies the permutation `π` to a block.
    #[inline]
    pub fn permute(&self, block: Block) -> Block {
        let mut b = aes::Block::from(block.to_bytes());
        self.aes.encrypt_block(&mut b);

        let mut out = [0u8; 16];
        out.copy_from_slice(&b);
        Block::new(out)
    }

    /// Tweakable circular correlation robust hash function.
    ///
    /// `π(π(x) ⊕ i) ⊕ π(x)` where `i` is the tweak.
    ///
    /// See [GKWY20](https://eprint.iacr.org/2019/074) (Section 7.4).
    #[inline]
    pub fn tccr(&self, tweak: Block, block: Block) -> Block {
        let h = self.permute(block);
        self.permute(h ^ tweak) ^ h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tccr_deterministic() {
        let x = Block::new([3u8; 16]);
        let tweak = Block::from(1u128);

        assert_eq!(FIXED_KEY_AES.tccr(tweak, x), FIXED_KEY_AES.tccr(tweak, x));
    }

    #[test]
    fn test_tccr_tweak_separates() {
        let x = Block::new([3u8; 16]);

        assert_ne!(
            FIXED_KEY_AES.tccr(Block::from(0u128), x),
            FIXED_KEY_AES.tccr(Block::from(1u128), x)
        );
    }}
