//! Share derivation.
//!
//! In a round where party `P` is the COT sender with keys `r0[i]` and global
//! correlation `Δ`, and its peer `Q` is the receiver with choices `b[i]` and
//! messages `rb[i] = r0[i] ⊕ b[i]·Δ`:
//!
//! - `P` hashes both keys, `m0 = H(j, r0[i])` and `m1 = H(j, r0[i] ⊕ Δ)`, and
//!   sets `a = m0 ⊕ m1`, `u = m0`.
//! - `Q` hashes its message, `v = H(j, rb[i]) = m0 ⊕ a·b`.
//!
//! So `u ⊕ v = a·b` is an XOR sharing of the cross term. With both
//! executions of a round combined, the local share `c = a·b ⊕ u ⊕ v` of each
//! party reconstructs to `(a0 ⊕ a1)·(b0 ⊕ b1)`.
//!
//! `H` is the least significant bit of the TCCR hash, tweaked with
//! `j = (round << 64) + i` so every index of every round is hashed
//! independently.

use cotgen_core::{aes::FIXED_KEY_AES, Block};
use cotgen_ot_core::{CotReceiverOutput, CotSenderOutput};

use crate::{
    bitvec::BitVec,
    triple::{TripleError, Z2Triple},
};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::prelude::*;
    }
}

/// Shares derived from a party's COT sender output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderHalf {
    /// Share of `a`.
    pub a: BitVec,
    /// Mask `u` of the cross term.
    pub u: BitVec,
}

/// Shares derived from a party's COT receiver output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverHalf {
    /// Share of `b`.
    pub b: BitVec,
    /// Mask `v` of the cross term.
    pub v: BitVec,
}

/// Returns the hash tweak of triple `index` in `round`.
#[inline]
pub fn tweak(round: u64, index: usize) -> Block {
    Block::from(((round as u128) << 64) + index as u128)
}

#[inline]
fn hash_bit(round: u64, index: usize, block: Block) -> bool {
    FIXED_KEY_AES.tccr(tweak(round, index), block).lsb()
}

/// Derives the shares of `a` and `u` from a COT sender output.
///
/// # Arguments
///
/// * `round` - Round number, the same for both parties.
/// * `output` - The party's COT sender output of the round.
pub fn sender_half(round: u64, output: &CotSenderOutput) -> SenderHalf {
    let delta = output.delta;
    let hash = |(i, key): (usize, &Block)| {
        let m0 = hash_bit(round, i, *key);
        let m1 = hash_bit(round, i, *key ^ delta);
        (m0 ^ m1, m0)
    };

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let bits: Vec<(bool, bool)> = output.keys.par_iter().enumerate().map(hash).collect();
        } else {
            let bits: Vec<(bool, bool)> = output.keys.iter().enumerate().map(hash).collect();
        }
    }

    SenderHalf {
        a: bits.iter().map(|(a, _)| *a).collect(),
        u: bits.iter().map(|(_, u)| *u).collect(),
    }
}

/// Derives the shares of `b` and `v` from a COT receiver output.
///
/// # Arguments
///
/// * `round` - Round number, the same for both parties.
/// * `output` - The party's COT receiver output of the round.
pub fn receiver_half(round: u64, output: &CotReceiverOutput) -> ReceiverHalf {
    let hash = |(i, msg): (usize, &Block)| hash_bit(round, i, *msg);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let v: Vec<bool> = output.msgs.par_iter().enumerate().map(hash).collect();
        } else {
            let v: Vec<bool> = output.msgs.iter().enumerate().map(hash).collect();
        }
    }

    ReceiverHalf {
        b: output.choices.iter().copied().collect(),
        v: v.into_iter().collect(),
    }
}

/// Combines both halves of a round into the party's triple shares.
///
/// Returns an error if the halves have different lengths.
pub fn combine(sender: SenderHalf, receiver: ReceiverHalf) -> Result<Z2Triple, TripleError> {
    let SenderHalf { a, u } = sender;
    let ReceiverHalf { b, v } = receiver;

    for len in [u.len(), b.len(), v.len()] {
        if len != a.len() {
            return Err(TripleError::LengthMismatch {
                expected: a.len(),
                actual: len,
            });
        }
    }

    let c: BitVec = a
        .iter()
        .by_vals()
        .zip(b.iter().by_vals())
        .zip(u.iter().by_vals().zip(v.iter().by_vals()))
        .map(|((a, b), (u, v))| (a & b) ^ u ^ v)
        .collect();

    Z2Triple::new(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_triple;

    use cotgen_ot_core::ideal::IdealCot;
    use rstest::*;

    /// Runs one round of both executions over ideal COTs.
    fn round(
        round: u64,
        cot_0: &mut IdealCot,
        cot_1: &mut IdealCot,
        num: usize,
    ) -> (Z2Triple, Z2Triple) {
        // Party 0 is the sender in the first execution.
        let (sender_0, receiver_1) = cot_0.random(num);
        // Party 1 is the sender in the second execution.
        let (sender_1, receiver_0) = cot_1.random(num);

        let triple_0 = combine(
            sender_half(round, &sender_0),
            receiver_half(round, &receiver_0),
        )
        .unwrap();
        let triple_1 = combine(
            sender_half(round, &sender_1),
            receiver_half(round, &receiver_1),
        )
        .unwrap();

        (triple_0, triple_1)
    }

    #[rstest]
    #[case::single(1)]
    #[case::unaligned(1000)]
    #[case::aligned(1024)]
    fn test_derive_triples(#[case] num: usize) {
        let mut cot_0 = IdealCot::new_with_seed([0u8; 16]);
        let mut cot_1 = IdealCot::new_with_seed([1u8; 16]);

        for r in 0..3 {
            let (triple_0, triple_1) = round(r, &mut cot_0, &mut cot_1, num);

            assert_eq!(triple_0.num(), num);
            assert_triple(&triple_0, &triple_1);
        }
    }

    #[test]
    fn test_cross_term() {
        let mut cot = IdealCot::new_with_seed([2u8; 16]);
        let (sender, receiver) = cot.random(500);

        let SenderHalf { a, u } = sender_half(7, &sender);
        let ReceiverHalf { b, v } = receiver_half(7, &receiver);

        for i in 0..500 {
            assert_eq!(u[i] ^ v[i], a[i] & b[i]);
        }
    }

    #[test]
    fn test_round_separates_hashes() {
        let mut cot = IdealCot::new_with_seed([3u8; 16]);
        let (sender, _) = cot.random(256);

        assert_ne!(sender_half(0, &sender), sender_half(1, &sender));
    }

    #[test]
    fn test_combine_length_mismatch() {
        let mut cot = IdealCot::new_with_seed([4u8; 16]);
        let (sender, _) = cot.random(10);
        let (_, receiver) = cot.random(11);

        let err = combine(sender_half(0, &sender), receiver_half(0, &receiver)).unwrap_err();
        assert_eq!(
            err,
            TripleError::LengthMismatch {
                expected: 10,
                actual: 11
            }
        );
    }

    #[test]
    fn test_tweak() {
        assert_eq!(tweak(0, 5), Block::from(5u128));
        assert_eq!(tweak(1, 0), Block::from(1u128 << 64));
    }
}
