use cotgen_core::buffer::{check_length, Buffer, BufferError};
use serde::{Deserialize, Serialize};

use crate::bitvec::{BitSlice, BitVec};

/// Errors that can occur when constructing a [`Z2Triple`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum TripleError {
    #[error("share length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("byte length mismatch: expected {expected} bytes, got {actual}")]
    ByteLengthMismatch { expected: usize, actual: usize },
    #[error("padding bits must be zero")]
    NonZeroPadding,
}

/// A party's shares of `num` boolean multiplication triples.
///
/// XOR-ing both parties' shares gives bits `a`, `b` and `c` with
/// `c = a ∧ b`. The shares are bit-packed, oldest triple first, so the
/// newest triple is the least significant bit of each share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Z2Triple {
    a: BitVec,
    b: BitVec,
    c: BitVec,
}

impl Z2Triple {
    /// Creates a new triple share.
    ///
    /// Returns an error if the shares do not have the same length.
    pub fn new(a: BitVec, b: BitVec, c: BitVec) -> Result<Self, TripleError> {
        for share in [&b, &c] {
            if share.len() != a.len() {
                return Err(TripleError::LengthMismatch {
                    expected: a.len(),
                    actual: share.len(),
                });
            }
        }

        Ok(Self { a, b, c })
    }

    /// Creates a triple share from big-endian bytes, as returned by
    /// [`Z2Triple::a_bytes`] and friends.
    ///
    /// # Arguments
    ///
    /// * `num` - Number of triples.
    /// * `a`, `b`, `c` - The shares, each `ceil(num / 8)` bytes.
    pub fn from_bytes(num: usize, a: &[u8], b: &[u8], c: &[u8]) -> Result<Self, TripleError> {
        Ok(Self {
            a: from_be_bytes(num, a)?,
            b: from_be_bytes(num, b)?,
            c: from_be_bytes(num, c)?,
        })
    }

    /// Returns the number of triples.
    pub fn num(&self) -> usize {
        self.a.len()
    }

    /// Returns the number of bytes of each packed share, `ceil(num / 8)`.
    pub fn byte_num(&self) -> usize {
        self.num().div_ceil(8)
    }

    /// Returns the share of `a`.
    pub fn a(&self) -> &BitSlice {
        &self.a
    }

    /// Returns the share of `b`.
    pub fn b(&self) -> &BitSlice {
        &self.b
    }

    /// Returns the share of `c`.
    pub fn c(&self) -> &BitSlice {
        &self.c
    }

    /// Returns the share of `a` as a big-endian integer of
    /// [`byte_num`](Z2Triple::byte_num) bytes.
    pub fn a_bytes(&self) -> Vec<u8> {
        to_be_bytes(&self.a)
    }

    /// Returns the share of `b` as a big-endian integer.
    pub fn b_bytes(&self) -> Vec<u8> {
        to_be_bytes(&self.b)
    }

    /// Returns the share of `c` as a big-endian integer.
    pub fn c_bytes(&self) -> Vec<u8> {
        to_be_bytes(&self.c)
    }}

/// Packs bits into bytes, zero-padding the most significant end.
fn to_be_bytes(bits: &BitSlice) -> Vec<u8> {
    let pad = bits.len().div_ceil(8) * 8 - bits.len();

    let mut packed = BitVec::repeat(false, pad);
    packed.extend_from_bitslice(bits);
    packed.into_vec()
}

fn from_be_bytes(num: usize, bytes: &[u8]) -> Result<BitVec, TripleError> {
    let expected = num.div_ceil(8);
    if bytes.len() != expected {
        return Err(TripleError::ByteLengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let bits = BitSlice::from_slice(bytes);
    let pad = expected * 8 - num;
    if bits[..pad].any() {
        return Err(TripleError::NonZeroPadding);
    }

    Ok(bits[pad..].to_bitvec())
}

impl Buffer for Z2Triple {
    fn len(&self) -> usize {
        self.num()
    }

    fn merge(&mut self, other: Self) -> Result<(), BufferError> {
        self.a.extend_from_bitslice(&other.a);
        self.b.extend_from_bitslice(&other.b);
        self.c.extend_from_bitslice(&other.c);

        Ok(())
    }

    fn split(&mut self, length: usize) -> Result<Self, BufferError> {
        check_length(length, self.num())?;

        let at = self.num() - length;
        Ok(Self {
            a: self.a.split_off(at),
            b: self.b.split_off(at),
            c: self.c.split_off(at),
        })
    }

    fn reduce(&mut self, length: usize) -> Result<(), BufferError> {
        check_length(length, self.num())?;

        let at = self.num() - length;
        self.a = self.a.split_off(at);
        self.b = self.b.split_off(at);
        self.c = self.c.split_off(at);

        Ok(())
    }
}
