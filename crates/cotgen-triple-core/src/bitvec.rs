//! Bit vectors.

/// Bit vector, most significant bit first.
pub type BitVec = bitvec::vec::BitVec<u8, bitvec::order::Msb0>;
/// Bit slice, most significant bit first.
pub type BitSlice = bitvec::slice::BitSlice<u8, bitvec::order::Msb0>;
