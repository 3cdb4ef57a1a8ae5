//! Bit-level matrix transposition.
//!
//! Matrices are stored row-major as byte slices, with the bits of each row
//! packed in LSB0 order: bit `j` of a row is bit `j % 8` of byte `j / 8`.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use thiserror::Error;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Errors that can occur when transposing a matrix.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransposeError {
    /// The number of rows is zero or not a multiple of 8.
    #[error("number of rows must be a non-zero multiple of 8, got {0}")]
    InvalidNumberOfRows(usize),
    /// The slice is not of rectangular shape.
    #[error("slice of length {len} is not rectangular with {rows} rows")]
    MalformedSlice {
        /// Length of the slice in bytes.
        len: usize,
        /// Number of rows.
        rows: usize,
    },
}

/// Transposes a bit matrix in place.
///
/// The matrix has `rows` rows of `matrix.len() / rows` bytes each. After the
/// call it holds `8 * matrix.len() / rows` rows of `rows / 8` bytes each,
/// where bit `i` of row `j` is bit `j` of the former row `i`.
///
/// The number of rows must be a non-zero multiple of 8 and the slice must be
/// non-empty and rectangular.
pub fn transpose_bits(matrix: &mut [u8], rows: usize) -> Result<(), TransposeError> {
    if rows == 0 || rows % 8 != 0 {
        return Err(TransposeError::InvalidNumberOfRows(rows));
    }

    if matrix.is_empty() || matrix.len() % rows != 0 {
        return Err(TransposeError::MalformedSlice {
            len: matrix.len(),
            rows,
        });
    }

    let row_bytes = matrix.len() / rows;
    let col_bytes = rows / 8;

    let mut out = vec![0u8; matrix.len()];
    let input = &*matrix;

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = out.par_chunks_exact_mut(8 * col_bytes).enumerate();
        } else {
            let iter = out.chunks_exact_mut(8 * col_bytes).enumerate();
        }
    }

    // Each chunk holds the 8 output rows produced by one byte column of the
    // input.
    iter.for_each(|(col, chunk)| {
        for block in 0..col_bytes {
            let mut bytes = [0u8; 8];
            for (k, byte) in bytes.iter_mut().enumerate() {
                *byte = input[(8 * block + k) * row_bytes + col];
            }

            let bytes = transpose_8x8(u64::from_le_bytes(bytes)).to_le_bytes();
            for (k, byte) in bytes.into_iter().enumerate() {
                chunk[k * col_bytes + block] = byte;
            }
        }
    });

    matrix.copy_from_slice(&out);

    Ok(())
}

/// Transposes an 8x8 bit matrix where bit `8 * r + c` is the entry at row `r`,
/// column `c`.
#[inline]
fn transpose_8x8(mut x: u64) -> u64 {
    let mut t = (x ^ (x >> 7)) & 0x00AA_00AA_00AA_00AA;
    x ^= t ^ (t << 7);
    t = (x ^ (x >> 14)) & 0x0000_CCCC_0000_CCCC;
    x ^= t ^ (t << 14);
    t = (x ^ (x >> 28)) & 0x0000_0000_F0F0_F0F0;
    x ^= t ^ (t << 28);
    x
}
