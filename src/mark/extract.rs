// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Sequence extraction: bijective mapping between the merged subband matrix
//! and the flat coefficient sequences.
//!
//! `extract` flattens all detail subbands into the high-frequency host
//! sequence (coarsest retained level first, HL/LH/HH within a level, each
//! subband row-major) and the residual LL band into a separate low sequence.
//! `extract_inv` is the exact inverse. Both are pure index permutations —
//! no value is transformed, so the round trip is bit-for-bit exact.

use crate::mark::error::MarkError;
use crate::matrix::Matrix;
use crate::wavelet::SubbandLayout;

/// Split a merged `levels`-deep coefficient matrix into
/// `(low_sequence, high_sequence)`.
pub fn extract(coefficients: &Matrix, levels: u32) -> Result<(Vec<f64>, Vec<f64>), MarkError> {
    let layout = SubbandLayout::new(coefficients.rows(), coefficients.cols(), levels)?;

    let mut high = Vec::with_capacity(layout.high_len());
    for band in layout.detail_bands() {
        for r in band.row0..band.row0 + band.rows {
            for c in band.col0..band.col0 + band.cols {
                high.push(coefficients.get(r, c));
            }
        }
    }

    let ll = layout.low_band();
    let mut low = Vec::with_capacity(layout.low_len());
    for r in 0..ll.rows {
        for c in 0..ll.cols {
            low.push(coefficients.get(r, c));
        }
    }

    Ok((low, high))
}

/// Rebuild the merged coefficient matrix from the two flat sequences.
///
/// # Errors
/// [`MarkError::InvalidDimensions`] for inconsistent geometry;
/// [`MarkError::SequenceLengthMismatch`] if either sequence does not match
/// the subband geometry implied by `levels`, `rows`, `cols`.
pub fn extract_inv(
    low: &[f64],
    high: &[f64],
    levels: u32,
    rows: usize,
    cols: usize,
) -> Result<Matrix, MarkError> {
    let layout = SubbandLayout::new(rows, cols, levels)?;

    if high.len() != layout.high_len() {
        return Err(MarkError::SequenceLengthMismatch {
            expected: layout.high_len(),
            actual: high.len(),
        });
    }
    if low.len() != layout.low_len() {
        return Err(MarkError::SequenceLengthMismatch {
            expected: layout.low_len(),
            actual: low.len(),
        });
    }

    let mut merged = Matrix::new_zeros(rows, cols);
    let mut k = 0;
    for band in layout.detail_bands() {
        for r in band.row0..band.row0 + band.rows {
            for c in band.col0..band.col0 + band.cols {
                merged.set(r, c, high[k]);
                k += 1;
            }
        }
    }

    let ll = layout.low_band();
    let mut k = 0;
    for r in 0..ll.rows {
        for c in 0..ll.cols {
            merged.set(r, c, low[k]);
            k += 1;
        }
    }

    Ok(merged)
}
