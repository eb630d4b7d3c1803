// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Wavelet-domain collaborator seam and subband geometry.
//!
//! The wavelet transform itself (typically 9/7 lifting) is an external
//! collaborator: the core only requires a forward/inverse transform
//! whose merged-matrix subband layout matches [`SubbandLayout`]. Hosts inject
//! it through [`WaveletTransform`]; [`NoTransform`] serves callers that
//! already hand the core a coefficient matrix, and the test suite.

use crate::mark::error::MarkError;
use crate::matrix::Matrix;

/// Forward/inverse transform between the pixel domain and the merged
/// multi-level subband matrix the sequence extractor consumes.
///
/// Implementations must be exact inverses of each other up to floating
/// round-off and must preserve matrix dimensions.
pub trait WaveletTransform {
    fn forward(&self, image: &Matrix) -> Result<Matrix, MarkError>;
    fn inverse(&self, coefficients: &Matrix) -> Result<Matrix, MarkError>;
}

/// Identity transform: treats the input matrix as already being in the
/// wavelet domain. Forward and inverse are trivially exact inverses, which
/// is all the core requires of a collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransform;

impl WaveletTransform for NoTransform {
    fn forward(&self, image: &Matrix) -> Result<Matrix, MarkError> {
        Ok(image.clone())
    }

    fn inverse(&self, coefficients: &Matrix) -> Result<Matrix, MarkError> {
        Ok(coefficients.clone())
    }
}

/// One rectangular subband region inside the merged coefficient matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subband {
    pub row0: usize,
    pub col0: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Subband {
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subband geometry of a `levels`-deep pyramid decomposition of a
/// `rows × cols` matrix.
///
/// The merged layout is the standard pyramid: the residual LL band occupies
/// the top-left `rows/2^levels × cols/2^levels` corner; at each depth `d`
/// (in `1..=levels`, `d = 1` finest) the three detail subbands of size
/// `rows/2^d × cols/2^d` sit top-right (HL), bottom-left (LH) and
/// bottom-right (HH) of the `2^(d-1)`-scaled quadrant.
#[derive(Debug, Clone, Copy)]
pub struct SubbandLayout {
    rows: usize,
    cols: usize,
    levels: u32,
}

impl SubbandLayout {
    /// Validate the geometry: both dimensions must be nonzero and evenly
    /// divisible by `2^levels`, and `levels` must be at least 1.
    pub fn new(rows: usize, cols: usize, levels: u32) -> Result<Self, MarkError> {
        let div = 1usize << levels;
        if levels == 0 || rows == 0 || cols == 0 || rows % div != 0 || cols % div != 0 {
            return Err(MarkError::InvalidDimensions { rows, cols, levels });
        }
        Ok(Self { rows, cols, levels })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// The residual low-frequency (LL) region.
    pub fn low_band(&self) -> Subband {
        Subband {
            row0: 0,
            col0: 0,
            rows: self.rows >> self.levels,
            cols: self.cols >> self.levels,
        }
    }

    /// Length of the flattened LL sequence: `rows·cols / 4^levels`.
    pub fn low_len(&self) -> usize {
        self.low_band().len()
    }

    /// Length of the flattened high-frequency sequence.
    pub fn high_len(&self) -> usize {
        self.rows * self.cols - self.low_len()
    }

    /// Detail subbands in canonical flattening order: coarsest retained
    /// level first, finest last; HL, LH, HH within each level.
    pub fn detail_bands(&self) -> Vec<Subband> {
        let mut bands = Vec::with_capacity(3 * self.levels as usize);
        for depth in (1..=self.levels).rev() {
            let sr = self.rows >> depth;
            let sc = self.cols >> depth;
            // HL: horizontal detail, top-right quadrant.
            bands.push(Subband { row0: 0, col0: sc, rows: sr, cols: sc });
            // LH: vertical detail, bottom-left quadrant.
            bands.push(Subband { row0: sr, col0: 0, rows: sr, cols: sc });
            // HH: diagonal detail, bottom-right quadrant.
            bands.push(Subband { row0: sr, col0: sc, rows: sr, cols: sc });
        }
        bands
    }
}
