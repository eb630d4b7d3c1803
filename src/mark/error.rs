// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the watermarking core.
//!
//! [`MarkError`] covers the configuration failures of the scheme. Detector
//! outcomes (`NearOrigin`, `InSawtoothBand`, `OutsideExternalCone`) are
//! *not* errors — they are valid decisions carried by
//! [`Decision`](crate::mark::detect::Decision).

use core::fmt;

/// Errors that can occur during embedding or detection.
///
/// All variants are fatal configuration or precondition failures; none are
/// retried or silently corrected.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkError {
    /// Image dimensions are zero or not evenly divisible by `2^levels`.
    InvalidDimensions {
        rows: usize,
        cols: usize,
        levels: u32,
    },
    /// A coefficient sequence does not match the subband geometry.
    SequenceLengthMismatch { expected: usize, actual: usize },
    /// Cone count must satisfy `0 < n_c <= n_v`.
    BadConeCount { n_c: usize, n_v: usize },
    /// The secret subspace dimension must be positive.
    EmptySubspace,
    /// The host sequence is empty.
    EmptyHost,
    /// Gram-Schmidt residual has (near-)zero norm: the host projection is
    /// collinear with the pivot carrier and the MCB plane is undefined.
    DegenerateBasis,
    /// Host sequence has zero variance; the proportional distortion budget
    /// is undefined for a flat host.
    FlatHost,
    /// The host's second plane coordinate exceeds the distortion budget
    /// radius: the clamped embedding point does not exist.
    DistortionBudgetExceeded { rho: f64, c_x2: f64 },
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { rows, cols, levels } => write!(
                f,
                "image dimensions {rows}x{cols} not divisible by 2^{levels}"
            ),
            Self::SequenceLengthMismatch { expected, actual } => write!(
                f,
                "coefficient sequence length {actual} does not match subband geometry (expected {expected})"
            ),
            Self::BadConeCount { n_c, n_v } => {
                write!(f, "cone count {n_c} outside 1..={n_v}")
            }
            Self::EmptySubspace => write!(f, "secret subspace dimension is zero"),
            Self::EmptyHost => write!(f, "host sequence is empty"),
            Self::DegenerateBasis => {
                write!(f, "host projection collinear with pivot carrier")
            }
            Self::FlatHost => write!(f, "host sequence has zero variance"),
            Self::DistortionBudgetExceeded { rho, c_x2 } => write!(
                f,
                "distortion budget rho={rho} smaller than |c_X2|={}",
                c_x2.abs()
            ),
        }
    }
}

impl std::error::Error for MarkError {}
