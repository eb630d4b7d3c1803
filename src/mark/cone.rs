// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Cone selection and MCB plane construction.
//!
//! Only the first `N_c` secret-vector components are usable cones; the
//! remaining components are decoys. The selector picks the component with
//! the largest magnitude among those, fixing a signed reference axis (the
//! pivot carrier). Gram-Schmidt then spans an orthonormal 2-D basis from the
//! pivot and the host projection — the MCB plane in which both detection and
//! embedding operate.

use crate::mark::error::MarkError;

/// Minimum Gram-Schmidt residual norm before the plane is degenerate.
const EPS_NORM: f64 = 1e-12;

/// The selected cone: index into the secret vector and the carrier sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeChoice {
    pub index: usize,
    /// `+1.0` if the host projection is positive along the carrier,
    /// `-1.0` otherwise.
    pub sign: f64,
}

impl ConeChoice {
    /// The pivot vector: a standard basis vector at `index`, scaled by
    /// `sign`. Unit norm with a single nonzero entry.
    pub fn pivot(&self, n_v: usize) -> Vec<f64> {
        let mut pivot = vec![0.0; n_v];
        pivot[self.index] = self.sign;
        pivot
    }
}

/// Pick the cone most correlated with the host: argmax of `|secret[i]|`
/// over the first `n_c` components. Ties resolve to the first index.
pub fn select_cone(secret: &[f64], n_c: usize) -> Result<ConeChoice, MarkError> {
    if n_c == 0 || n_c > secret.len() {
        return Err(MarkError::BadConeCount {
            n_c,
            n_v: secret.len(),
        });
    }

    let mut index = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, &v) in secret[..n_c].iter().enumerate() {
        if v.abs() > best {
            best = v.abs();
            index = i;
        }
    }

    let sign = if secret[index] > 0.0 { 1.0 } else { -1.0 };
    Ok(ConeChoice { index, sign })
}

/// Orthonormal 2-D basis of the MCB plane plus the host's coordinates in it.
#[derive(Debug, Clone)]
pub struct PlaneBasis {
    pub e1: Vec<f64>,
    pub e2: Vec<f64>,
    /// Host projection onto `e1`.
    pub c1: f64,
    /// Host projection onto `e2` (always ≥ 0 by construction).
    pub c2: f64,
}

impl PlaneBasis {
    /// Map plane coordinates back into the secret subspace:
    /// `w1·e1 + w2·e2`.
    pub fn compose(&self, w1: f64, w2: f64) -> Vec<f64> {
        self.e1
            .iter()
            .zip(&self.e2)
            .map(|(a, b)| w1 * a + w2 * b)
            .collect()
    }
}

/// Gram-Schmidt construction of the MCB plane from the host's secret vector
/// and the pivot carrier.
///
/// `e1 = pivot/‖pivot‖`; `c1 = ⟨secret, e1⟩`;
/// `e2 = normalize(secret − c1·e1)`; `c2 = ⟨secret, e2⟩`.
///
/// # Errors
/// [`MarkError::DegenerateBasis`] when the residual norm is below tolerance
/// (host projection collinear with the pivot); normalizing the residual
/// would otherwise divide by zero.
pub fn build_basis(secret: &[f64], pivot: &[f64]) -> Result<PlaneBasis, MarkError> {
    if secret.len() != pivot.len() {
        return Err(MarkError::SequenceLengthMismatch {
            expected: secret.len(),
            actual: pivot.len(),
        });
    }

    let norm_e1 = norm(pivot);
    if norm_e1 <= EPS_NORM {
        return Err(MarkError::DegenerateBasis);
    }
    let e1: Vec<f64> = pivot.iter().map(|x| x / norm_e1).collect();

    let c1 = dot(secret, &e1);

    // Residual of the host projection orthogonal to e1, oriented so that
    // c2 comes out nonnegative.
    let raw: Vec<f64> = secret
        .iter()
        .zip(&e1)
        .map(|(x, e)| x - c1 * e)
        .collect();

    let norm_e2 = norm(&raw);
    if norm_e2 <= EPS_NORM {
        return Err(MarkError::DegenerateBasis);
    }
    let e2: Vec<f64> = raw.iter().map(|x| x / norm_e2).collect();

    let c2 = dot(secret, &e2);

    Ok(PlaneBasis { e1, e2, c1, c2 })
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}
