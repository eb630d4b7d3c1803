// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Embedding and detection pipelines.
//!
//! Both pipelines share the same front half: wavelet-domain coefficients are
//! flattened into the host sequence, projected onto the keyed secret
//! subspace, the best cone is selected, and Gram-Schmidt yields the MCB
//! plane coordinates `(c1, c2)`. Detection then evaluates the sculpted-cone
//! decision; embedding optimizes a watermark offset in the plane, maps it
//! back through the basis and the adjoint projection, and reassembles the
//! coefficient matrix.
//!
//! The two randomness sources stay strictly separate: the keyed carrier
//! stream (reproducible, one fresh stream per projection pass) and the
//! detector's per-call boundary draw (non-reproducible, injectable for
//! tests).

pub mod carrier;
pub mod cone;
pub mod detect;
pub mod embed;
pub mod error;
pub mod extract;
pub mod project;

pub use carrier::{CarrierBits, CarrierStream, WatermarkKey};
pub use cone::{ConeChoice, PlaneBasis};
pub use detect::{BoundaryDraw, Decision, DetectorGeometry, ThreadBoundary};
pub use embed::PlannedMark;
pub use error::MarkError;

use crate::matrix::Matrix;
use crate::wavelet::WaveletTransform;
use project::Scaling;

/// Embedding/detection parameters. Configuration only; never mutated after
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct MarkParams {
    /// Wavelet decomposition depth.
    pub levels: u32,
    /// Secret subspace dimension.
    pub n_v: usize,
    /// Number of usable cones (first `n_c` subspace components).
    pub n_c: usize,
    /// Embedding distortion budget as PSNR in dB.
    pub psnr: f64,
    /// Fixed cone angle used by the embedder (radians).
    pub angle: f64,
    /// Proportional (perceptually adapted) vs constant embedding strength.
    pub proportional: bool,
}

impl Default for MarkParams {
    fn default() -> Self {
        Self {
            levels: 3,
            n_v: 256,
            n_c: 30,
            psnr: 43.0,
            angle: 1.2154,
            proportional: true,
        }
    }
}

/// Detection result: the boolean verdict plus the plane diagnostics behind
/// it.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub detected: bool,
    /// Which terminal branch of the decision tree fired.
    pub decision: Decision,
    /// Index of the cone most correlated with the host.
    pub cone_index: usize,
    /// `c1/‖c‖`; NaN if the plane coordinates are exactly at the origin.
    pub cos_angle: f64,
    pub c1: f64,
    pub c2: f64,
}

/// One fresh keyed projection pass. The carrier stream is constructed here
/// and owned by exactly this call; replaying the bits later means building a
/// new stream from the same key.
fn project_keyed(host: &[f64], n_v: usize, key: &WatermarkKey) -> Result<Vec<f64>, MarkError> {
    let mut stream = CarrierStream::new(key);
    #[cfg(feature = "parallel")]
    {
        project::project_par(host, n_v, &mut stream)
    }
    #[cfg(not(feature = "parallel"))]
    {
        project::project(host, n_v, &mut stream)
    }
}

fn back_project_keyed(
    subspace: &[f64],
    n_s: usize,
    key: &WatermarkKey,
    scaling: Scaling<'_>,
) -> Result<Vec<f64>, MarkError> {
    let mut stream = CarrierStream::new(key);
    #[cfg(feature = "parallel")]
    {
        project::back_project_par(subspace, n_s, &mut stream, scaling)
    }
    #[cfg(not(feature = "parallel"))]
    {
        project::back_project(subspace, n_s, &mut stream, scaling)
    }
}

/// Unbiased variance and mean absolute value of the host sequence.
fn host_stats(host: &[f64]) -> Result<(f64, f64), MarkError> {
    if host.len() < 2 {
        return Err(MarkError::EmptyHost);
    }
    let n = host.len() as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_abs = 0.0;
    for &x in host {
        sum += x;
        sum_sq += x * x;
        sum_abs += x.abs();
    }
    let variance = (sum_sq - sum * sum / n) / (n - 1.0);
    Ok((variance, sum_abs / n))
}

/// Embed the watermark into a wavelet-domain coefficient matrix.
///
/// Returns the watermarked coefficient matrix; the LL band passes through
/// untouched.
pub fn embed_coefficients(
    coefficients: &Matrix,
    key: &WatermarkKey,
    params: &MarkParams,
) -> Result<Matrix, MarkError> {
    let (low, host) = extract::extract(coefficients, params.levels)?;
    let (variance, mean_abs) = host_stats(&host)?;

    let norm_s_w = embed::watermark_norm(
        coefficients.rows(),
        coefficients.cols(),
        params.psnr,
        variance,
        params.proportional,
    )?;

    let secret = project_keyed(&host, params.n_v, key)?;
    let cone = cone::select_cone(&secret, params.n_c)?;
    let basis = cone::build_basis(&secret, &cone.pivot(params.n_v))?;

    // Constant embedding drops the perceptual scaling from the plane
    // optimization as well.
    let mean_eff = if params.proportional { mean_abs } else { 1.0 };
    let mark = embed::max_robustness(basis.c1, basis.c2, mean_eff, norm_s_w, params.angle)?;

    let v_w = basis.compose(mark.c_w1, mark.c_w2);
    let scaling = if params.proportional {
        Scaling::Proportional(&host)
    } else {
        Scaling::Constant
    };
    let s_w = back_project_keyed(&v_w, host.len(), key, scaling)?;

    let watermarked: Vec<f64> = host.iter().zip(&s_w).map(|(x, w)| x + w).collect();
    extract::extract_inv(
        &low,
        &watermarked,
        params.levels,
        coefficients.rows(),
        coefficients.cols(),
    )
}

/// Detect the watermark in a wavelet-domain coefficient matrix with explicit
/// cone geometry and boundary randomness. Entry point for tests and callers
/// that tune the cone.
pub fn detect_coefficients_with(
    coefficients: &Matrix,
    key: &WatermarkKey,
    params: &MarkParams,
    geometry: &DetectorGeometry,
    boundary: &mut impl BoundaryDraw,
) -> Result<Detection, MarkError> {
    let (_, host) = extract::extract(coefficients, params.levels)?;

    let secret = project_keyed(&host, params.n_v, key)?;
    let cone = cone::select_cone(&secret, params.n_c)?;
    let basis = cone::build_basis(&secret, &cone.pivot(params.n_v))?;

    let norm = (basis.c1 * basis.c1 + basis.c2 * basis.c2).sqrt();
    let decision = detect::decide(basis.c1, basis.c2, geometry, boundary);

    Ok(Detection {
        detected: decision.is_detected(),
        decision,
        cone_index: cone.index,
        cos_angle: basis.c1 / norm,
        c1: basis.c1,
        c2: basis.c2,
    })
}

/// Detect the watermark in a wavelet-domain coefficient matrix with the
/// default geometry and a fresh non-reproducible boundary draw.
pub fn detect_coefficients(
    coefficients: &Matrix,
    key: &WatermarkKey,
    params: &MarkParams,
) -> Result<Detection, MarkError> {
    detect_coefficients_with(
        coefficients,
        key,
        params,
        &DetectorGeometry::default(),
        &mut ThreadBoundary,
    )
}

/// Embed the watermark into a pixel-domain image through an injected wavelet
/// transform: forward transform, coefficient-domain embedding, inverse
/// transform.
pub fn embed_image(
    image: &Matrix,
    key: &WatermarkKey,
    params: &MarkParams,
    transform: &impl WaveletTransform,
) -> Result<Matrix, MarkError> {
    let coefficients = transform.forward(image)?;
    let watermarked = embed_coefficients(&coefficients, key, params)?;
    transform.inverse(&watermarked)
}

/// Detect the watermark in a pixel-domain image through an injected wavelet
/// transform.
pub fn detect_image(
    image: &Matrix,
    key: &WatermarkKey,
    params: &MarkParams,
    transform: &impl WaveletTransform,
) -> Result<Detection, MarkError> {
    let coefficients = transform.forward(image)?;
    detect_coefficients(&coefficients, key, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_published_constants() {
        let p = MarkParams::default();
        assert_eq!(p.levels, 3);
        assert_eq!(p.n_v, 256);
        assert_eq!(p.n_c, 30);
        assert_eq!(p.psnr, 43.0);
        assert!((p.angle - 1.2154).abs() < 1e-12);
        assert!(p.proportional);
    }

    #[test]
    fn host_stats_unbiased_variance() {
        let (var, mean_abs) = host_stats(&[1.0, -1.0, 3.0, -3.0]).unwrap();
        // mean 0, sum_sq 20, var = 20/3.
        assert!((var - 20.0 / 3.0).abs() < 1e-12);
        assert!((mean_abs - 2.0).abs() < 1e-12);
    }

    #[test]
    fn host_stats_rejects_tiny_host() {
        assert!(host_stats(&[1.0]).is_err());
        assert!(host_stats(&[]).is_err());
    }

    #[test]
    fn embed_preserves_shape_and_ll_band() {
        let key = WatermarkKey::new([1, 2, 3, 4]);
        let params = MarkParams {
            n_v: 16,
            n_c: 4,
            ..MarkParams::default()
        };
        let rows = 32;
        let cols = 32;
        let data: Vec<f64> = (0..rows * cols)
            .map(|k| (((k * 2654435761_usize) % 97) as f64) - 48.0)
            .collect();
        let coefficients = Matrix::from_vec(rows, cols, data);

        let marked = embed_coefficients(&coefficients, &key, &params).unwrap();
        assert_eq!(marked.rows(), rows);
        assert_eq!(marked.cols(), cols);

        // LL band (top-left 4x4 at levels=3) is untouched.
        for r in 0..rows >> 3 {
            for c in 0..cols >> 3 {
                assert_eq!(marked.get(r, c), coefficients.get(r, c));
            }
        }
        // The detail bands did change.
        assert_ne!(marked, coefficients);
    }

    #[test]
    fn detect_reports_plane_diagnostics() {
        let key = WatermarkKey::new([9, 9, 9, 9]);
        let params = MarkParams {
            n_v: 16,
            n_c: 4,
            ..MarkParams::default()
        };
        let data: Vec<f64> = (0..32 * 32)
            .map(|k| (((k * 40503) % 89) as f64) - 44.0)
            .collect();
        let coefficients = Matrix::from_vec(32, 32, data);

        let det = detect_coefficients(&coefficients, &key, &params).unwrap();
        assert!(det.cone_index < params.n_c);
        let norm = (det.c1 * det.c1 + det.c2 * det.c2).sqrt();
        assert!((det.cos_angle - det.c1 / norm).abs() < 1e-12);
        assert!(det.c2 >= 0.0);
        assert_eq!(det.detected, det.decision.is_detected());
    }
}
