// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Robustness-maximizing embedding in the MCB plane.
//!
//! Given the host's plane coordinates and a distortion budget `rho`, the
//! embedder picks the watermarked point on the budget circle that maximizes
//! the squared distance to the internal cone's boundary line through the
//! origin at `angle`. The candidate is the circle point facing the boundary;
//! if it would cross below the `c2 = 0` axis, the point is clamped to the
//! intersection of the budget circle with the axis instead.

use crate::mark::error::MarkError;

/// Watermark offset in the MCB plane, descaled for back-projection, plus the
/// achieved robustness (squared distance to the detection boundary).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedMark {
    pub c_w1: f64,
    pub c_w2: f64,
    pub robustness: f64,
}

/// Norm of the watermark vector in the secret subspace for a PSNR budget.
///
/// `√(h·w·255²·10^(−psnr/10) / var)` in proportional mode, without the
/// variance division otherwise.
///
/// # Errors
/// [`MarkError::FlatHost`] when `proportional` and the host variance is not
/// strictly positive.
pub fn watermark_norm(
    rows: usize,
    cols: usize,
    psnr: f64,
    variance: f64,
    proportional: bool,
) -> Result<f64, MarkError> {
    let budget = (rows * cols) as f64 * 255.0 * 255.0 * 10f64.powf(-psnr / 10.0);
    if proportional {
        if variance <= 0.0 {
            return Err(MarkError::FlatHost);
        }
        Ok((budget / variance).sqrt())
    } else {
        Ok(budget.sqrt())
    }
}

/// Maximize robustness under the distortion budget `rho = norm_s_w · mean_abs`.
///
/// The unclamped candidate offset is `(rho·sin θ, −rho·cos θ)`; robustness is
/// the squared distance of the watermarked point to the boundary line. When
/// the candidate's `c2` would go negative, the point clamps to `c2 = 0` at
/// the budget circle's axis intersection. The returned coordinates are
/// divided by `mean_abs` so they compose with the proportional
/// back-projection scaling.
///
/// # Errors
/// [`MarkError::DistortionBudgetExceeded`] in the clamp branch when
/// `rho² < c_x2²` — the budget circle never reaches the axis and the clamped
/// point does not exist.
pub fn max_robustness(
    c_x1: f64,
    c_x2: f64,
    mean_abs: f64,
    norm_s_w: f64,
    angle: f64,
) -> Result<PlannedMark, MarkError> {
    let rho = norm_s_w * mean_abs;
    let (sin_a, cos_a) = angle.sin_cos();

    let mut w_e1 = rho * sin_a;
    let mut w_e2 = -rho * cos_a;
    let c_y1 = c_x1 + w_e1;
    let c_y2 = c_x2 + w_e2;

    let line_dist = c_y1 * sin_a - c_y2 * cos_a;
    let mut robustness = line_dist * line_dist;

    if c_y2 < 0.0 {
        let radicand = rho * rho - c_x2 * c_x2;
        if radicand < 0.0 {
            return Err(MarkError::DistortionBudgetExceeded { rho, c_x2 });
        }
        let c_y1 = c_x1 + radicand.sqrt();
        robustness = c_y1 * c_y1 * sin_a * sin_a;
        w_e1 = c_y1 - c_x1;
        w_e2 = -c_x2; // c_y2 = 0
    }

    Ok(PlannedMark {
        c_w1: w_e1 / mean_abs,
        c_w2: w_e2 / mean_abs,
        robustness,
    })
}
