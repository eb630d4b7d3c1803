// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Detection decision over the MCB plane coordinates.
//!
//! The acceptance region is a statistically sized cone whose external
//! boundary is re-randomized on every call and whose internal boundary is
//! notched by a sawtooth along `c1`. An attacker probing the detector
//! repeatedly (a sensitivity attack) cannot map a stable decision boundary:
//! the external boundary moves per query and the sawtooth band is locally
//! non-convex.
//!
//! Two regions are insensitive to the random draw and anchor the scheme's
//! statistical guarantees: `cosAngle ≤ cosAngleMin` never detects, and
//! `cosAngle > cosAngleMin` with `saw ≥ ratioSaw` always detects.

use rand::Rng;

/// Cone geometry and sawtooth parameters.
///
/// Defaults are the published constants for 30 cones: the internal boundary
/// at `cos = 0.3479` gives a false-positive rate of ≈3·10⁻⁷, the widest
/// external boundary at `cos = 0.3248` ≈3·10⁻⁶.
#[derive(Debug, Clone, Copy)]
pub struct DetectorGeometry {
    /// Cosine of the internal (thinnest) cone boundary.
    pub cos_angle_min: f64,
    /// Cosine of the widest external cone boundary.
    pub cos_angle_max: f64,
    /// Minimum plane norm; points nearer the origin are rejected.
    pub norm_c_min: f64,
    /// Period of the sawtooth along `c1`.
    pub period_saw: f64,
    /// Tooth width as a fraction of the period.
    pub ratio_saw: f64,
}

impl Default for DetectorGeometry {
    fn default() -> Self {
        Self {
            cos_angle_min: 0.3479,
            cos_angle_max: 0.3248,
            norm_c_min: 10.0,
            period_saw: 30.0,
            ratio_saw: 0.15,
        }
    }
}

/// Detection outcome. Exactly one branch ([`Decision::Detected`]) is a
/// positive; the three rejections stay distinguishable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The point lies inside the sculpted cone: watermark present.
    Detected,
    /// The point is too close to the origin for a reliable angle.
    NearOrigin,
    /// The point fell in a sawtooth notch between the internal and the
    /// drawn external boundary.
    InSawtoothBand,
    /// The point lies outside the randomized external cone.
    OutsideExternalCone,
}

impl Decision {
    pub fn is_detected(self) -> bool {
        matches!(self, Self::Detected)
    }
}

/// Per-call boundary randomness.
///
/// This draw is intentionally *non-reproducible* and independent of the
/// keyed carrier stream; caching or reusing a draw would reintroduce the
/// stable boundary a sensitivity attacker needs. Tests substitute a fixed
/// or seeded source.
pub trait BoundaryDraw {
    /// One uniform value in `[0, 1)`.
    fn draw(&mut self) -> f64;
}

/// Production boundary source: a fresh OS-seeded thread RNG draw per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadBoundary;

impl BoundaryDraw for ThreadBoundary {
    fn draw(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Decide whether the plane point `(c1, c2)` carries the watermark.
///
/// Draws one fresh boundary value and evaluates the sculpted cone:
///
/// 1. `cosAngleExt = cosAngleMin − (cosAngleMin − cosAngleMax)·(1+r)/2`
/// 2. outside the external cone → [`Decision::OutsideExternalCone`]
/// 3. `‖c‖ < normCMin` → [`Decision::NearOrigin`]
/// 4. in a sawtooth notch below the internal boundary →
///    [`Decision::InSawtoothBand`]; otherwise [`Decision::Detected`]
pub fn decide(
    c1: f64,
    c2: f64,
    geometry: &DetectorGeometry,
    boundary: &mut impl BoundaryDraw,
) -> Decision {
    let r = boundary.draw();
    let cos_angle_ext =
        geometry.cos_angle_min - (geometry.cos_angle_min - geometry.cos_angle_max) * (1.0 + r) / 2.0;

    let norm = (c1 * c1 + c2 * c2).sqrt();
    let cos_angle = c1 / norm;

    if !(cos_angle > cos_angle_ext) {
        return Decision::OutsideExternalCone;
    }
    if norm < geometry.norm_c_min {
        return Decision::NearOrigin;
    }

    let mut saw = c1 / geometry.period_saw;
    saw -= saw.floor();
    if saw < 0.0 {
        saw = -saw;
    }

    if saw >= geometry.ratio_saw {
        return Decision::Detected;
    }
    if cos_angle < geometry.cos_angle_min {
        return Decision::InSawtoothBand;
    }
    Decision::Detected
}
