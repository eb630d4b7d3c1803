// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end embed → detect tests over synthetic hosts.
//!
//! The identity transform stands in for the external wavelet collaborator:
//! the core's semantics only require that forward and inverse are exact
//! inverses, which lets these tests pin the noiseless guarantees — embedding
//! with a key and immediately detecting with the same key must succeed, a
//! wrong key must reject, and the achieved distortion must match the PSNR
//! budget.

use arrowmark::mark::cone::select_cone;
use arrowmark::mark::project::project;
use arrowmark::{
    detect_coefficients_with, detect_image, embed_coefficients, embed_image, psnr, BoundaryDraw,
    CarrierStream, Decision, DetectorGeometry, MarkError, MarkParams, Matrix, NoTransform,
    WatermarkKey,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Boundary source seeded for reproducible integration runs.
struct SeededBoundary(ChaCha20Rng);

impl SeededBoundary {
    fn new(seed: u8) -> Self {
        Self(ChaCha20Rng::from_seed([seed; 32]))
    }
}

impl BoundaryDraw for SeededBoundary {
    fn draw(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Synthetic host: uniform coefficients in [-30, 30), seeded.
fn synthetic_host(rows: usize, cols: usize, seed: u8) -> Matrix {
    let mut rng = ChaCha20Rng::from_seed([seed; 32]);
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(-30.0..30.0))
        .collect();
    Matrix::from_vec(rows, cols, data)
}

const KEY: WatermarkKey = WatermarkKey::new([0x1357_9BDF, 0x2468_ACE0, 0x0F1E_2D3C, 0x4B5A_6978]);

#[test]
fn embed_then_detect_same_key() {
    let host = synthetic_host(128, 128, 1);
    let params = MarkParams::default();

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();

    // The embedder places the point strictly inside the internal cone, so
    // detection must succeed for any boundary draw.
    for seed in [0u8, 7, 200] {
        let det = detect_coefficients_with(
            &marked,
            &KEY,
            &params,
            &DetectorGeometry::default(),
            &mut SeededBoundary::new(seed),
        )
        .unwrap();
        assert!(det.detected, "decision was {:?}", det.decision);
        assert_eq!(det.decision, Decision::Detected);
    }
}

#[test]
fn embedding_strengthens_the_host_cone() {
    let host = synthetic_host(128, 128, 2);
    let params = MarkParams::default();

    // Cone the host would select before embedding.
    let (_, high) = arrowmark::mark::extract::extract(&host, params.levels).unwrap();
    let secret = project(&high, params.n_v, &mut CarrierStream::new(&KEY)).unwrap();
    let host_cone = select_cone(&secret, params.n_c).unwrap();

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();
    let det = detect_coefficients_with(
        &marked,
        &KEY,
        &params,
        &DetectorGeometry::default(),
        &mut SeededBoundary::new(3),
    )
    .unwrap();

    assert!(det.detected);
    assert_eq!(det.cone_index, host_cone.index);
    assert!(det.cos_angle > DetectorGeometry::default().cos_angle_min);
}

#[test]
fn wrong_key_rejects() {
    let host = synthetic_host(128, 128, 4);
    let params = MarkParams::default();

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();

    let wrong = WatermarkKey::new([0xBAD0_0001, 0xBAD0_0002, 0xBAD0_0003, 0xBAD0_0004]);
    let det = detect_coefficients_with(
        &marked,
        &wrong,
        &params,
        &DetectorGeometry::default(),
        &mut SeededBoundary::new(5),
    )
    .unwrap();

    // A wrong key yields a statistically independent secret vector; at the
    // default geometry the point lands far outside even the widest external
    // cone.
    assert!(!det.detected);
    assert_eq!(det.decision, Decision::OutsideExternalCone);
}

#[test]
fn achieved_distortion_matches_psnr_budget() {
    let host = synthetic_host(128, 128, 6);
    let params = MarkParams::default();

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();
    let achieved = psnr(&host, &marked);

    // Proportional embedding is calibrated so that the expected distortion
    // equals the budget; the synthetic host is large enough that the
    // realized value concentrates tightly.
    assert!(
        (achieved - params.psnr).abs() < 0.5,
        "achieved {achieved} dB vs budget {} dB",
        params.psnr
    );
}

#[test]
fn constant_mode_embed_then_detect() {
    let host = synthetic_host(128, 128, 8);
    let params = MarkParams {
        proportional: false,
        ..MarkParams::default()
    };

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();
    let det = detect_coefficients_with(
        &marked,
        &KEY,
        &params,
        &DetectorGeometry::default(),
        &mut SeededBoundary::new(9),
    )
    .unwrap();
    assert!(det.detected, "decision was {:?}", det.decision);
}

#[test]
fn strong_budget_clamps_and_still_detects() {
    // PSNR 20 dB makes rho far exceed the host's c2: the embedder takes the
    // clamp branch and lands on the c2 = 0 axis, deep inside the cone.
    let host = synthetic_host(64, 64, 10);
    let params = MarkParams {
        psnr: 20.0,
        ..MarkParams::default()
    };

    let marked = embed_coefficients(&host, &KEY, &params).unwrap();
    let det = detect_coefficients_with(
        &marked,
        &KEY,
        &params,
        &DetectorGeometry::default(),
        &mut SeededBoundary::new(11),
    )
    .unwrap();
    assert!(det.detected, "decision was {:?}", det.decision);
    assert!(det.cos_angle > 0.9, "cos_angle {}", det.cos_angle);
}

#[test]
fn image_pipeline_through_identity_transform() {
    let image = synthetic_host(64, 64, 12);
    let params = MarkParams::default();

    let marked = embed_image(&image, &KEY, &params, &NoTransform).unwrap();
    assert_eq!(marked.rows(), 64);
    assert_eq!(marked.cols(), 64);

    let det = detect_image(&marked, &KEY, &params, &NoTransform).unwrap();
    assert!(det.detected);
}

#[test]
fn bad_dimensions_fail_before_any_work() {
    let image = synthetic_host(60, 64, 13);
    let params = MarkParams::default();
    assert!(matches!(
        embed_coefficients(&image, &KEY, &params),
        Err(MarkError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        arrowmark::detect_coefficients(&image, &KEY, &params),
        Err(MarkError::InvalidDimensions { .. })
    ));
}
