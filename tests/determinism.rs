// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Cross-platform determinism tests.
//!
//! The scheme's security rests on the embedder and the detector deriving
//! bit-identical carrier streams from the same key, on any platform. Two
//! classes of invariants are pinned here:
//!
//! 1. **Keyed PRNG output**: the carrier stream is MT19937 seeded via
//!    `init_by_array` with the four key words; the reference seeding vector
//!    `[0x123, 0x234, 0x345, 0x456]` must reproduce the published MT19937
//!    test outputs.
//!
//! 2. **Pipeline determinism**: repeated projections and detections with the
//!    same key yield bit-identical secret vectors and plane coordinates; the
//!    only call-to-call variation allowed is the detector's boundary draw.

use arrowmark::mark::project::project;
use arrowmark::{
    detect_coefficients_with, BoundaryDraw, CarrierBits, CarrierStream, DetectorGeometry,
    MarkParams, Matrix, WatermarkKey,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

struct FixedBoundary(f64);

impl BoundaryDraw for FixedBoundary {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

fn synthetic_host(rows: usize, cols: usize, seed: u8) -> Matrix {
    let mut rng = ChaCha20Rng::from_seed([seed; 32]);
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(-30.0..30.0))
        .collect();
    Matrix::from_vec(rows, cols, data)
}

/// Pin the MT19937 `init_by_array` reference vector. These are the first
/// outputs published with the original mt19937ar implementation for the
/// seeding array {0x123, 0x234, 0x345, 0x456}. If this test fails, the
/// carrier stream is no longer the reference PRNG and every existing
/// watermark becomes undetectable.
#[test]
fn pin_mt19937_reference_outputs() {
    let key = WatermarkKey::new([0x123, 0x234, 0x345, 0x456]);
    let mut stream = CarrierStream::new(&key);
    let expected: [u32; 5] = [
        1067595299, 955945823, 477289528, 4107686914, 4228976476,
    ];
    for (i, &want) in expected.iter().enumerate() {
        assert_eq!(stream.next_word(), want, "word {i} diverged");
    }
}

/// Bit expansion is LSB-first within each 32-bit word; pin it against the
/// same reference vector.
#[test]
fn pin_carrier_bit_expansion() {
    let key = WatermarkKey::new([0x123, 0x234, 0x345, 0x456]);
    let mut stream = CarrierStream::new(&key);
    let first_word: u32 = 1067595299;
    for pos in 0..32 {
        assert_eq!(
            stream.next_bit(),
            first_word >> pos & 1 != 0,
            "bit {pos} of the first word"
        );
    }
}

#[test]
fn projection_is_bit_identical_across_calls() {
    let key = WatermarkKey::new([42, 43, 44, 45]);
    let host: Vec<f64> = {
        let mut rng = ChaCha20Rng::from_seed([77; 32]);
        (0..4096).map(|_| rng.gen_range(-100.0..100.0)).collect()
    };

    let a = project(&host, 64, &mut CarrierStream::new(&key)).unwrap();
    let b = project(&host, 64, &mut CarrierStream::new(&key)).unwrap();
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert_eq!(x.to_bits(), y.to_bits(), "component {i}");
    }
}

#[test]
fn detection_diagnostics_are_reproducible() {
    let host = synthetic_host(64, 64, 21);
    let key = WatermarkKey::new([5, 10, 15, 20]);
    let params = MarkParams::default();
    let geometry = DetectorGeometry::default();

    let a = detect_coefficients_with(&host, &key, &params, &geometry, &mut FixedBoundary(0.5))
        .unwrap();
    let b = detect_coefficients_with(&host, &key, &params, &geometry, &mut FixedBoundary(0.5))
        .unwrap();

    assert_eq!(a.c1.to_bits(), b.c1.to_bits());
    assert_eq!(a.c2.to_bits(), b.c2.to_bits());
    assert_eq!(a.cone_index, b.cone_index);
    assert_eq!(a.decision, b.decision);
}

#[test]
fn different_keys_give_independent_secret_vectors() {
    let host = synthetic_host(64, 64, 22);
    let params = MarkParams::default();
    let geometry = DetectorGeometry::default();

    let a = detect_coefficients_with(
        &host,
        &WatermarkKey::new([1, 1, 1, 1]),
        &params,
        &geometry,
        &mut FixedBoundary(0.5),
    )
    .unwrap();
    let b = detect_coefficients_with(
        &host,
        &WatermarkKey::new([2, 2, 2, 2]),
        &params,
        &geometry,
        &mut FixedBoundary(0.5),
    )
    .unwrap();

    assert_ne!(a.c1.to_bits(), b.c1.to_bits());
    assert_ne!(a.c2.to_bits(), b.c2.to_bits());
}
