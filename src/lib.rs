// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! # arrowmark
//!
//! Blind still-image watermarking core in the zero-bit, secret-subspace
//! style: the host's wavelet coefficients are projected onto key-derived
//! antipodal carriers, an orthonormal 2-D analysis plane (the MCB plane) is
//! built over the best-matching carrier cone, and a geometrically and
//! statistically tuned cone decides watermark presence. The cone's external
//! boundary is re-randomized per query and its internal boundary carries a
//! sawtooth notch, defeating sensitivity attacks that probe the detector to
//! map its decision boundary.
//!
//! The wavelet transform itself is an external collaborator injected through
//! [`WaveletTransform`]; image codecs and the host application's scripting
//! layer are out of scope.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use arrowmark::{embed_image, detect_image, MarkParams, NoTransform, WatermarkKey};
//!
//! let key = WatermarkKey::new([0xA5A5_0001, 0x5A5A_0002, 0x0F0F_0003, 0xF0F0_0004]);
//! let params = MarkParams::default();
//! let marked = embed_image(&image, &key, &params, &NoTransform)?;
//! let result = detect_image(&marked, &key, &params, &NoTransform)?;
//! assert!(result.detected);
//! ```

pub mod mark;
pub mod matrix;
pub mod wavelet;

pub use mark::{
    detect_coefficients, detect_coefficients_with, detect_image, embed_coefficients, embed_image,
    BoundaryDraw, CarrierBits, CarrierStream, Decision, Detection, DetectorGeometry, MarkError,
    MarkParams, ThreadBoundary, WatermarkKey,
};
pub use matrix::{psnr, Matrix};
pub use wavelet::{NoTransform, SubbandLayout, WaveletTransform};
