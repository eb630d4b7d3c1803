// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Owned row-major `f64` matrix used throughout the watermarking core.
//!
//! A length-checked, owned container. No linear algebra lives here — the
//! core only needs indexed access, zero-fill construction and a PSNR helper.

/// A dense 2-D grid of `f64` values in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a `rows × cols` matrix filled with zeros.
    pub fn new_zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from a row-major data vector.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`. Callers construct matrices from
    /// geometry they already validated; a mismatch here is a programming
    /// error, not a runtime condition.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "matrix data length {} does not match {rows}x{cols}",
            data.len()
        );
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Row-major view of the underlying data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Peak signal-to-noise ratio in dB between two equally-sized matrices,
/// against a 255 peak (8-bit grayscale convention).
///
/// Returns `f64::INFINITY` for identical matrices.
///
/// # Panics
/// Panics if the matrices differ in shape.
pub fn psnr(a: &Matrix, b: &Matrix) -> f64 {
    assert_eq!(a.rows, b.rows, "psnr: row count mismatch");
    assert_eq!(a.cols, b.cols, "psnr: column count mismatch");
    let mse: f64 = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        / a.data.len() as f64;
    10.0 * (255.0 * 255.0 / mse).log10()
}
