// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Secret-subspace projection and its adjoint.
//!
//! `project` correlates the host sequence against `N_v` virtual antipodal
//! carriers (entries `±1/√N_s`), consuming one carrier bit per
//! (carrier, coefficient) pair in row-major order. For large `N_s` the
//! carriers are approximately orthogonal, so the secret vector behaves like
//! an orthogonal random projection of the host.
//!
//! `back_project` replays the identical bit sequence to redistribute a
//! subspace vector's energy over the host coefficients, either scaled
//! per-coefficient by the host's local magnitude (proportional embedding,
//! perceptually adapted) or by a constant factor.
//!
//! The bit-consumption order is semantically load-bearing: it decides which
//! host coefficient pairs with which carrier bit. The parallel variants
//! therefore materialize the word buffer up front and index bits absolutely
//! instead of streaming them.

use crate::mark::carrier::CarrierBits;
use crate::mark::error::MarkError;

#[cfg(feature = "parallel")]
use crate::mark::carrier::CarrierStream;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Back-projection scaling mode.
pub enum Scaling<'a> {
    /// Scale each coefficient by the local host magnitude `|host_j|/√N_s`.
    /// The slice is the host sequence itself; absolute values are taken here.
    Proportional(&'a [f64]),
    /// Scale every coefficient by `1/√N_s`.
    Constant,
}

/// Project the host sequence onto `n_v` keyed carriers.
///
/// `v[i] = (Σ_j ±host[j]) / √N_s`, with the sign of term `(i, j)` taken from
/// carrier bit `i·N_s + j`.
pub fn project(
    host: &[f64],
    n_v: usize,
    bits: &mut impl CarrierBits,
) -> Result<Vec<f64>, MarkError> {
    if host.is_empty() {
        return Err(MarkError::EmptyHost);
    }
    if n_v == 0 {
        return Err(MarkError::EmptySubspace);
    }

    let scale = 1.0 / (host.len() as f64).sqrt();
    let mut secret = Vec::with_capacity(n_v);
    for _ in 0..n_v {
        let mut acc = 0.0;
        for &x in host {
            if bits.next_bit() {
                acc += x;
            } else {
                acc -= x;
            }
        }
        secret.push(acc * scale);
    }
    Ok(secret)
}

/// Adjoint of [`project`]: map a subspace vector back into coefficient space.
///
/// Replays the same `n_v · n_s` carrier bits in the same order, accumulating
/// `Σ_i ±subspace[i]` per coefficient, then applies the scaling mode.
pub fn back_project(
    subspace: &[f64],
    n_s: usize,
    bits: &mut impl CarrierBits,
    scaling: Scaling<'_>,
) -> Result<Vec<f64>, MarkError> {
    if n_s == 0 {
        return Err(MarkError::EmptyHost);
    }
    if subspace.is_empty() {
        return Err(MarkError::EmptySubspace);
    }
    if let Scaling::Proportional(host) = &scaling {
        if host.len() != n_s {
            return Err(MarkError::SequenceLengthMismatch {
                expected: n_s,
                actual: host.len(),
            });
        }
    }

    let mut acc = vec![0.0; n_s];
    for &v in subspace {
        for slot in acc.iter_mut() {
            if bits.next_bit() {
                *slot += v;
            } else {
                *slot -= v;
            }
        }
    }

    let scale = 1.0 / (n_s as f64).sqrt();
    match scaling {
        Scaling::Proportional(host) => {
            for (slot, &x) in acc.iter_mut().zip(host) {
                *slot *= x.abs() * scale;
            }
        }
        Scaling::Constant => {
            for slot in acc.iter_mut() {
                *slot *= scale;
            }
        }
    }
    Ok(acc)
}

/// Number of 32-bit words covering `n_v · n_s` carrier bits.
#[cfg(feature = "parallel")]
fn word_count(n_v: usize, n_s: usize) -> usize {
    (n_v * n_s + 31) / 32
}

#[cfg(feature = "parallel")]
#[inline]
fn bit_at(words: &[u32], k: usize) -> bool {
    words[k >> 5] >> (k & 31) & 1 != 0
}

/// Parallel [`project`]: materializes the word buffer, then computes carrier
/// rows independently. Bit pairing is identical to the serial path.
#[cfg(feature = "parallel")]
pub fn project_par(
    host: &[f64],
    n_v: usize,
    stream: &mut CarrierStream,
) -> Result<Vec<f64>, MarkError> {
    if host.is_empty() {
        return Err(MarkError::EmptyHost);
    }
    if n_v == 0 {
        return Err(MarkError::EmptySubspace);
    }

    let n_s = host.len();
    let words = stream.take_words(word_count(n_v, n_s));
    let scale = 1.0 / (n_s as f64).sqrt();

    let secret = (0..n_v)
        .into_par_iter()
        .map(|i| {
            let base = i * n_s;
            let mut acc = 0.0;
            for (j, &x) in host.iter().enumerate() {
                if bit_at(&words, base + j) {
                    acc += x;
                } else {
                    acc -= x;
                }
            }
            acc * scale
        })
        .collect();
    Ok(secret)
}

/// Parallel [`back_project`] over the same materialized word buffer.
#[cfg(feature = "parallel")]
pub fn back_project_par(
    subspace: &[f64],
    n_s: usize,
    stream: &mut CarrierStream,
    scaling: Scaling<'_>,
) -> Result<Vec<f64>, MarkError> {
    if n_s == 0 {
        return Err(MarkError::EmptyHost);
    }
    if subspace.is_empty() {
        return Err(MarkError::EmptySubspace);
    }
    if let Scaling::Proportional(host) = &scaling {
        if host.len() != n_s {
            return Err(MarkError::SequenceLengthMismatch {
                expected: n_s,
                actual: host.len(),
            });
        }
    }

    let words = stream.take_words(word_count(subspace.len(), n_s));
    let scale = 1.0 / (n_s as f64).sqrt();

    let out: Vec<f64> = (0..n_s)
        .into_par_iter()
        .map(|j| {
            let mut acc = 0.0;
            for (i, &v) in subspace.iter().enumerate() {
                if bit_at(&words, i * n_s + j) {
                    acc += v;
                } else {
                    acc -= v;
                }
            }
            match &scaling {
                Scaling::Proportional(host) => acc * host[j].abs() * scale,
                Scaling::Constant => acc * scale,
            }
        })
        .collect();
    Ok(out)
}
