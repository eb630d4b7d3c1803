// Copyright (c) 2026 Arrowmark contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Keyed carrier bit stream.
//!
//! The secret carriers are never materialized: an MT19937 generator seeded
//! from the 128-bit watermark key produces 32-bit words, and each word
//! supplies 32 consecutive antipodal sign bits (LSB first). Bit `k` of the
//! virtual carrier matrix — row-major over (carrier, coefficient) — is bit
//! `k % 32` of word `k / 32`.
//!
//! # Cross-platform determinism
//!
//! Embedder and detector must derive bit-identical carriers from the same
//! key on any platform; the whole scheme rests on this. MT19937 with
//! `init_by_array` seeding is fully specified, and the word→bit expansion
//! here uses only shifts and masks. A stream is exclusively owned by a
//! single projection pass and never reseeded mid-call; replaying the same
//! bits means constructing a fresh stream from the same key.

use rand::RngCore;
use rand_mt::Mt19937GenRand32;

/// A 128-bit watermark key: four unsigned 32-bit words.
///
/// Immutable once constructed. Seeds the carrier stream; two runs with the
/// same key produce bit-identical carrier sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkKey([u32; 4]);

impl WatermarkKey {
    pub const fn new(words: [u32; 4]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> [u32; 4] {
        self.0
    }
}

impl From<[u32; 4]> for WatermarkKey {
    fn from(words: [u32; 4]) -> Self {
        Self(words)
    }
}

/// Source of carrier sign bits consumed by the subspace projector.
///
/// `true` means the carrier entry is `+1/√N_s`, `false` means `−1/√N_s`.
/// Implemented by [`CarrierStream`] in production and by fixed stubs in
/// tests, keeping the keyed randomness injectable.
pub trait CarrierBits {
    fn next_bit(&mut self) -> bool;
}

/// Deterministic pseudorandom word stream seeded by a [`WatermarkKey`].
///
/// Wraps MT19937 seeded via `init_by_array` with the four key words; the
/// output is pinned against the published `init_by_array` test vectors.
pub struct CarrierStream {
    rng: Mt19937GenRand32,
    word: u32,
    bits_left: u8,
}

impl CarrierStream {
    pub fn new(key: &WatermarkKey) -> Self {
        Self {
            rng: Mt19937GenRand32::new_with_key(key.words().iter().copied()),
            word: 0,
            bits_left: 0,
        }
    }

    /// Next raw 32-bit word from the keyed generator.
    ///
    /// Mixing `next_word` and `next_bit` on one stream would desynchronize
    /// the bit cursor; the projector uses exactly one of the two per stream.
    pub fn next_word(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Materialize `n` words up front. Used by the parallel projection path,
    /// which indexes bits absolutely instead of streaming them.
    #[cfg(feature = "parallel")]
    pub fn take_words(&mut self, n: usize) -> Vec<u32> {
        (0..n).map(|_| self.rng.next_u32()).collect()
    }
}

impl CarrierBits for CarrierStream {
    #[inline]
    fn next_bit(&mut self) -> bool {
        if self.bits_left == 0 {
            self.word = self.rng.next_u32();
            self.bits_left = 32;
        }
        let bit = self.word & 1 != 0;
        self.word >>= 1;
        self.bits_left -= 1;
        bit
    }
}
