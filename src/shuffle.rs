// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Deterministic carrier-order shuffling.
//!
//! Fisher-Yates over an arbitrary slice, driven by the context's seeded
//! PRNG: the same password always produces the same permutation, which is
//! how the extracting side walks the carrier in the same pseudo-random
//! order as the hiding side.
//!
//! The random index is taken as `next_u64() % i`, which carries a small
//! modulo bias toward lower indices and, by excluding the current index,
//! always yields a cyclic permutation (no element stays in place). Both are
//! acceptable for scrambling the carrier read/write order; this is not a
//! claim of cryptographic uniformity.

use crate::context::CryptoContext;
use crate::error::CryptoError;

/// Progress callback cadence: one report every this many iterations.
/// A power of two so the modulo reduces to a mask in the hot loop.
pub const PROGRESS_INTERVAL: usize = 4096;

/// Shuffle `items` in place using the context's deterministic stream.
///
/// Slices of length 0 or 1 are left untouched. The loop body is
/// allocation-free; shuffling multi-million-entry carrier index arrays is
/// the dominant CPU cost of a hide/extract run.
pub fn shuffle<T>(ctx: &mut CryptoContext, items: &mut [T]) {
    // Cannot fail: the no-op callback never requests cancellation.
    let _ = shuffle_with_progress(ctx, items, |_| true);
}

/// Shuffle `items` in place, reporting progress periodically.
///
/// `progress` is invoked every [`PROGRESS_INTERVAL`] iterations with the
/// completion fraction in `0.0..=1.0` (monotonically increasing), and once
/// more with `1.0` when the shuffle finishes. Returning `false` from the
/// callback aborts the shuffle with [`CryptoError::Cancelled`]; the slice is
/// then left partially permuted.
///
/// Progress reporting is interactive feedback only; it has no effect on the
/// resulting permutation.
pub fn shuffle_with_progress<T>(
    ctx: &mut CryptoContext,
    items: &mut [T],
    mut progress: impl FnMut(f64) -> bool,
) -> Result<(), CryptoError> {
    let n = items.len();
    if n <= 1 {
        return Ok(());
    }

    for i in (1..n).rev() {
        // A pseudo-random index strictly below the current one.
        let j = (ctx.next_u64() % i as u64) as usize;
        items.swap(i, j);

        if i % PROGRESS_INTERVAL == 0 && !progress((n - i) as f64 / n as f64) {
            return Err(CryptoError::Cancelled);
        }
    }

    progress(1.0);
    Ok(())
}
