// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! The crypto context: secret key plus the deterministic byte-stream PRNG.
//!
//! A [`CryptoContext`] is created once per password/session (see
//! [`CryptoContext::create`]) and owns two secrets: the 32-byte payload key
//! consumed by the `cipher` module, and the seeded ChaCha8 generator that
//! drives the carrier shuffle. The generator output is buffered: reads walk
//! a fixed 1024-byte buffer byte by byte and the buffer is refilled from the
//! ChaCha8 state whenever the cursor reaches the end. The refill is invisible
//! to callers; the byte stream is one continuous sequence regardless of how
//! reads line up with buffer boundaries.
//!
//! # Cross-platform portability
//!
//! The seed is consumed as raw bytes and [`CryptoContext::next_u64`]
//! reassembles its 8 stream bytes little-endian, so a given password yields
//! the same numeric sequence on any host, whatever its native byte order.
//!
//! # Secret hygiene
//!
//! The context is an owned, non-copyable resource. Key and buffered stream
//! bytes live in [`Zeroizing`] storage and the generator state is scrubbed
//! on drop, so secrets do not outlive the session on any exit path.

use core::fmt;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf;

/// Symmetric key length in bytes (XChaCha20-Poly1305 key).
pub const KEY_LEN: usize = 32;

/// PRNG seed length in bytes.
pub(crate) const SEED_LEN: usize = 32;

/// Capacity of the buffered PRNG output, in bytes.
pub(crate) const PRNG_BUFFER_LEN: usize = 1024;

/// Secret per-session state: the payload key and the deterministic PRNG.
///
/// Exclusively owned by one logical session; all PRNG reads take `&mut self`
/// so the compiler enforces the single-reader rule. Not `Clone`: aliasing a
/// secret stream would let two consumers silently replay the same bytes.
pub struct CryptoContext {
    key: Zeroizing<[u8; KEY_LEN]>,
    rng: ChaCha8Rng,
    buffer: Zeroizing<[u8; PRNG_BUFFER_LEN]>,
    pos: usize,
}

impl CryptoContext {
    /// Derive a context from a password.
    ///
    /// Runs the memory-hard Argon2id hash with the fixed embedded salt and
    /// splits the output into the symmetric key and the PRNG seed. The PRNG
    /// buffer is pre-filled before this returns, so the first read is O(1).
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidPassword`] if the password exceeds the hash
    ///   input limit.
    /// - [`CryptoError::OutOfMemory`] if the hash cannot complete.
    pub fn create(password: &[u8]) -> Result<Self, CryptoError> {
        let material = kdf::derive_key_material(password)?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&material[..KEY_LEN]);

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        seed.copy_from_slice(&material[KEY_LEN..]);

        Ok(Self::from_parts(key, *seed))
    }

    /// Assemble a context from an already-derived key and seed.
    /// Pre-fills the output buffer so the first read never hits the refill path.
    pub(crate) fn from_parts(key: Zeroizing<[u8; KEY_LEN]>, seed: [u8; SEED_LEN]) -> Self {
        let mut rng = ChaCha8Rng::from_seed(seed);
        let mut buffer = Zeroizing::new([0u8; PRNG_BUFFER_LEN]);
        rng.fill_bytes(&mut *buffer);
        Self { key, rng, buffer, pos: 0 }
    }

    /// Fill `out` with the next bytes of the deterministic stream.
    ///
    /// Reads proceed byte by byte from the internal buffer; when the cursor
    /// reaches capacity the whole buffer is regenerated and the cursor
    /// resets. Sequence continuity is preserved across refills.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        for byte in out.iter_mut() {
            if self.pos == PRNG_BUFFER_LEN {
                self.rng.fill_bytes(&mut *self.buffer);
                self.pos = 0;
            }
            *byte = self.buffer[self.pos];
            self.pos += 1;
        }
    }

    /// Read 8 stream bytes and assemble them as a little-endian `u64`.
    ///
    /// Endian-fixed so a given seed yields the same numeric sequence on
    /// big-endian and little-endian hosts alike.
    pub fn next_u64(&mut self) -> u64 {
        let mut word = [0u8; 8];
        self.fill_bytes(&mut word);
        u64::from_le_bytes(word)
    }

    /// The symmetric payload key. Crate-internal: only the cipher sees it.
    pub(crate) fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl Drop for CryptoContext {
    fn drop(&mut self) {
        // Key and buffer are Zeroizing and wipe themselves; the generator
        // state is scrubbed by overwriting it with a zero-seeded instance.
        self.rng = ChaCha8Rng::from_seed([0u8; SEED_LEN]);
        self.pos = 0;
    }
}

// Never print key bytes or buffered stream bytes.
impl fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoContext")
            .field("key", &"[REDACTED]")
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context(seed_byte: u8) -> CryptoContext {
        CryptoContext::from_parts(Zeroizing::new([0u8; KEY_LEN]), [seed_byte; SEED_LEN])
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = test_context(7);
        let mut b = test_context(7);
        let mut out_a = [0u8; 256];
        let mut out_b = [0u8; 256];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn different_seed_different_stream() {
        let mut a = test_context(1);
        let mut b = test_context(2);
        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn stream_continuous_across_refill() {
        // One big read vs. many odd-sized reads spanning several refills
        // must produce the identical byte sequence.
        let mut a = test_context(42);
        let mut b = test_context(42);

        let total = PRNG_BUFFER_LEN * 3 + 17;
        let mut one_shot = vec![0u8; total];
        a.fill_bytes(&mut one_shot);

        let mut chunked = Vec::with_capacity(total);
        let mut remaining = total;
        let mut step = 1;
        while remaining > 0 {
            let n = step.min(remaining);
            let mut piece = vec![0u8; n];
            b.fill_bytes(&mut piece);
            chunked.extend_from_slice(&piece);
            remaining -= n;
            step = step % 13 + 1; // uneven chunk sizes: 1..=13
        }

        assert_eq!(one_shot, chunked);
    }

    #[test]
    fn next_u64_is_little_endian_over_the_stream() {
        let mut a = test_context(9);
        let mut b = test_context(9);

        let word = a.next_u64();
        let mut raw = [0u8; 8];
        b.fill_bytes(&mut raw);
        assert_eq!(word, u64::from_le_bytes(raw));
    }

    #[test]
    fn u64_sequence_deterministic() {
        let mut a = test_context(3);
        let mut b = test_context(3);
        let seq_a: Vec<u64> = (0..200).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..200).map(|_| b.next_u64()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn debug_redacts_key() {
        let ctx = test_context(0);
        let printed = format!("{ctx:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("key: ["));
    }
}
