// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Password-based key and seed derivation.
//!
//! A single Argon2id pass over the password produces 64 bytes: the first 32
//! become the XChaCha20-Poly1305 payload key, the last 32 seed the carrier
//! shuffle PRNG. The salt is a fixed embedded constant, intentionally: the
//! extracting side must reproduce both the key and the shuffle order from
//! the password alone, before anything has been read out of the carrier.
//! Defense rests on password entropy plus the Argon2id cost parameters.
//!
//! Derivation is deterministic: the same password always yields the same key
//! and seed, on every platform.

use std::time::Instant;

use argon2::{Algorithm, Argon2, Params, Version};
use tracing::debug;
use zeroize::Zeroizing;

use crate::context::{KEY_LEN, SEED_LEN};
use crate::error::CryptoError;

/// Fixed salt for key/seed derivation. Not secret; shared by all
/// installations so hide and extract agree without a salt exchange.
const KDF_SALT: &[u8; 16] = b"veil-payload-v1\0";

/// Argon2id passes over the memory block.
const OPS_LIMIT: u32 = 3;

/// Argon2id memory cost in KiB (4000 KiB ≈ 4 MB).
const MEM_LIMIT_KIB: u32 = 4000;

/// Derived material: key bytes followed by seed bytes.
const HASH_LEN: usize = KEY_LEN + SEED_LEN;

/// Hash the password into `key || seed` material.
///
/// The output is wrapped in [`Zeroizing`] so the caller's split copies are
/// the only surviving copies once this buffer drops.
pub(crate) fn derive_key_material(password: &[u8]) -> Result<Zeroizing<[u8; HASH_LEN]>, CryptoError> {
    let params = Params::new(MEM_LIMIT_KIB, OPS_LIMIT, 1, Some(HASH_LEN))
        .map_err(|_| CryptoError::OutOfMemory)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let start = Instant::now();
    let mut output = Zeroizing::new([0u8; HASH_LEN]);
    argon2
        .hash_password_into(password, KDF_SALT, &mut *output)
        .map_err(map_hash_error)?;
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "derived key material");

    Ok(output)
}

/// An over-long password is the caller's fault; everything else that Argon2
/// can report here is a resource failure.
fn map_hash_error(err: argon2::Error) -> CryptoError {
    match err {
        argon2::Error::PwdTooLong => CryptoError::InvalidPassword,
        _ => CryptoError::OutOfMemory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_deterministic() {
        let a = derive_key_material(b"correct horse battery staple").unwrap();
        let b = derive_key_material(b"correct horse battery staple").unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_passwords_differ() {
        let a = derive_key_material(b"password one").unwrap();
        let b = derive_key_material(b"password two").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn empty_password_accepted() {
        // An empty password is weak but structurally valid.
        let material = derive_key_material(b"").unwrap();
        assert_eq!(material.len(), HASH_LEN);
    }

    #[test]
    fn key_and_seed_halves_differ() {
        // Sanity: the two halves of the hash output are independent values.
        let material = derive_key_material(b"some password").unwrap();
        assert_ne!(material[..KEY_LEN], material[KEY_LEN..]);
    }
}
