// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Authenticated payload encryption.
//!
//! Single-chunk XChaCha20-Poly1305 stream: encryption generates a fresh
//! 24-byte cipher header (the nonce, public but required for decryption),
//! prepends the FINAL tag marker to the plaintext, and seals the result
//! under the context key. Only one chunk is ever produced (the whole
//! payload is the final chunk), so the cipher overhead is a constant
//! 17 bytes: tag marker plus Poly1305 tag.
//!
//! Decryption fails closed: an authentication failure or an unexpected tag
//! marker yields [`CryptoError::DecryptionFailed`] and never exposes
//! partially recovered plaintext; the working buffer is zeroized first.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::context::CryptoContext;
use crate::error::CryptoError;
use crate::frame::{self, MAX_PLAINTEXT_LEN};

/// Cipher header length in bytes (XChaCha20 nonce).
pub const CIPHER_HEADER_LEN: usize = 24;

/// Bytes the cipher adds to the plaintext: tag marker + Poly1305 tag.
pub const CIPHER_OVERHEAD: usize = 1 + 16;

/// Marker sealed with the chunk: this is the last (and only) chunk of the
/// stream. Any other recovered marker means a malformed or forged stream.
const TAG_FINAL: u8 = 0x03;

/// Encrypt a payload into a complete self-describing frame.
///
/// The returned buffer is `plaintext.len() + FRAME_OVERHEAD` bytes; see the
/// `frame` module for the layout.
///
/// # Errors
///
/// - [`CryptoError::PayloadTooLarge`] if the plaintext cannot be described
///   by the frame's 32-bit length field.
/// - [`CryptoError::EncryptionFailed`] if the AEAD seal fails.
pub fn encrypt(ctx: &CryptoContext, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if plaintext.len() > MAX_PLAINTEXT_LEN {
        return Err(CryptoError::PayloadTooLarge);
    }

    let mut cipher_header = [0u8; CIPHER_HEADER_LEN];
    rand::thread_rng().fill_bytes(&mut cipher_header);

    // Chunk = tag marker || plaintext, sealed as one unit.
    let mut chunk = Zeroizing::new(Vec::with_capacity(1 + plaintext.len()));
    chunk.push(TAG_FINAL);
    chunk.extend_from_slice(plaintext);

    let cipher = XChaCha20Poly1305::new(ctx.key().into());
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&cipher_header), chunk.as_slice())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    debug!(plaintext_len = plaintext.len(), "sealed payload frame");
    Ok(frame::build_frame(&cipher_header, &ciphertext))
}

/// Decrypt and authenticate a single sealed chunk.
///
/// `cipher_header` and `ciphertext` are the fields recovered from a frame
/// (see [`crate::frame::parse_frame`]); [`decrypt_frame`] combines the two
/// steps.
///
/// # Errors
///
/// [`CryptoError::DecryptionFailed`] on wrong password, tampered
/// ciphertext, corrupted header, or an unexpected tag marker. In every
/// failure case any recovered bytes are zeroized before returning.
pub fn decrypt(
    ctx: &CryptoContext,
    cipher_header: &[u8; CIPHER_HEADER_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(ctx.key().into());
    let mut chunk = cipher
        .decrypt(XNonce::from_slice(cipher_header), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    // encrypt always seals at least the tag marker; an authenticated empty
    // chunk can only be a stream this version never produced.
    if chunk.first() != Some(&TAG_FINAL) {
        chunk.zeroize();
        return Err(CryptoError::DecryptionFailed);
    }
    chunk.remove(0);

    debug!(plaintext_len = chunk.len(), "opened payload frame");
    Ok(chunk)
}

/// Parse a frame and decrypt its payload in one step.
pub fn decrypt_frame(ctx: &CryptoContext, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let parsed = frame::parse_frame(data)?;
    decrypt(ctx, &parsed.cipher_header, parsed.ciphertext)
}
