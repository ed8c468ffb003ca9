// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Error types for the crypto core.
//!
//! [`CryptoError`] covers every failure mode from key derivation through
//! frame parsing and decryption. All failures are terminal for the call
//! that produced them; nothing here retries internally. Callers should
//! treat any error as fatal to the current hide/extract workflow.

use core::fmt;

/// Errors that can occur during key derivation, shuffling, or payload
/// encryption/decryption.
#[derive(Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Memory allocation or password hashing failed.
    OutOfMemory,
    /// The password buffer exceeds the hash function's input limit.
    InvalidPassword,
    /// The plaintext is too large for the frame's 32-bit length field.
    PayloadTooLarge,
    /// The AEAD seal operation failed.
    EncryptionFailed,
    /// Authentication failed: wrong password, tampered ciphertext, or a
    /// corrupted cipher header. No plaintext is exposed.
    DecryptionFailed,
    /// The frame is shorter than its own length field claims.
    TruncatedFrame,
    /// The frame does not start with the expected magic signature.
    BadMagic,
    /// The frame was produced by an unknown format version.
    UnsupportedVersion(u32),
    /// The operation was cancelled through the progress callback.
    Cancelled,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory during password hashing"),
            Self::InvalidPassword => write!(f, "password exceeds the hash input limit"),
            Self::PayloadTooLarge => write!(f, "payload too large for the frame length field"),
            Self::EncryptionFailed => write!(f, "payload encryption failed"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong password or tampered data)"),
            Self::TruncatedFrame => write!(f, "payload frame is truncated"),
            Self::BadMagic => write!(f, "payload frame signature mismatch"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported payload frame version {v}"),
            Self::Cancelled => write!(f, "operation cancelled by user"),
        }
    }
}

impl std::error::Error for CryptoError {}
