// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Payload frame construction and parsing.
//!
//! The frame is the self-contained binary blob handed to the embedding
//! layer. All integers are little-endian:
//!
//! ```text
//! [ 4 bytes] magic signature "imcl"
//! [ 4 bytes] format version (u32 LE)
//! [ 4 bytes] length of everything following this field (u32 LE)
//! [24 bytes] cipher header (XChaCha20 nonce, public)
//! [N bytes ] ciphertext + authentication tag
//! ```
//!
//! The length field always equals `cipher header + ciphertext + tag`, so a
//! reader that has recovered the first 12 bytes knows exactly how many more
//! carrier bits to extract.

use crate::cipher::{CIPHER_HEADER_LEN, CIPHER_OVERHEAD};
use crate::error::CryptoError;

/// Signature prepended to every hidden data stream.
pub const MAGIC: [u8; 4] = *b"imcl";

/// Current frame format version.
pub const FORMAT_VERSION: u32 = 1;

/// Magic + version + length prefix, in bytes.
pub const FRAME_PREFIX_LEN: usize = 12;

/// Total frame bytes added on top of the plaintext:
/// prefix (12) + cipher header (24) + cipher overhead (17) = 53.
pub const FRAME_OVERHEAD: usize = FRAME_PREFIX_LEN + CIPHER_HEADER_LEN + CIPHER_OVERHEAD;

/// Largest plaintext a frame can describe with its u32 length field.
pub const MAX_PLAINTEXT_LEN: usize =
    u32::MAX as usize - CIPHER_HEADER_LEN - CIPHER_OVERHEAD;

/// Assemble a complete frame around an already-sealed ciphertext.
pub(crate) fn build_frame(cipher_header: &[u8; CIPHER_HEADER_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let following = CIPHER_HEADER_LEN + ciphertext.len();
    debug_assert!(following <= u32::MAX as usize, "caller must reject oversized payloads");

    let mut frame = Vec::with_capacity(FRAME_PREFIX_LEN + following);
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    frame.extend_from_slice(&(following as u32).to_le_bytes());
    frame.extend_from_slice(cipher_header);
    frame.extend_from_slice(ciphertext);
    frame
}

/// A parsed frame, borrowing the ciphertext from the input buffer.
#[derive(Debug)]
pub struct ParsedFrame<'a> {
    /// Format version the frame declares (always [`FORMAT_VERSION`] after a
    /// successful parse).
    pub version: u32,
    /// Public cipher header needed to initialize decryption.
    pub cipher_header: [u8; CIPHER_HEADER_LEN],
    /// Ciphertext including the authentication tag.
    pub ciphertext: &'a [u8],
}

/// Parse and validate a frame.
///
/// The input may be longer than the frame itself (extraction typically
/// over-reads the carrier); the real extent comes from the length field.
///
/// # Errors
///
/// - [`CryptoError::TruncatedFrame`] if the input is shorter than the
///   prefix or than the length field claims.
/// - [`CryptoError::BadMagic`] if the signature does not match.
/// - [`CryptoError::UnsupportedVersion`] for an unknown format version.
pub fn parse_frame(data: &[u8]) -> Result<ParsedFrame<'_>, CryptoError> {
    if data.len() < FRAME_PREFIX_LEN {
        return Err(CryptoError::TruncatedFrame);
    }
    if data[..4] != MAGIC {
        return Err(CryptoError::BadMagic);
    }

    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != FORMAT_VERSION {
        return Err(CryptoError::UnsupportedVersion(version));
    }

    let following = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
    // The shortest legal stream is the cipher header plus a sealed empty
    // chunk; anything below that cannot have come from encrypt.
    if following < CIPHER_HEADER_LEN + CIPHER_OVERHEAD {
        return Err(CryptoError::TruncatedFrame);
    }
    if data.len() < FRAME_PREFIX_LEN + following {
        return Err(CryptoError::TruncatedFrame);
    }

    let mut cipher_header = [0u8; CIPHER_HEADER_LEN];
    cipher_header.copy_from_slice(&data[FRAME_PREFIX_LEN..FRAME_PREFIX_LEN + CIPHER_HEADER_LEN]);
    let ciphertext = &data[FRAME_PREFIX_LEN + CIPHER_HEADER_LEN..FRAME_PREFIX_LEN + following];

    Ok(ParsedFrame { version, cipher_header, ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame(ciphertext_len: usize) -> Vec<u8> {
        let header = [0xAB; CIPHER_HEADER_LEN];
        let ciphertext = vec![0x5C; ciphertext_len];
        build_frame(&header, &ciphertext)
    }

    #[test]
    fn build_parse_roundtrip() {
        let header = [7u8; CIPHER_HEADER_LEN];
        let ciphertext: Vec<u8> = (0..40).map(|i| i as u8).collect();
        let frame = build_frame(&header, &ciphertext);

        let parsed = parse_frame(&frame).unwrap();
        assert_eq!(parsed.version, FORMAT_VERSION);
        assert_eq!(parsed.cipher_header, header);
        assert_eq!(parsed.ciphertext, &ciphertext[..]);
    }

    #[test]
    fn length_field_is_exact() {
        let frame = sample_frame(33);
        let following = u32::from_le_bytes([frame[8], frame[9], frame[10], frame[11]]) as usize;
        assert_eq!(following, frame.len() - FRAME_PREFIX_LEN);
        assert_eq!(following, CIPHER_HEADER_LEN + 33);
    }

    #[test]
    fn trailing_garbage_ignored() {
        let mut frame = sample_frame(CIPHER_OVERHEAD + 5);
        let parsed_len = {
            let parsed = parse_frame(&frame).unwrap();
            parsed.ciphertext.len()
        };
        frame.extend_from_slice(&[0xFF; 100]);
        let parsed = parse_frame(&frame).unwrap();
        assert_eq!(parsed.ciphertext.len(), parsed_len);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut frame = sample_frame(CIPHER_OVERHEAD);
        frame[0] ^= 0x01;
        assert_eq!(parse_frame(&frame).unwrap_err(), CryptoError::BadMagic);
    }

    #[test]
    fn unknown_version_rejected() {
        let mut frame = sample_frame(CIPHER_OVERHEAD);
        frame[4] = 0xFE;
        assert!(matches!(
            parse_frame(&frame),
            Err(CryptoError::UnsupportedVersion(0xFE))
        ));
    }

    #[test]
    fn truncated_input_rejected() {
        let frame = sample_frame(CIPHER_OVERHEAD + 10);
        assert_eq!(parse_frame(&[]).unwrap_err(), CryptoError::TruncatedFrame);
        assert_eq!(parse_frame(&frame[..8]).unwrap_err(), CryptoError::TruncatedFrame);
        assert_eq!(
            parse_frame(&frame[..frame.len() - 1]).unwrap_err(),
            CryptoError::TruncatedFrame
        );
    }

    #[test]
    fn implausibly_short_length_field_rejected() {
        // A length field smaller than header + sealed-empty-chunk is bogus
        // even if that many bytes are present.
        let mut frame = sample_frame(CIPHER_OVERHEAD);
        frame[8..12].copy_from_slice(&(CIPHER_HEADER_LEN as u32).to_le_bytes());
        assert_eq!(parse_frame(&frame).unwrap_err(), CryptoError::TruncatedFrame);
    }
}
