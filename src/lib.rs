// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! # veil-core
//!
//! Cryptographic core for hiding encrypted payloads in carrier media. The
//! carrier codecs and the bit-embedding algorithm live in sibling crates;
//! this crate owns everything keyed by the user's password:
//!
//! - **Key derivation** (`kdf`): one Argon2id pass turns the password into
//!   a payload key and a PRNG seed, both deterministic so the extracting
//!   side can reproduce them from the password alone.
//! - **Deterministic PRNG** (`context`): a buffered ChaCha8 byte stream,
//!   identical on every platform for a given password.
//! - **Carrier shuffling** (`shuffle`): a Fisher-Yates permutation driven
//!   by that stream, used to scatter payload bits across the carrier in an
//!   order only the password holder can reconstruct.
//! - **Payload framing** (`cipher`, `frame`): XChaCha20-Poly1305 sealing of
//!   the whole payload as a single final chunk, wrapped in a
//!   self-describing binary frame with magic, version, and length.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use veil_core::{CryptoContext, cipher, shuffle};
//!
//! let mut ctx = CryptoContext::create(b"passphrase")?;
//!
//! // Scatter order for the embedding layer:
//! let mut positions: Vec<u32> = (0..carrier_capacity).collect();
//! shuffle::shuffle(&mut ctx, &mut positions);
//!
//! // Sealed, self-describing payload blob:
//! let frame = cipher::encrypt(&ctx, b"secret message")?;
//! let recovered = cipher::decrypt_frame(&ctx, &frame)?;
//! ```
//!
//! A [`CryptoContext`] is single-session and single-threaded: PRNG reads
//! take `&mut self`, the type is not `Clone`, and all secret state is
//! zeroized when it drops.

#![forbid(unsafe_code)]

pub mod cipher;
pub mod context;
pub mod error;
pub mod frame;
mod kdf;
pub mod shuffle;

pub use cipher::{decrypt, decrypt_frame, encrypt, CIPHER_HEADER_LEN, CIPHER_OVERHEAD};
pub use context::{CryptoContext, KEY_LEN};
pub use error::CryptoError;
pub use frame::{
    parse_frame, ParsedFrame, FORMAT_VERSION, FRAME_OVERHEAD, FRAME_PREFIX_LEN, MAGIC,
    MAX_PLAINTEXT_LEN,
};
pub use shuffle::{shuffle, shuffle_with_progress, PROGRESS_INTERVAL};
