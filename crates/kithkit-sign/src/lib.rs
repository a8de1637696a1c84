// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Deterministic, sorted-key JSON serialization.
pub mod canonical;
/// PKCS8/SPKI DER + base64 key encoding.
pub mod keys;
/// Raw-bytes, file, and object signing/verification.
pub mod sign;

pub use canonical::{canonical_json_bytes, canonical_json_string};
pub use keys::{decode_private_key, decode_public_key, encode_private_key, encode_public_key, generate_keypair, KeyError};
pub use sign::{hex, sha256_bytes, sign_bytes, sign_file, sign_object, verify_bytes, verify_file, verify_object, Signed};

pub use ed25519_dalek::{SigningKey, VerifyingKey};
