// SPDX-License-Identifier: MIT OR Apache-2.0
//! The minimal Ed25519 signing surface: raw bytes, files (via SHA-256
//! digest), and signed objects (via canonical JSON).

use crate::canonical::canonical_json_bytes;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Sign raw bytes, returning a base64-encoded 64-byte raw Ed25519
/// signature.
#[must_use]
pub fn sign_bytes(data: &[u8], private_key: &SigningKey) -> String {
    let sig: Signature = private_key.sign(data);
    STANDARD.encode(sig.to_bytes())
}

/// Verify raw bytes against a base64-encoded signature.
///
/// Never panics: a malformed base64 payload or a 64-byte-but-invalid
/// signature both simply return `false` rather than raising an exception.
#[must_use]
pub fn verify_bytes(data: &[u8], signature_b64: &str, public_key: &VerifyingKey) -> bool {
    let Ok(raw) = STANDARD.decode(signature_b64.trim()) else { return false };
    let Ok(bytes) = <[u8; 64]>::try_from(raw.as_slice()) else { return false };
    let sig = Signature::from_bytes(&bytes);
    public_key.verify(data, &sig).is_ok()
}

/// SHA-256 a file and sign the 32-byte digest.
///
/// # Errors
///
/// Returns [`std::io::Error`] if the file cannot be read.
pub fn sign_file(path: &Path, private_key: &SigningKey) -> std::io::Result<String> {
    let digest = sha256_file(path)?;
    Ok(sign_bytes(&digest, private_key))
}

/// Symmetric check to [`sign_file`]: recompute the SHA-256 digest and
/// verify the signature over it.
///
/// Returns `false` (not an error) if the file cannot be read or the
/// signature does not verify.
#[must_use]
pub fn verify_file(path: &Path, signature_b64: &str, public_key: &VerifyingKey) -> bool {
    let Ok(digest) = sha256_file(path) else { return false };
    verify_bytes(&digest, signature_b64, public_key)
}

/// SHA-256 a byte slice, returning the raw 32-byte digest.
#[must_use]
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hex-encode a SHA-256 digest (or any 32-byte value) the way
/// [`SkillVersion::sha256`](kithkit_core::SkillVersion) expects it.
#[must_use]
pub fn hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn sha256_file(path: &Path) -> std::io::Result<[u8; 32]> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_bytes(&bytes))
}

/// A body paired with the signature produced over its canonical JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Signed<T> {
    /// The signed payload.
    pub body: T,
    /// Base64 Ed25519 signature over `canonical_json(body)`.
    pub signature: String,
}

/// Canonicalize `body` to JSON and sign the resulting bytes.
///
/// This is the primitive `SignedCatalogIndex` and `SignedRevocationList`
/// are built from: canonicalize the body-minus-signature, sign, then
/// attach the signature.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `body` cannot be serialized.
pub fn sign_object<T: Serialize>(body: T, private_key: &SigningKey) -> Result<Signed<T>, serde_json::Error> {
    let bytes = canonical_json_bytes(&body)?;
    let signature = sign_bytes(&bytes, private_key);
    Ok(Signed { body, signature })
}

/// Verify a `{body, signature}` pair given a serializable view of `body`.
///
/// Callers typically pass a `serde_json::Value` with the `signature` field
/// already stripped (see `kithkit-catalog::verify_index`), since the body
/// that was originally signed never contained its own signature field.
#[must_use]
pub fn verify_object<T: Serialize>(body: &T, signature_b64: &str, public_key: &VerifyingKey) -> bool {
    match canonical_json_bytes(body) {
        Ok(bytes) => verify_bytes(&bytes, signature_b64, public_key),
        Err(_) => false,
    }
}
