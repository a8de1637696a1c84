// SPDX-License-Identifier: MIT OR Apache-2.0
//! Key encoding: PKCS8 DER + base64 for private keys, SPKI DER + base64
//! for public keys.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};

/// Errors encoding or decoding Ed25519 key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The base64 wrapper around the DER payload was malformed.
    #[error("invalid base64 key encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The DER payload itself (PKCS8 or SPKI) was malformed.
    #[error("invalid key encoding: {0}")]
    Der(String),
}

/// Generate a fresh Ed25519 keypair using the OS CSPRNG.
#[must_use]
pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut rand::rngs::OsRng)
}

/// Encode a private key as base64(PKCS8 DER).
///
/// # Errors
///
/// Returns [`KeyError::Der`] if PKCS8 encoding fails (should not happen for
/// a valid [`SigningKey`]).
pub fn encode_private_key(key: &SigningKey) -> Result<String, KeyError> {
    let der = key.to_pkcs8_der().map_err(|e| KeyError::Der(e.to_string()))?;
    Ok(STANDARD.encode(der.as_bytes()))
}

/// Decode a private key from base64(PKCS8 DER).
///
/// # Errors
///
/// Returns [`KeyError::Base64`] if the base64 wrapper is malformed, or
/// [`KeyError::Der`] if the DER payload is not a valid Ed25519 PKCS8 key.
pub fn decode_private_key(encoded: &str) -> Result<SigningKey, KeyError> {
    let der = STANDARD.decode(encoded.trim())?;
    SigningKey::from_pkcs8_der(&der).map_err(|e| KeyError::Der(e.to_string()))
}

/// Encode a public key as base64(SPKI DER).
///
/// # Errors
///
/// Returns [`KeyError::Der`] if SPKI encoding fails.
pub fn encode_public_key(key: &VerifyingKey) -> Result<String, KeyError> {
    let der = key.to_public_key_der().map_err(|e| KeyError::Der(e.to_string()))?;
    Ok(STANDARD.encode(der.as_bytes()))
}

/// Decode a public key from base64(SPKI DER).
///
/// # Errors
///
/// Returns [`KeyError::Base64`] if the base64 wrapper is malformed, or
/// [`KeyError::Der`] if the DER payload is not a valid Ed25519 SPKI key.
pub fn decode_public_key(encoded: &str) -> Result<VerifyingKey, KeyError> {
    let der = STANDARD.decode(encoded.trim())?;
    VerifyingKey::from_public_key_der(&der).map_err(|e| KeyError::Der(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_round_trips_through_encoding() {
        let sk = generate_keypair();
        let vk = sk.verifying_key();

        let sk_enc = encode_private_key(&sk).unwrap();
        let vk_enc = encode_public_key(&vk).unwrap();

        let sk2 = decode_private_key(&sk_enc).unwrap();
        let vk2 = decode_public_key(&vk_enc).unwrap();

        assert_eq!(sk2.to_bytes(), sk.to_bytes());
        assert_eq!(vk2.to_bytes(), vk.to_bytes());
    }

    #[test]
    fn rejects_garbage_base64() {
        assert!(decode_private_key("not valid base64!!").is_err());
        assert!(decode_public_key("not valid base64!!").is_err());
    }

    #[test]
    fn rejects_valid_base64_bad_der() {
        let encoded = STANDARD.encode(b"not a der payload at all, just bytes");
        assert!(decode_private_key(&encoded).is_err());
        assert!(decode_public_key(&encoded).is_err());
    }
}
