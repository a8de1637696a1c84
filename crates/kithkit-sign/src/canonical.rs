// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic canonical JSON.
//!
//! `serde_json::Map` is BTreeMap-backed unless the `preserve_order` feature
//! is enabled (it isn't, anywhere in this workspace), so converting to
//! [`serde_json::Value`] and serializing already yields keys sorted at
//! every depth with no inter-token whitespace. This module exists so every
//! signer calls one named function instead of relying on that fact
//! implicitly.

use serde::Serialize;

/// Produce the canonical JSON byte representation of `value`.
///
/// # Examples
///
/// ```
/// use kithkit_sign::canonical_json_bytes;
/// use serde_json::json;
///
/// let a = json!({"b": 1, "a": 2});
/// let b = json!({"a": 2, "b": 1});
/// assert_eq!(canonical_json_bytes(&a).unwrap(), canonical_json_bytes(&b).unwrap());
/// ```
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `value` cannot be serialized.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    serde_json::to_vec(&v)
}

/// Same as [`canonical_json_bytes`] but returns a `String`.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `value` cannot be serialized.
pub fn canonical_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = canonical_json_bytes(value)?;
    // `serde_json::to_vec` always produces valid UTF-8.
    Ok(String::from_utf8(bytes).expect("serde_json output is UTF-8"))
}
