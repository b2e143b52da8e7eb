//! Keyed-hash digests for request and reply authentication.
//!
//! The validation protocol signs both directions with HMAC-SHA1 over a
//! canonical string, base64-encoded. Requests carry the digest padded;
//! reply digests are compared with trailing `=` padding stripped from
//! both sides.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::{Result, VerifyError};

type HmacSha1 = Hmac<Sha1>;

/// HMAC-SHA1 `message` with `key` and return the base64 digest, padded.
pub(crate) fn sign(key: &[u8], message: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key)
        .map_err(|e| VerifyError::Credential(format!("unusable HMAC key: {e}")))?;
    mac.update(message.as_bytes());
    Ok(B64.encode(mac.finalize().into_bytes()))
}

/// Check a received reply signature against the digest recomputed for
/// `message`, ignoring trailing `=` padding on either side.
pub(crate) fn verify_stripped(key: &[u8], message: &str, received: &str) -> Result<bool> {
    let expected = sign(key, message)?;
    Ok(constant_time_str_eq(
        expected.trim_end_matches('='),
        received.trim_end_matches('='),
    ))
}

/// Constant-time string equality. Length differences still return early.
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
