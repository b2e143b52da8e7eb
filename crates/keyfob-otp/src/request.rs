//! Signed verification requests.

use crate::error::Result;
use crate::mac;

/// Build the signed query string for one verification attempt.
///
/// The signature covers `id=<clientId>&nonce=<nonce>&otp=<otp>` in exactly
/// that order; the endpoint recomputes it over the same fields. The digest
/// rides along as a fourth `h` parameter, base64 padding included.
pub(crate) fn signed_query(client_id: &str, key: &[u8], otp: &str, nonce: &str) -> Result<String> {
    let message = format!("id={client_id}&nonce={nonce}&otp={otp}");
    let signature = mac::sign(key, &message)?;
    Ok(format!("{message}&h={signature}"))
}
