//! Endpoint reply parsing and authentication.
//!
//! A reply is CRLF-separated `key=value` lines. Only the first `=` on a
//! line delimits, so values keep any `=` of their own (base64 padding in
//! `h` included). Authentication re-derives the reply signature over a
//! fixed five-field string and cross-checks the echoed request fields.

use std::collections::HashMap;

use crate::error::{Discrepancy, Result, VerifyError};
use crate::mac;
use crate::status::ResponseStatus;

/// A parsed endpoint reply. Unknown keys are kept but never consulted.
#[derive(Debug)]
pub(crate) struct Response {
    fields: HashMap<String, String>,
}

impl Response {
    /// Parse a reply body. Lines without `=` are ignored.
    pub(crate) fn parse(body: &str) -> Self {
        let mut fields = HashMap::new();
        for line in body.split("\r\n") {
            if let Some((key, value)) = line.split_once('=') {
                fields.insert(key.to_string(), value.to_string());
            }
        }
        Self { fields }
    }

    fn field(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| VerifyError::MalformedResponse(format!("missing {name} field")))
    }

    fn status(&self) -> Result<ResponseStatus> {
        let raw = self.field("status")?;
        ResponseStatus::from_wire(raw)
            .ok_or_else(|| VerifyError::MalformedResponse(format!("unknown status {raw:?}")))
    }

    /// Authenticate this reply against the request it answers.
    ///
    /// Check order matters: a non-`OK` status is reported as-is before any
    /// field of the reply is trusted, and an echoed-field mismatch outranks
    /// a signature mismatch. The signed string carries the OTP from the
    /// request, not the echoed one.
    pub(crate) fn authenticate(&self, key: &[u8], otp: &str, nonce: &str) -> Result<()> {
        let status = self.status()?;
        if !status.is_ok() {
            return Err(VerifyError::Status(status));
        }

        let signed = format!(
            "nonce={}&otp={otp}&sl={}&status={}&t={}",
            self.field("nonce")?,
            self.field("sl")?,
            self.field("status")?,
            self.field("t")?,
        );

        if self.field("otp")? != otp {
            return Err(VerifyError::Discrepancy(Discrepancy::Otp));
        }
        if self.field("nonce")? != nonce {
            return Err(VerifyError::Discrepancy(Discrepancy::Nonce));
        }
        if !mac::verify_stripped(key, &signed, self.field("h")?)? {
            return Err(VerifyError::Discrepancy(Discrepancy::Signature));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123";
    const OTP: &str = "ccccccbcgujhingjrdejhgfnuetrgigvejhhgbkugded";
    const NONCE: &str = "jrFwbaYFhn0HoxZIsd9LQ6w2ceU";
    const SL: &str = "100";
    const T: &str = "2026-08-23T14:00:00Z0000";

    /// Build a reply body signed the way a conformant endpoint signs it.
    fn signed_body(status: &str, otp: &str, nonce: &str) -> String {
        let message = format!("nonce={nonce}&otp={otp}&sl={SL}&status={status}&t={T}");
        let h = mac::sign(KEY, &message).unwrap();
        format!("h={h}\r\nt={T}\r\notp={otp}\r\nnonce={nonce}\r\nsl={SL}\r\nstatus={status}\r\n")
    }

    #[test]
    fn parse_splits_on_the_first_equals_only() {
        let reply = Response::parse("h=abc=def=\r\nstatus=OK\r\n");
        assert_eq!(reply.field("h").unwrap(), "abc=def=");
        assert_eq!(reply.field("status").unwrap(), "OK");
    }

    #[test]
    fn parse_ignores_lines_without_equals() {
        let reply = Response::parse("garbage\r\nstatus=OK\r\n\r\n");
        assert_eq!(reply.field("status").unwrap(), "OK");
        assert!(reply.field("garbage").is_err());
    }

    #[test]
    fn well_formed_reply_authenticates() {
        let reply = Response::parse(&signed_body("OK", OTP, NONCE));
        assert!(reply.authenticate(KEY, OTP, NONCE).is_ok());
    }

    #[test]
    fn reply_signature_matches_known_digest() {
        // Anchors the exact field order of the signed string.
        let message = format!("nonce={NONCE}&otp={OTP}&sl={SL}&status=OK&t={T}");
        assert_eq!(mac::sign(KEY, &message).unwrap(), "SLFnj7u3pklx+u+Ghc9/UCcj5Bs=");
    }

    #[test]
    fn stripped_signature_padding_still_authenticates() {
        let body = signed_body("OK", OTP, NONCE).replace("=\r\nt=", "\r\nt=");
        let reply = Response::parse(&body);
        assert!(reply.authenticate(KEY, OTP, NONCE).is_ok());
    }

    #[test]
    fn non_ok_status_is_reported_before_anything_else() {
        // A bare status line, nothing to authenticate with.
        let reply = Response::parse("status=REPLAYED_OTP\r\n");
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::Status(ResponseStatus::ReplayedOtp))
        ));
    }

    #[test]
    fn unknown_status_is_malformed() {
        let reply = Response::parse("status=CRC_FAILURE\r\n");
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_status_is_malformed() {
        let reply = Response::parse(&format!("t={T}\r\nsl={SL}\r\n"));
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_sl_is_malformed_even_when_echoes_disagree() {
        let tampered = signed_body("OK", "cc", NONCE).replace(&format!("sl={SL}\r\n"), "");
        let reply = Response::parse(&tampered);
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn tampered_echoed_otp_is_an_otp_discrepancy() {
        let other = OTP.replace("gujh", "hjug");
        let reply = Response::parse(&signed_body("OK", &other, NONCE));
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::Discrepancy(Discrepancy::Otp))
        ));
    }

    #[test]
    fn tampered_echoed_nonce_is_a_nonce_discrepancy() {
        let reply = Response::parse(&signed_body("OK", OTP, "somebodyelsesnonce"));
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::Discrepancy(Discrepancy::Nonce))
        ));
    }

    #[test]
    fn tampered_signature_is_a_signature_discrepancy() {
        let body = signed_body("OK", OTP, NONCE).replace("h=", "h=x");
        let reply = Response::parse(&body);
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::Discrepancy(Discrepancy::Signature))
        ));
    }

    #[test]
    fn echoed_otp_mismatch_outranks_a_bad_signature() {
        let other = OTP.replace("gujh", "hjug");
        let body = signed_body("OK", &other, NONCE).replace("h=", "h=x");
        let reply = Response::parse(&body);
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::Discrepancy(Discrepancy::Otp))
        ));
    }

    #[test]
    fn lf_separated_lines_are_not_split() {
        let reply = Response::parse("status=OK\notp=x\n");
        // The whole thing parses as one status line with a garbage value.
        assert!(matches!(
            reply.authenticate(KEY, OTP, NONCE),
            Err(VerifyError::MalformedResponse(_))
        ));
    }
}
