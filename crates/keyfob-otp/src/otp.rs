//! Pre-network OTP syntax screening.
//!
//! An OTP is `public identifier ++ 32-character ciphertext`. Screening
//! rejects obviously unusable candidates before any endpoint is contacted.

use crate::error::{Result, VerifyError};
use crate::status::ResponseStatus;

/// Shortest accepted OTP (bare 32-character ciphertext, empty identifier).
pub const MIN_OTP_LEN: usize = 32;
/// Longest accepted OTP (16-character identifier plus ciphertext).
pub const MAX_OTP_LEN: usize = 48;

/// Outcome of syntax screening for a candidate that is not malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    /// The candidate may be submitted to the validation service.
    Permitted,
    /// The prefix family is not accepted under the current policy; the
    /// verification answers `false` without touching the network.
    Refused,
}

/// Screen a candidate OTP before any request is built.
///
/// Length outside `[MIN_OTP_LEN, MAX_OTP_LEN]` is a `BAD_OTP` protocol
/// failure. A surviving candidate is then filtered by prefix family:
/// `cc` is always permitted, `vv` only when `factory_only` is off, and
/// everything else is refused.
pub(crate) fn screen(otp: &str, factory_only: bool) -> Result<Screen> {
    if otp.len() < MIN_OTP_LEN || otp.len() > MAX_OTP_LEN {
        return Err(VerifyError::Status(ResponseStatus::BadOtp));
    }
    let screen = match &otp.as_bytes()[..2] {
        b"cc" => Screen::Permitted,
        b"vv" if factory_only => Screen::Refused,
        b"vv" => Screen::Permitted,
        _ => Screen::Refused,
    };
    Ok(screen)
}

/// Device public identifier: everything before the 32-character ciphertext.
///
/// Empty for a minimum-length OTP.
pub fn public_id(otp: &str) -> &str {
    let split = otp.len().saturating_sub(32);
    otp.get(..split).unwrap_or("")
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn otp_of_len(prefix: &str, len: usize) -> String {
        let mut s = String::from(prefix);
        s.push_str(&"c".repeat(len - prefix.len()));
        s
    }

    #[test]
    fn too_short_is_bad_otp() {
        let result = screen(&otp_of_len("cc", 31), false);
        assert!(matches!(
            result,
            Err(VerifyError::Status(ResponseStatus::BadOtp))
        ));
    }

    #[test]
    fn too_long_is_bad_otp() {
        let result = screen(&otp_of_len("cc", 49), false);
        assert!(matches!(
            result,
            Err(VerifyError::Status(ResponseStatus::BadOtp))
        ));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert_eq!(screen(&otp_of_len("cc", 32), false).unwrap(), Screen::Permitted);
        assert_eq!(screen(&otp_of_len("cc", 48), false).unwrap(), Screen::Permitted);
    }

    #[test]
    fn cc_prefix_is_always_permitted() {
        assert_eq!(screen(&otp_of_len("cc", 44), true).unwrap(), Screen::Permitted);
        assert_eq!(screen(&otp_of_len("cc", 44), false).unwrap(), Screen::Permitted);
    }

    #[test]
    fn vv_prefix_depends_on_factory_policy() {
        assert_eq!(screen(&otp_of_len("vv", 44), false).unwrap(), Screen::Permitted);
        assert_eq!(screen(&otp_of_len("vv", 44), true).unwrap(), Screen::Refused);
    }

    #[test]
    fn other_prefixes_are_refused() {
        assert_eq!(screen(&otp_of_len("dd", 44), false).unwrap(), Screen::Refused);
        assert_eq!(screen(&otp_of_len("cv", 44), false).unwrap(), Screen::Refused);
    }

    #[test]
    fn public_id_strips_the_ciphertext() {
        let otp = format!("ccccccbcgujh{}", "d".repeat(32));
        assert_eq!(public_id(&otp), "ccccccbcgujh");
    }

    #[test]
    fn public_id_of_minimum_otp_is_empty() {
        assert_eq!(public_id(&"c".repeat(32)), "");
    }
}
