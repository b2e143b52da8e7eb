//! Remote OTP verification client.
//!
//! Verifies one-time passwords against a multi-endpoint cloud validation
//! service. Every call signs a fresh request, races all endpoints for the
//! first answer, authenticates the reply, and optionally filters on a
//! device allow-list.
//!
//! ## Protocol
//!
//! - **Request**: HTTPS GET with `id`, `nonce`, `otp` and an HMAC-SHA1
//!   signature `h` over them
//! - **Race**: all endpoints queried concurrently, first 2xx wins,
//!   the rest are cancelled, one deadline for the whole call
//! - **Reply**: CRLF `key=value` lines, authenticated by recomputing the
//!   reply signature and cross-checking the echoed `otp` and `nonce`

pub mod client;
pub mod error;
pub mod status;

mod dispatch;
mod mac;
mod nonce;
mod otp;
mod request;
mod response;

pub use client::{ApiCredential, DEFAULT_TIMEOUT, OtpVerifier, VerifierConfig, default_endpoints};
pub use error::{Discrepancy, Result, VerifyError};
pub use nonce::{MAX_NONCE_LEN, MIN_NONCE_LEN};
pub use otp::{MAX_OTP_LEN, MIN_OTP_LEN, public_id};
pub use status::ResponseStatus;
