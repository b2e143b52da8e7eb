//! Verification error types.

use std::time::Duration;

use crate::status::ResponseStatus;

/// Which part of an endpoint reply contradicted the request it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discrepancy {
    /// The reply echoed a different OTP than the one submitted.
    Otp,
    /// The reply echoed a different nonce than the one generated.
    Nonce,
    /// The reply signature does not match the recomputed digest.
    Signature,
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Otp => write!(f, "OTP mismatch"),
            Self::Nonce => write!(f, "nonce mismatch"),
            Self::Signature => write!(f, "signature mismatch"),
        }
    }
}

/// Errors from a verification attempt.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The validation service rejected the OTP with a protocol status.
    ///
    /// Also raised locally, before any request is sent, when the OTP fails
    /// syntax screening (`BAD_OTP`).
    #[error("Validation failed with status {0}")]
    Status(ResponseStatus),

    /// An endpoint answered with `OK` but its reply contradicts the request.
    ///
    /// Treat this as tampering or a replayed answer, never as a benign
    /// rejection.
    #[error("Endpoint reply inconsistent with request: {0}")]
    Discrepancy(Discrepancy),

    /// No endpoint produced a usable reply within the deadline.
    #[error("No endpoint answered within {0:?}")]
    Timeout(Duration),

    /// The winning reply could not be parsed as a protocol response.
    #[error("Malformed endpoint reply: {0}")]
    MalformedResponse(String),

    /// The client credential is unusable.
    #[error("Invalid credential: {0}")]
    Credential(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VerifyError>;
