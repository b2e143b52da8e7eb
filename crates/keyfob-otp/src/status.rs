//! Protocol status codes returned by the validation service.

/// Status reported in the `status=` field of an endpoint reply.
///
/// Every reply carries exactly one of these; anything else in the field is
/// treated as a malformed reply, not a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The OTP is valid.
    Ok,
    /// The OTP is malformed.
    BadOtp,
    /// The OTP has already been seen by the service.
    ReplayedOtp,
    /// The request signature (`h`) did not verify.
    BadSignature,
    /// The request is missing a parameter.
    MissingParameter,
    /// The client id does not exist.
    NoSuchClient,
    /// The client id is not allowed to verify OTPs.
    OperationNotAllowed,
    /// Internal error in the validation service.
    BackendError,
    /// The service could not reach enough sync peers before its timeout.
    NotEnoughAnswers,
    /// This OTP/nonce combination has been seen before.
    ReplayedRequest,
}

impl ResponseStatus {
    /// Wire spelling used in replies and in signed response strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadOtp => "BAD_OTP",
            Self::ReplayedOtp => "REPLAYED_OTP",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::NoSuchClient => "NO_SUCH_CLIENT",
            Self::OperationNotAllowed => "OPERATION_NOT_ALLOWED",
            Self::BackendError => "BACKEND_ERROR",
            Self::NotEnoughAnswers => "NOT_ENOUGH_ANSWERS",
            Self::ReplayedRequest => "REPLAYED_REQUEST",
        }
    }

    /// Parse the wire spelling. Returns `None` for unknown tokens.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "OK" => Some(Self::Ok),
            "BAD_OTP" => Some(Self::BadOtp),
            "REPLAYED_OTP" => Some(Self::ReplayedOtp),
            "BAD_SIGNATURE" => Some(Self::BadSignature),
            "MISSING_PARAMETER" => Some(Self::MissingParameter),
            "NO_SUCH_CLIENT" => Some(Self::NoSuchClient),
            "OPERATION_NOT_ALLOWED" => Some(Self::OperationNotAllowed),
            "BACKEND_ERROR" => Some(Self::BackendError),
            "NOT_ENOUGH_ANSWERS" => Some(Self::NotEnoughAnswers),
            "REPLAYED_REQUEST" => Some(Self::ReplayedRequest),
            _ => None,
        }
    }

    /// Whether this status means the OTP verified.
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [ResponseStatus; 10] = [
        ResponseStatus::Ok,
        ResponseStatus::BadOtp,
        ResponseStatus::ReplayedOtp,
        ResponseStatus::BadSignature,
        ResponseStatus::MissingParameter,
        ResponseStatus::NoSuchClient,
        ResponseStatus::OperationNotAllowed,
        ResponseStatus::BackendError,
        ResponseStatus::NotEnoughAnswers,
        ResponseStatus::ReplayedRequest,
    ];

    #[test]
    fn wire_names_parse_back() {
        for status in ALL {
            assert_eq!(ResponseStatus::from_wire(status.as_str()), Some(status));
        }
    }

    #[test]
    fn only_ok_is_ok() {
        for status in ALL {
            assert_eq!(status.is_ok(), status == ResponseStatus::Ok);
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(ResponseStatus::from_wire("ok"), None);
        assert_eq!(ResponseStatus::from_wire("CRC_FAILURE"), None);
        assert_eq!(ResponseStatus::from_wire(""), None);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(ResponseStatus::NotEnoughAnswers.to_string(), "NOT_ENOUGH_ANSWERS");
    }
}
