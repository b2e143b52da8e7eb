//! Verifier configuration and the verification entry points.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use zeroize::Zeroize;

use crate::dispatch;
use crate::error::{Result, VerifyError};
use crate::nonce;
use crate::otp::{self, Screen};
use crate::request;
use crate::response::Response;

/// Default deadline for one verification call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The production validation endpoints, all raced on every call.
pub fn default_endpoints() -> Vec<String> {
    [
        "https://api.yubico.com/wsapi/2.0/verify",
        "https://api2.yubico.com/wsapi/2.0/verify",
        "https://api3.yubico.com/wsapi/2.0/verify",
        "https://api4.yubico.com/wsapi/2.0/verify",
        "https://api5.yubico.com/wsapi/2.0/verify",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// API credential issued by the validation service.
#[derive(Clone)]
pub struct ApiCredential {
    /// Numeric client identifier, sent as the `id` request field.
    pub client_id: String,
    /// Base64-encoded shared secret the requests are signed with.
    pub secret_key: String,
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredential")
            .field("client_id", &self.client_id)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Decoded HMAC key. Wiped on drop.
struct SecretKey(Vec<u8>);

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Configuration for an [`OtpVerifier`].
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Credential used to sign requests and authenticate replies.
    pub credential: ApiCredential,
    /// Endpoints raced on every verification.
    pub endpoints: Vec<String>,
    /// Overall deadline for one verification.
    pub timeout: Duration,
    /// Accept only factory-programmed (`cc`-prefixed) OTPs.
    pub factory_only: bool,
    /// Pin the nonce length instead of drawing it at random per call.
    pub nonce_length: Option<usize>,
}

impl VerifierConfig {
    /// Configuration with the production endpoints and default deadline.
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            endpoints: default_endpoints(),
            timeout: DEFAULT_TIMEOUT,
            factory_only: false,
            nonce_length: None,
        }
    }
}

/// Remote OTP verification client.
///
/// One verifier holds one HTTP client for its whole lifetime and keeps no
/// state between calls; concurrent verifications are fine.
pub struct OtpVerifier {
    http: reqwest::Client,
    client_id: String,
    key: SecretKey,
    endpoints: Vec<String>,
    timeout: Duration,
    factory_only: bool,
    nonce_length: Option<usize>,
}

impl std::fmt::Debug for OtpVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpVerifier")
            .field("client_id", &self.client_id)
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("factory_only", &self.factory_only)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl OtpVerifier {
    /// Build a verifier from `config`.
    ///
    /// Validates the credential, decodes the shared secret, and builds the
    /// HTTP client used by every subsequent call.
    pub fn new(config: VerifierConfig) -> Result<Self> {
        if config.credential.client_id.is_empty() {
            return Err(VerifyError::Credential("client_id is empty".into()));
        }
        if config.credential.secret_key.is_empty() {
            return Err(VerifyError::Credential("secret_key is empty".into()));
        }
        let key = B64
            .decode(config.credential.secret_key.as_bytes())
            .map_err(|e| VerifyError::Credential(format!("secret_key is not valid base64: {e}")))?;

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means one was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            client_id: config.credential.client_id,
            key: SecretKey(key),
            endpoints: config.endpoints,
            timeout: config.timeout,
            factory_only: config.factory_only,
            nonce_length: config.nonce_length,
        })
    }

    /// Verify `otp`, accepting any device that validates.
    pub async fn verify(&self, otp: &str) -> Result<bool> {
        self.verify_inner(otp, None).await
    }

    /// Verify `otp` and additionally require it to come from `device_id`.
    pub async fn verify_device(&self, otp: &str, device_id: &str) -> Result<bool> {
        self.verify_inner(otp, Some(&[device_id])).await
    }

    /// Verify `otp` and additionally require its device to appear in
    /// `device_ids`. An empty list authorizes nothing.
    pub async fn verify_any(&self, otp: &str, device_ids: &[&str]) -> Result<bool> {
        self.verify_inner(otp, Some(device_ids)).await
    }

    async fn verify_inner(&self, otp: &str, allowed: Option<&[&str]>) -> Result<bool> {
        match otp::screen(otp, self.factory_only)? {
            Screen::Refused => return Ok(false),
            Screen::Permitted => {}
        }

        let nonce = nonce::generate(self.nonce_length);
        let query = request::signed_query(&self.client_id, &self.key.0, otp, &nonce)?;
        let body = dispatch::race(&self.http, &self.endpoints, &query, self.timeout).await?;

        Response::parse(&body).authenticate(&self.key.0, otp, &nonce)?;

        let authorized = match allowed {
            None => true,
            Some(ids) => {
                let device = otp::public_id(otp);
                ids.iter().any(|id| *id == device)
            }
        };
        Ok(authorized)
    }
}
