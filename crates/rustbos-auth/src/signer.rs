//! BCE request signing (`bce-auth-v1`).
//!
//! The token is produced in four steps:
//!
//! 1. Select the headers to sign ([`crate::selector`]).
//! 2. Build the canonical request ([`crate::canonical`]).
//! 3. Derive a signing key scoped to the access key, timestamp and expiry, then
//!    sign the canonical request with it:
//!
//!    ```text
//!    AuthPrefix = "bce-auth-v1/" + AccessKey + "/" + Timestamp + "/" + ExpiresIn
//!    SigningKey = hex(HMAC-SHA256(SecretKey, AuthPrefix))
//!    Signature  = hex(HMAC-SHA256(SigningKey, CanonicalRequest))
//!    ```
//!
//!    The hex string of the first digest, not its raw bytes, keys the second HMAC.
//! 4. Assemble `AuthPrefix + "/" + SignedHeaders + "/" + Signature`.
//!
//! The main entry point is [`Authorizer::authorize`].

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{build_canonical_request, build_signed_headers_string};
use crate::credentials::Credential;
use crate::selector::select_headers;
use crate::types::{Headers, QueryParams};

/// Version tag that starts every token.
pub const AUTH_VERSION: &str = "bce-auth-v1";

/// Token validity used when neither the authorizer nor the call overrides it.
pub const DEFAULT_EXPIRES_IN_SECONDS: u64 = 1800;

/// `chrono` format of the token timestamp (`2019-06-01T08:30:00Z`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

type HmacSha256 = Hmac<Sha256>;

/// Per-call signing options.
///
/// # Examples
///
/// ```
/// use rustbos_auth::SignOptions;
///
/// let options = SignOptions::new().sign_header("Range").expires_in(60);
/// assert_eq!(options.sign_headers, vec!["Range".to_owned()]);
/// assert_eq!(options.expires_in, Some(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Extra header names to bind into the signature (case-insensitive).
    pub sign_headers: Vec<String>,
    /// Token validity in seconds; `None` uses the authorizer's default.
    pub expires_in: Option<u64>,
}

impl SignOptions {
    /// Options with no extra signed headers and the default expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header name to sign.
    #[must_use]
    pub fn sign_header(mut self, name: impl Into<String>) -> Self {
        self.sign_headers.push(name.into());
        self
    }

    /// Override the token validity.
    #[must_use]
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

/// Produces `bce-auth-v1` authorization tokens for one credential.
///
/// The authorizer is immutable and can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rustbos_auth::{Authorizer, Credential, Headers, QueryParams, SignOptions};
///
/// let authorizer = Authorizer::new(Credential::new("AK", "SK"));
/// let headers: Headers = [("Host", "bucket.gz.bcebos.com")].into_iter().collect();
/// let now = Utc.with_ymd_and_hms(2019, 6, 1, 8, 30, 0).unwrap();
///
/// let token = authorizer.authorize_at(
///     "GET",
///     "/bos_test.txt",
///     &QueryParams::new(),
///     &headers,
///     &SignOptions::new(),
///     now,
/// );
/// assert!(token.starts_with("bce-auth-v1/AK/2019-06-01T08:30:00Z/1800//"));
/// ```
#[derive(Debug, Clone)]
pub struct Authorizer {
    credential: Credential,
    default_expires_in: u64,
}

impl Authorizer {
    /// Create an authorizer with the standard 1800 second expiry.
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self::with_default_expiry(credential, DEFAULT_EXPIRES_IN_SECONDS)
    }

    /// Create an authorizer with a custom default expiry.
    #[must_use]
    pub fn with_default_expiry(credential: Credential, default_expires_in: u64) -> Self {
        Self {
            credential,
            default_expires_in,
        }
    }

    /// The access key embedded in every token.
    #[must_use]
    pub fn access_key(&self) -> &str {
        self.credential.access_key()
    }

    /// Expiry applied when [`SignOptions::expires_in`] is `None`.
    #[must_use]
    pub fn default_expires_in(&self) -> u64 {
        self.default_expires_in
    }

    /// Produce an authorization token stamped with the current time.
    #[must_use]
    pub fn authorize(
        &self,
        method: &str,
        path: &str,
        query: &QueryParams,
        headers: &Headers,
        options: &SignOptions,
    ) -> String {
        self.authorize_at(method, path, query, headers, options, Utc::now())
    }

    /// Produce an authorization token stamped with `now`.
    ///
    /// `headers` must be the headers exactly as they will be sent.
    #[must_use]
    pub fn authorize_at(
        &self,
        method: &str,
        path: &str,
        query: &QueryParams,
        headers: &Headers,
        options: &SignOptions,
        now: DateTime<Utc>,
    ) -> String {
        let selected = select_headers(headers, &options.sign_headers);
        let canonical_request = build_canonical_request(method, path, query, &selected.headers);

        debug!(canonical_request, "Built canonical request");

        let signed_headers = if selected.has_explicit {
            build_signed_headers_string(&selected.names())
        } else {
            String::new()
        };

        let expires_in = options.expires_in.unwrap_or(self.default_expires_in);
        let auth_prefix = build_auth_prefix(
            self.credential.access_key(),
            &format_timestamp(now),
            expires_in,
        );

        let signing_key = derive_signing_key(self.credential.secret_key(), &auth_prefix);
        let signature = compute_signature(&signing_key, &canonical_request);

        debug!(auth_prefix, signed_headers, "Signed request");

        assemble_token(&auth_prefix, &signed_headers, &signature)
    }
}

/// Format an instant as a token timestamp (UTC, second precision, literal `Z`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rustbos_auth::signer::format_timestamp;
///
/// let now = Utc.with_ymd_and_hms(2019, 6, 1, 8, 30, 5).unwrap();
/// assert_eq!(format_timestamp(now), "2019-06-01T08:30:05Z");
/// ```
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Build `bce-auth-v1/{access_key}/{timestamp}/{expires_in}`.
#[must_use]
pub fn build_auth_prefix(access_key: &str, timestamp: &str, expires_in: u64) -> String {
    format!("{AUTH_VERSION}/{access_key}/{timestamp}/{expires_in}")
}

/// Derive the signing key: lowercase hex of `HMAC-SHA256(secret_key, auth_prefix)`.
#[must_use]
pub fn derive_signing_key(secret_key: &str, auth_prefix: &str) -> String {
    hex::encode(hmac_sha256(secret_key.as_bytes(), auth_prefix.as_bytes()))
}

/// Sign the canonical request with the hex signing key. Returns lowercase hex.
#[must_use]
pub fn compute_signature(signing_key: &str, canonical_request: &str) -> String {
    hex::encode(hmac_sha256(signing_key.as_bytes(), canonical_request.as_bytes()))
}

/// Join the prefix, signed header list and signature into the final token.
#[must_use]
pub fn assemble_token(auth_prefix: &str, signed_headers: &str, signature: &str) -> String {
    format!("{auth_prefix}/{signed_headers}/{signature}")
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
