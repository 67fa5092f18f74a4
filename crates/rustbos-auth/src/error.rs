//! Error types for BCE token verification.
//!
//! Signing never fails; every variant here comes from checking a token that
//! arrived on an incoming request.

/// Errors that can occur while verifying a `bce-auth-v1` authorization token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The token does not start with `bce-auth-v1`.
    #[error("Unsupported auth version: {0}")]
    UnsupportedVersion(String),

    /// A header listed in the token's signed header list is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The access key was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The token's validity window (timestamp + expiry) has passed.
    #[error("Request has expired")]
    RequestExpired,
}
