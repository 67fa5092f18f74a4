//! Server-side verification of `bce-auth-v1` tokens.
//!
//! Verification recomputes the signature from the incoming request:
//!
//! 1. Parse the `Authorization` header into its six `/`-separated segments.
//! 2. Resolve the secret key for the access key.
//! 3. Reject tokens whose `timestamp + expires_in` lies in the past.
//! 4. Rebuild the selected headers: the token's signed header list when it has
//!    one, the default selection otherwise.
//! 5. Rebuild the canonical request, derive the signing key from the token's
//!    own prefix, and compare signatures in constant time.
//!
//! The main entry point is [`verify_authorization`].

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use percent_encoding::percent_decode_str;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{build_canonical_request, canonical_header_name};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::selector::select_headers;
use crate::signer::{AUTH_VERSION, TIMESTAMP_FORMAT, compute_signature, derive_signing_key};
use crate::types::{Headers, QueryParams};

/// The result of a successful verification.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The access key that signed the request.
    pub access_key: String,
    /// When the token was issued.
    pub timestamp: DateTime<Utc>,
    /// Token validity in seconds.
    pub expires_in: u64,
    /// The explicit signed header list (empty for the default selection).
    pub signed_headers: Vec<String>,
}

/// Parsed components of a `bce-auth-v1` token.
///
/// Format:
/// ```text
/// bce-auth-v1/{accessKey}/{timestamp}/{expiresIn}/{signedHeaders}/{signature}
/// ```
#[derive(Debug, Clone)]
pub struct ParsedAuthorization {
    /// The access key.
    pub access_key: String,
    /// The issue time.
    pub timestamp: DateTime<Utc>,
    /// Token validity in seconds.
    pub expires_in: u64,
    /// Canonical (lowercase, encoded) signed header names; empty for the default selection.
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
    /// The first four segments verbatim, as used to derive the signing key.
    pub auth_prefix: String,
}

/// Parse a `bce-auth-v1` token.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the token does not have six
/// segments or a segment is malformed, and [`AuthError::UnsupportedVersion`]
/// if it does not start with `bce-auth-v1`.
///
/// # Examples
///
/// ```
/// use rustbos_auth::verify::parse_authorization;
///
/// let parsed = parse_authorization(
///     "bce-auth-v1/AK/2019-06-01T08:30:00Z/1800/author;host/0123abcd",
/// )
/// .unwrap();
/// assert_eq!(parsed.access_key, "AK");
/// assert_eq!(parsed.expires_in, 1800);
/// assert_eq!(parsed.signed_headers, vec!["author", "host"]);
/// ```
pub fn parse_authorization(token: &str) -> Result<ParsedAuthorization, AuthError> {
    let segments: Vec<&str> = token.trim().split('/').collect();
    let [version, access_key, timestamp, expires_in, signed_headers, signature] =
        segments.as_slice()
    else {
        return Err(AuthError::InvalidAuthHeader);
    };

    if *version != AUTH_VERSION {
        return Err(AuthError::UnsupportedVersion((*version).to_owned()));
    }
    if access_key.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    let parsed_timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| AuthError::InvalidAuthHeader)?
        .and_utc();
    let parsed_expires_in: u64 = expires_in
        .parse()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let signed_headers = if signed_headers.is_empty() {
        Vec::new()
    } else {
        signed_headers.split(';').map(ToOwned::to_owned).collect()
    };

    Ok(ParsedAuthorization {
        access_key: (*access_key).to_owned(),
        timestamp: parsed_timestamp,
        expires_in: parsed_expires_in,
        signed_headers,
        signature: (*signature).to_owned(),
        auth_prefix: format!("{version}/{access_key}/{timestamp}/{expires_in}"),
    })
}

/// Verify a request signed with a `bce-auth-v1` token as of `now`.
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - The `Authorization` header is missing or malformed
/// - The access key is not found
/// - The token has expired
/// - A listed signed header is missing
/// - The signature does not match
pub fn verify_authorization(
    parts: &http::request::Parts,
    credential_provider: &dyn CredentialProvider,
    now: DateTime<Utc>,
) -> Result<AuthResult, AuthError> {
    let token = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let parsed = parse_authorization(token)?;

    debug!(
        access_key = %parsed.access_key,
        timestamp = %parsed.timestamp,
        expires_in = parsed.expires_in,
        "Verifying BCE signature"
    );

    let secret_key = credential_provider.get_secret_key(&parsed.access_key)?;

    let expires_in = i64::try_from(parsed.expires_in).map_err(|_| AuthError::InvalidAuthHeader)?;
    let deadline = TimeDelta::try_seconds(expires_in)
        .and_then(|window| parsed.timestamp.checked_add_signed(window))
        .ok_or(AuthError::InvalidAuthHeader)?;
    if now > deadline {
        debug!(deadline = %deadline, now = %now, "Token expired");
        return Err(AuthError::RequestExpired);
    }

    let headers = Headers::from(&parts.headers);
    let selected = if parsed.signed_headers.is_empty() {
        select_headers::<&str>(&headers, &[]).headers
    } else {
        collect_signed_headers(&headers, &parsed.signed_headers)?
    };

    let path = percent_decode_str(parts.uri.path()).decode_utf8_lossy();
    let query = QueryParams::parse(parts.uri.query().unwrap_or(""));
    let canonical_request =
        build_canonical_request(parts.method.as_str(), &path, &query, &selected);

    debug!(canonical_request, "Rebuilt canonical request");

    let signing_key = derive_signing_key(&secret_key, &parsed.auth_prefix);
    let expected_signature = compute_signature(&signing_key, &canonical_request);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(access_key = %parsed.access_key, "Signature verification succeeded");
        Ok(AuthResult {
            access_key: parsed.access_key,
            timestamp: parsed.timestamp,
            expires_in: parsed.expires_in,
            signed_headers: parsed.signed_headers,
        })
    } else {
        debug!(provided = %parsed.signature, "Signature mismatch");
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Pick the request headers named in the token's signed header list.
fn collect_signed_headers<'a>(
    headers: &'a Headers,
    signed_headers: &[String],
) -> Result<Vec<(&'a str, &'a str)>, AuthError> {
    let mut result = Vec::with_capacity(signed_headers.len());

    for wanted in signed_headers {
        let entry = headers
            .iter()
            .find(|(name, _)| canonical_header_name(name) == *wanted)
            .ok_or_else(|| AuthError::MissingHeader(wanted.clone()))?;
        result.push(entry);
    }

    Ok(result)
}
