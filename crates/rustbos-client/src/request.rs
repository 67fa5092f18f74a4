//! Request preparation.
//!
//! [`prepare_request`] turns a method, path and [`RequestOptions`] into a
//! fully addressed and signed [`PreparedRequest`]. It does no I/O, so the
//! exact headers and URL that will be sent can be inspected and tested.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::Method;
use md5::{Digest, Md5};
use rustbos_auth::canonical::build_canonical_uri;
use rustbos_auth::{Authorizer, Headers, QueryParams, SignOptions};
use tracing::debug;

use crate::config::BosConfig;
use crate::error::{BosError, BosResult};
use crate::response::ReturnFormat;

/// `Date` header format (RFC 1123, always GMT).
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Per-request options.
///
/// # Examples
///
/// ```
/// use rustbos_client::{RequestOptions, ReturnFormat};
///
/// let options = RequestOptions::new()
///     .query("prefix", "photos/")
///     .query_flag("acl")
///     .header("x-bce-meta-owner", "thomas")
///     .sign_header("Range")
///     .return_format(ReturnFormat::Both);
/// assert_eq!(options.query.len(), 2);
/// assert_eq!(options.headers.get("X-Bce-Meta-Owner"), Some("thomas"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters, sent in insertion order.
    pub query: QueryParams,
    /// Extra request headers.
    pub headers: Headers,
    /// Request body.
    pub body: Option<Bytes>,
    /// Signing options.
    pub sign: SignOptions,
    /// Shape of the value returned by [`crate::BosClient::request`].
    pub return_format: ReturnFormat,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `key=value` query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Add a valueless query parameter (`?acl`).
    #[must_use]
    pub fn query_flag(mut self, key: impl Into<String>) -> Self {
        self.query.insert_flag(key);
        self
    }

    /// Set a request header, replacing any header with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Bind an additional header into the signature.
    #[must_use]
    pub fn sign_header(mut self, name: impl Into<String>) -> Self {
        self.sign.sign_headers.push(name.into());
        self
    }

    /// Override the validity of the generated token.
    #[must_use]
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.sign.expires_in = Some(seconds);
        self
    }

    /// Choose the shape of the returned value.
    #[must_use]
    pub fn return_format(mut self, format: ReturnFormat) -> Self {
        self.return_format = format;
        self
    }
}

/// A request ready to hand to the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the encoded query string.
    pub url: String,
    /// Every header to send, `Authorization` included.
    pub headers: Headers,
    /// Request body.
    pub body: Option<Bytes>,
}

/// Address, complete and sign a request.
///
/// - The path is normalized to a single leading `/`.
/// - `Host` is always set to [`BosConfig::host`].
/// - `Date`, `Content-Length`, `Content-MD5` (non-empty bodies only) and
///   `Authorization` are added unless the caller already supplied them.
///
/// Header presence is checked case-insensitively.
///
/// # Errors
///
/// Returns [`BosError::InvalidPath`] if the path has a `.` or `..` segment.
/// URL parsers collapse such segments, so the request would reach a different
/// object than the one the token was computed for.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use http::Method;
/// use rustbos_client::config::BosConfig;
/// use rustbos_client::request::{RequestOptions, prepare_request};
///
/// let config = BosConfig::builder()
///     .access_key("AK".into())
///     .secret_key("SK".into())
///     .bucket("bucket".into())
///     .region("gz".into())
///     .build();
/// let now = Utc.with_ymd_and_hms(2019, 6, 1, 8, 30, 0).unwrap();
///
/// let prepared = prepare_request(
///     &config,
///     &config.authorizer(),
///     &Method::GET,
///     "bos_test.txt",
///     &RequestOptions::new(),
///     now,
/// )
/// .unwrap();
/// assert_eq!(prepared.url, "https://bucket.gz.bcebos.com/bos_test.txt");
/// assert_eq!(prepared.headers.get("Date"), Some("Sat, 01 Jun 2019 08:30:00 GMT"));
/// assert!(prepared.headers.get("Authorization").unwrap().starts_with("bce-auth-v1/AK/"));
/// ```
pub fn prepare_request(
    config: &BosConfig,
    authorizer: &Authorizer,
    method: &Method,
    path: &str,
    options: &RequestOptions,
    now: DateTime<Utc>,
) -> BosResult<PreparedRequest> {
    let path = format!("/{}", path.trim_start_matches('/'));
    if has_dot_segment(&path) {
        return Err(BosError::InvalidPath(path));
    }
    let body = options.body.clone();
    let body_bytes = body.as_deref().unwrap_or_default();

    let mut headers = options.headers.clone();
    headers.insert("Host", config.host());

    if !headers.contains("date") {
        headers.insert("Date", format_http_date(now));
    }

    if !headers.contains("content-length") {
        headers.insert("Content-Length", body_bytes.len().to_string());
    }

    if !headers.contains("content-md5") && !body_bytes.is_empty() {
        headers.insert("Content-MD5", content_md5(body_bytes));
    }

    if !headers.contains("authorization") {
        let token = authorizer.authorize_at(
            method.as_str(),
            &path,
            &options.query,
            &headers,
            &options.sign,
            now,
        );
        headers.insert("Authorization", token);
    }

    let mut url = format!("{}{}", config.base_url(), build_canonical_uri(&path));
    if !options.query.is_empty() {
        url.push('?');
        url.push_str(&options.query.to_query_string());
    }

    debug!(method = %method, url, "Prepared request");

    Ok(PreparedRequest {
        method: method.clone(),
        url,
        headers,
        body,
    })
}

fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "." || segment == "..")
}

/// Format an instant for the `Date` header.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rustbos_client::request::format_http_date;
///
/// let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
/// assert_eq!(format_http_date(now), "Sun, 18 Oct 2026 12:00:00 GMT");
/// ```
#[must_use]
pub fn format_http_date(now: DateTime<Utc>) -> String {
    now.format(HTTP_DATE_FORMAT).to_string()
}

/// Base64 of the raw MD5 digest of `body`, as sent in `Content-MD5`.
#[must_use]
pub fn content_md5(body: &[u8]) -> String {
    BASE64_STANDARD.encode(Md5::digest(body))
}
