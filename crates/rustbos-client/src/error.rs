//! BOS client error types.
//!
//! [`BosError`] covers every failure a [`crate::BosClient`] call can surface:
//! invalid configuration, rejected arguments, structured BOS API errors,
//! malformed error responses, transport failures and undecodable JSON bodies.
//!
//! # Usage
//!
//! ```
//! use http::StatusCode;
//! use rustbos_client::error::{BosError, map_error_response};
//!
//! let body = br#"{"code":"NoSuchKey","message":"The specified key does not exist.","requestId":"req-1"}"#;
//! let err = map_error_response(StatusCode::NOT_FOUND, body);
//! assert_eq!(err.code(), Some("NoSuchKey"));
//! assert_eq!(err.request_id(), Some("req-1"));
//! ```

use http::StatusCode;
use serde::Deserialize;

/// Result alias used throughout the client.
pub type BosResult<T> = Result<T, BosError>;

/// Errors produced by the BOS client.
#[derive(Debug, thiserror::Error)]
pub enum BosError {
    /// The client configuration is incomplete or invalid.
    #[error("{0}")]
    Config(String),

    /// An ACL other than `private` or `public-read` was requested.
    #[error("unsupported acl: {0}, either private or public-read")]
    UnsupportedAcl(String),

    /// An object path has a `.` or `..` segment, which HTTP clients collapse
    /// before sending and would then address a different object than the one signed.
    #[error("invalid object path {0}: `.` and `..` segments are not allowed")]
    InvalidPath(String),

    /// BOS answered with a structured error document.
    #[error("{message} (code: {code}, status: {status})")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// BOS error code, e.g. `NoSuchKey`.
        code: String,
        /// Human-readable message from BOS.
        message: String,
        /// Request identifier reported by BOS, if any.
        request_id: Option<String>,
    },

    /// BOS answered with a non-success status and a body that is not an error document.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, lossily decoded as UTF-8.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body expected to be JSON could not be decoded.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

impl BosError {
    /// The BOS error code, for [`BosError::Api`] errors.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The BOS request identifier, for [`BosError::Api`] errors that carry one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status code, when the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a transport-class failure: no response was received,
    /// or the response was a non-success status without a BOS error document.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::UnexpectedStatus { .. })
    }
}

/// The subset of a BOS error document the client understands.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDocument {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

/// Map a non-success response to a [`BosError`].
///
/// A JSON body carrying both `code` and `message` becomes [`BosError::Api`];
/// anything else becomes [`BosError::UnexpectedStatus`] with the raw body.
#[must_use]
pub fn map_error_response(status: StatusCode, body: &[u8]) -> BosError {
    if let Ok(ErrorDocument {
        code: Some(code),
        message: Some(message),
        request_id,
    }) = serde_json::from_slice::<ErrorDocument>(body)
    {
        return BosError::Api {
            status: status.as_u16(),
            code,
            message,
            request_id,
        };
    }

    BosError::UnexpectedStatus {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}
