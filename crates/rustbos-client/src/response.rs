//! Response shaping.
//!
//! A successful BOS response is returned in one of the shapes selected by
//! [`ReturnFormat`]: the raw body, the body decoded as JSON, the response
//! headers, or headers and body together.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::HeaderMap;
use serde::Serialize;

use crate::error::BosResult;

/// How a successful response is returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnFormat {
    /// The raw response body.
    #[default]
    Body,
    /// The response body decoded as JSON.
    BodyJson,
    /// The response headers.
    Headers,
    /// Headers and raw body together.
    Both,
}

/// The value(s) of one response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    /// The header appeared once.
    Single(String),
    /// The header appeared several times; values in response order.
    Multiple(Vec<String>),
}

impl HeaderEntry {
    /// The first value of the header.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Multiple(values) => values.first().map_or("", String::as_str),
        }
    }

    /// All values of the header.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                *self = Self::Multiple(vec![std::mem::take(first), value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

/// Response headers keyed by lowercase name.
///
/// # Examples
///
/// ```
/// use http::{HeaderMap, HeaderValue};
/// use rustbos_client::response::ResponseHeaders;
///
/// let mut map = HeaderMap::new();
/// map.insert("etag", HeaderValue::from_static("\"abc\""));
/// map.append("x-bce-meta-tag", HeaderValue::from_static("a"));
/// map.append("x-bce-meta-tag", HeaderValue::from_static("b"));
///
/// let headers = ResponseHeaders::from_header_map(&map);
/// assert_eq!(headers.first("ETag"), Some("\"abc\""));
/// assert_eq!(headers.get("x-bce-meta-tag").map(|e| e.values()), Some(vec!["a", "b"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, HeaderEntry>,
}

impl ResponseHeaders {
    /// Collect headers from an [`http::HeaderMap`]. Values that are not valid
    /// UTF-8 are decoded lossily.
    #[must_use]
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut headers = Self::default();
        for (name, value) in map {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers.append(name.as_str(), value);
        }
        headers
    }

    /// Look up a header by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// The first value of a header, by case-insensitive name.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).map(HeaderEntry::first)
    }

    /// Iterate over `(lowercase name, entry)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn append(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        match self.entries.get_mut(&name) {
            Some(entry) => entry.push(value),
            None => {
                self.entries.insert(name, HeaderEntry::Single(value));
            }
        }
    }
}

/// A successful response, shaped according to a [`ReturnFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// [`ReturnFormat::Body`].
    Body(Bytes),
    /// [`ReturnFormat::BodyJson`].
    Json(serde_json::Value),
    /// [`ReturnFormat::Headers`].
    Headers(ResponseHeaders),
    /// [`ReturnFormat::Both`].
    Both {
        /// Response headers.
        headers: ResponseHeaders,
        /// Raw response body.
        body: Bytes,
    },
}

impl Response {
    /// Shape a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosError::Json`] when `format` is
    /// [`ReturnFormat::BodyJson`] and the body is not valid JSON.
    pub fn shape(format: ReturnFormat, headers: &HeaderMap, body: Bytes) -> BosResult<Self> {
        Ok(match format {
            ReturnFormat::Body => Self::Body(body),
            ReturnFormat::BodyJson => Self::Json(serde_json::from_slice(&body)?),
            ReturnFormat::Headers => Self::Headers(ResponseHeaders::from_header_map(headers)),
            ReturnFormat::Both => Self::Both {
                headers: ResponseHeaders::from_header_map(headers),
                body,
            },
        })
    }

    /// The raw body, for [`Response::Body`] and [`Response::Both`].
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Body(body) | Self::Both { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The headers, for [`Response::Headers`] and [`Response::Both`].
    #[must_use]
    pub fn headers(&self) -> Option<&ResponseHeaders> {
        match self {
            Self::Headers(headers) | Self::Both { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// The decoded JSON body, for [`Response::Json`].
    #[must_use]
    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}
