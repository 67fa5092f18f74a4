//! Request inputs shared by the signer, the verifier and the HTTP client.
//!
//! [`Headers`] keeps the caller's original header casing for the wire while
//! comparing names case-insensitively. [`QueryParams`] keeps insertion order and
//! distinguishes a valueless flag (`?acl`) from an empty value (`?acl=`).

use percent_encoding::percent_decode_str;

use crate::canonical::uri_encode;

/// An ordered set of HTTP headers with case-insensitive name identity.
///
/// # Examples
///
/// ```
/// use rustbos_auth::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "text/plain");
/// headers.insert("content-type", "application/json");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing header with the same name
    /// (compared case-insensitively). Returns the replaced value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                let (_, old) = std::mem::replace(&mut self.entries[idx], (name, value));
                Some(old)
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Get the value of a header by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Whether a header with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove a header by case-insensitive name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Iterate over `(original name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Headers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl From<&http::HeaderMap> for Headers {
    /// Repeated header values are joined with a comma.
    fn from(map: &http::HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            let value = String::from_utf8_lossy(value.as_bytes());
            match headers.position(name.as_str()) {
                Some(idx) => {
                    let existing = &mut headers.entries[idx].1;
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => headers
                    .entries
                    .push((name.as_str().to_owned(), value.into_owned())),
            }
        }
        headers
    }
}

/// Ordered query parameters where each value may be absent.
///
/// # Examples
///
/// ```
/// use rustbos_auth::QueryParams;
///
/// let mut query = QueryParams::new();
/// query.insert("prefix", "photos/");
/// query.insert_flag("acl");
///
/// assert_eq!(query.to_query_string(), "prefix=photos%2F&acl");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an existing parameter with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Some(value.into()));
    }

    /// Set `key` as a valueless flag (`?acl`).
    pub fn insert_flag(&mut self, key: impl Into<String>) {
        self.set(key, None);
    }

    /// Set `key` to an optional value, replacing an existing parameter with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a parameter. The outer `Option` is presence, the inner one the value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the parameters for a request URL, in insertion order.
    ///
    /// Flags are written as a bare key; this is the form that
    /// [`QueryParams::parse`] reads back as an absent value.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}={}", uri_encode(k), uri_encode(v)),
                None => uri_encode(k),
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a raw (percent-encoded) query string as received on the wire.
    ///
    /// `a` yields an absent value, `a=` an empty one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustbos_auth::QueryParams;
    ///
    /// let query = QueryParams::parse("acl&prefix=a%20b&marker=");
    /// assert_eq!(query.get("acl"), Some(None));
    /// assert_eq!(query.get("prefix"), Some(Some("a b")));
    /// assert_eq!(query.get("marker"), Some(Some("")));
    /// ```
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for param in query.split('&').filter(|s| !s.is_empty()) {
            match param.split_once('=') {
                Some((k, v)) => params.insert(decode(k), decode(v)),
                None => params.insert_flag(decode(param)),
            }
        }
        params
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

fn decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
