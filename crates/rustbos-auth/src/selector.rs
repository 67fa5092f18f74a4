//! Selection of the headers that are bound into a signature.
//!
//! `Host`, `Content-Length`, `Content-Type`, `Content-MD5` and every `x-bce-*`
//! header are always signed. Any other header is signed only when the caller
//! names it explicitly, and doing so switches the token to carry an explicit
//! signed-header list.

use crate::types::Headers;

/// Header names (lowercase) that are always signed when present.
pub const HEADERS_TO_SIGN: [&str; 4] = ["host", "content-length", "content-type", "content-md5"];

/// Prefix of the BCE namespaced headers, all of which are always signed.
pub const BCE_HEADER_PREFIX: &str = "x-bce-";

/// The outcome of header selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedHeaders<'a> {
    /// Selected `(original name, value)` pairs, in request order.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Whether at least one header was selected only because the caller asked for it.
    pub has_explicit: bool,
}

impl SelectedHeaders<'_> {
    /// The selected header names, original casing.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.headers.iter().map(|(name, _)| *name).collect()
    }
}

/// Whether `name` is signed regardless of the caller's explicit list.
///
/// Surrounding whitespace is ignored, as it is when the name is canonicalized.
///
/// # Examples
///
/// ```
/// use rustbos_auth::selector::is_default_signed_header;
///
/// assert!(is_default_signed_header("Content-MD5"));
/// assert!(is_default_signed_header("X-BCE-Date"));
/// assert!(is_default_signed_header(" Host "));
/// assert!(!is_default_signed_header("Range"));
/// ```
#[must_use]
pub fn is_default_signed_header(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    HEADERS_TO_SIGN.contains(&lower.as_str()) || lower.starts_with(BCE_HEADER_PREFIX)
}

/// Partition `headers` into signed and unsigned ones.
///
/// `sign_headers` is compared case-insensitively, ignoring surrounding whitespace. Naming a header that is
/// already signed by default does not count as an explicit selection, and
/// naming a header that is not present has no effect.
#[must_use]
pub fn select_headers<'a, S: AsRef<str>>(
    headers: &'a Headers,
    sign_headers: &[S],
) -> SelectedHeaders<'a> {
    let mut selected = SelectedHeaders::default();

    for (name, value) in headers.iter() {
        if is_default_signed_header(name) {
            selected.headers.push((name, value));
        } else if sign_headers
            .iter()
            .any(|wanted| wanted.as_ref().trim().eq_ignore_ascii_case(name.trim()))
        {
            selected.headers.push((name, value));
            selected.has_explicit = true;
        }
    }

    selected
}
