//! Canonical request construction for BCE signing (`bce-auth-v1`).
//!
//! The canonical request is:
//!
//! ```text
//! HTTPMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders
//! ```
//!
//! Query parameters and headers are sorted on their fully formatted
//! `key=value` / `name:value` strings, not on the key alone. The two orders
//! differ when one key is a prefix of another (`a-b=1` sorts before `a=1`).

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::types::QueryParams;

/// RFC 3986 encoding: everything except `A-Z a-z 0-9 - _ . ~` is percent-encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Same as [`URI_ENCODE_SET`], but path separators stay literal.
const PATH_ENCODE_SET: &AsciiSet = &URI_ENCODE_SET.remove(b'/');

/// Build the full canonical request from its components.
///
/// `headers` must already be the selected headers.
///
/// # Examples
///
/// ```
/// use rustbos_auth::QueryParams;
/// use rustbos_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "bos_test.txt",
///     &QueryParams::new(),
///     &[("Host", "bucket.gz.bcebos.com")],
/// );
/// assert_eq!(canonical, "GET\n/bos_test.txt\n\nhost:bucket.gz.bcebos.com");
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query: &QueryParams,
    headers: &[(&str, &str)],
) -> String {
    let canonical_uri = build_canonical_uri(path);
    let canonical_query = build_canonical_query_string(query);
    let canonical_headers = build_canonical_headers(headers);

    format!("{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}")
}

/// Build the canonical URI.
///
/// Leading slashes collapse to exactly one, the path is RFC 3986 encoded and
/// `/` separators are kept literal.
///
/// # Examples
///
/// ```
/// use rustbos_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("a/b"), "/a/b");
/// assert_eq!(build_canonical_uri("//a/b"), "/a/b");
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/hello world.txt"), "/hello%20world.txt");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    let path = format!("/{}", path.trim_start_matches('/'));
    utf8_percent_encode(&path, PATH_ENCODE_SET).to_string()
}

/// Build the canonical query string.
///
/// Each parameter becomes `key=value`, or a bare `key` when it has no value;
/// the formatted strings are sorted bytewise and joined with `&`.
///
/// # Examples
///
/// ```
/// use rustbos_auth::QueryParams;
/// use rustbos_auth::canonical::build_canonical_query_string;
///
/// let mut query = QueryParams::new();
/// query.insert("b", "2");
/// query.insert("a", "1");
/// assert_eq!(build_canonical_query_string(&query), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &QueryParams) -> String {
    let mut params: Vec<String> = query
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{}={}", uri_encode(key), uri_encode(value)),
            None => uri_encode(key),
        })
        .collect();

    params.sort_unstable();
    params.join("&")
}

/// Build the canonical headers string.
///
/// Names are trimmed and lowercased, values trimmed, both are encoded, and the
/// `name:value` lines are sorted bytewise and joined with `\n`. There is no
/// trailing newline.
///
/// # Examples
///
/// ```
/// use rustbos_auth::canonical::build_canonical_headers;
///
/// let result = build_canonical_headers(&[
///     ("Host", "bucket.gz.bcebos.com"),
///     ("Content-Type", " text/plain "),
/// ]);
/// assert_eq!(result, "content-type:text%2Fplain\nhost:bucket.gz.bcebos.com");
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{}:{}", canonical_header_name(name), uri_encode(value.trim())))
        .collect();

    lines.sort_unstable();
    lines.join("\n")
}

/// Build the signed headers list: canonical names, sorted, joined with `;`.
///
/// # Examples
///
/// ```
/// use rustbos_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(
///     build_signed_headers_string(&["Host", "Author", "x-bce-acl"]),
///     "author;host;x-bce-acl"
/// );
/// ```
#[must_use]
pub fn build_signed_headers_string(names: &[&str]) -> String {
    let mut names: Vec<String> = names.iter().map(|name| canonical_header_name(name)).collect();
    names.sort_unstable();
    names.join(";")
}

/// Trim, lowercase and encode a header name.
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    uri_encode(&name.trim().to_ascii_lowercase())
}

/// Percent-encode a string with the RFC 3986 unreserved rule (`%20` for space).
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_add_single_leading_slash() {
        assert_eq!(build_canonical_uri("/a/b"), build_canonical_uri("a/b"));
        assert_eq!(build_canonical_uri("///a/b"), "/a/b");
    }

    #[test]
    fn test_should_keep_slashes_literal_in_uri() {
        let uri = build_canonical_uri("/dir one/dir%2Ftwo/file.txt");
        assert_eq!(uri, "/dir%20one/dir%252Ftwo/file.txt");
        assert!(!uri.contains("%2F"));
    }

    #[test]
    fn test_should_encode_reserved_and_unicode_characters_in_uri() {
        assert_eq!(build_canonical_uri("/a+b=c&d"), "/a%2Bb%3Dc%26d");
        assert_eq!(build_canonical_uri("/-_.~"), "/-_.~");
        assert_eq!(build_canonical_uri("/文件.txt"), "/%E6%96%87%E4%BB%B6.txt");
    }

    #[test]
    fn test_should_preserve_trailing_slash() {
        assert_eq!(build_canonical_uri("/photos/"), "/photos/");
        assert_eq!(build_canonical_uri("/"), "/");
    }

    #[test]
    fn test_should_sort_query_parameters() {
        let query: QueryParams = [
            ("b", Some("2".to_owned())),
            ("a", Some("1".to_owned())),
            ("c", Some("3".to_owned())),
        ]
        .into_iter()
        .collect();
        assert_eq!(build_canonical_query_string(&query), "a=1&b=2&c=3");
    }

    #[test]
    fn test_should_write_bare_key_for_absent_value() {
        let query: QueryParams = [("x", None), ("acl", None), ("marker", Some("m".to_owned()))]
            .into_iter()
            .collect();
        assert_eq!(build_canonical_query_string(&query), "acl&marker=m&x");
    }

    #[test]
    fn test_should_distinguish_empty_value_from_absent_value() {
        let empty: QueryParams = [("x", Some(String::new()))].into_iter().collect();
        let absent: QueryParams = [("x", None)].into_iter().collect();
        assert_eq!(build_canonical_query_string(&empty), "x=");
        assert_eq!(build_canonical_query_string(&absent), "x");
    }

    #[test]
    fn test_should_sort_on_formatted_pair_not_key() {
        // '-' (0x2D) sorts before '=' (0x3D), so `a-b=...` precedes `a=...`.
        let query: QueryParams = [("a", Some("1".to_owned())), ("a-b", Some("2".to_owned()))]
            .into_iter()
            .collect();
        assert_eq!(build_canonical_query_string(&query), "a-b=2&a=1");
    }

    #[test]
    fn test_should_encode_query_keys_and_values() {
        let query: QueryParams = [("key name", Some("a/b c".to_owned()))].into_iter().collect();
        assert_eq!(build_canonical_query_string(&query), "key%20name=a%2Fb%20c");
    }

    #[test]
    fn test_should_return_empty_for_empty_query() {
        assert_eq!(build_canonical_query_string(&QueryParams::new()), "");
    }

    #[test]
    fn test_should_canonicalize_header_case_identically() {
        assert_eq!(
            build_canonical_headers(&[("Content-Type", "text/plain")]),
            build_canonical_headers(&[("content-type", "text/plain")])
        );
    }

    #[test]
    fn test_should_trim_and_encode_headers() {
        let result = build_canonical_headers(&[
            (" x-bce-meta-note ", "  hello world  "),
            ("Content-MD5", "1B2M2Y8AsgTpgAmY7PhCfg=="),
        ]);
        assert_eq!(
            result,
            "content-md5:1B2M2Y8AsgTpgAmY7PhCfg%3D%3D\nx-bce-meta-note:hello%20world"
        );
    }

    #[test]
    fn test_should_sort_headers_on_formatted_line() {
        let result = build_canonical_headers(&[("x-bce-a", "1"), ("x-bce-a-b", "2")]);
        // '-' sorts before ':' as well.
        assert_eq!(result, "x-bce-a-b:2\nx-bce-a:1");
    }

    #[test]
    fn test_should_build_empty_canonical_headers() {
        assert_eq!(build_canonical_headers(&[]), "");
    }

    #[test]
    fn test_should_build_canonical_request_in_fixed_order() {
        let query: QueryParams = [("acl", None)].into_iter().collect();
        let canonical = build_canonical_request(
            "PUT",
            "/bos_test.txt",
            &query,
            &[
                ("Host", "bucket.gz.bcebos.com"),
                ("x-bce-acl", "public-read"),
                ("Content-Length", "0"),
            ],
        );
        let expected = "PUT\n\
                        /bos_test.txt\n\
                        acl\n\
                        content-length:0\n\
                        host:bucket.gz.bcebos.com\n\
                        x-bce-acl:public-read";
        assert_eq!(canonical, expected);
    }

    #[test]
    fn test_should_use_method_verbatim() {
        let canonical = build_canonical_request("get", "/", &QueryParams::new(), &[]);
        assert_eq!(canonical, "get\n/\n\n");
    }

    #[test]
    fn test_should_build_signed_headers_string_sorted_and_lowercased() {
        assert_eq!(
            build_signed_headers_string(&["X-Bce-Date", "Host", "content-type"]),
            "content-type;host;x-bce-date"
        );
    }
}
