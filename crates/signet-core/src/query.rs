//! Deterministic query-string construction.
//!
//! Serialization preserves insertion order and always encodes the same way,
//! so built URLs are reproducible byte-for-byte.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Component encoding per RFC 3986: everything but unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Serialize the present fields as a percent-encoded query string.
///
/// Fields whose value is `None` are omitted entirely; the rest appear in the
/// order given.
pub fn build_query<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut out = String::new();
    for (key, value) in fields {
        let Some(value) = value else { continue };
        if !out.is_empty() {
            out.push('&');
        }
        out.extend(utf8_percent_encode(key, COMPONENT));
        out.push('=');
        out.extend(utf8_percent_encode(value, COMPONENT));
    }
    out
}

/// Append `query` to `url`, joining with `?` or `&` as appropriate.
///
/// An empty query leaves the URL untouched.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_owned();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let query = build_query([
            ("client_id", Some("abc")),
            ("redirect_uri", Some("http://example.com/login/callback")),
            ("scope", Some("user")),
            ("response_type", Some("code")),
            ("state", Some("state")),
        ]);
        assert_eq!(
            query,
            "client_id=abc&redirect_uri=http%3A%2F%2Fexample.com%2Flogin%2Fcallback&scope=user&response_type=code&state=state"
        );
    }

    #[test]
    fn omits_absent_fields() {
        let query = build_query([
            ("client_id", Some("abc")),
            ("scope", None),
            ("state", None),
        ]);
        assert_eq!(query, "client_id=abc");
    }

    #[test]
    fn encodes_spaces_as_percent_twenty() {
        let query = build_query([("scope", Some("openid email"))]);
        assert_eq!(query, "scope=openid%20email");
    }

    #[test]
    fn appends_with_question_mark() {
        assert_eq!(
            append_query("https://github.com/login/oauth/authorize", "a=1"),
            "https://github.com/login/oauth/authorize?a=1"
        );
    }

    #[test]
    fn appends_with_ampersand_when_query_exists() {
        assert_eq!(
            append_query(
                "https://accounts.google.com/o/oauth2/v2/auth?access_type=offline",
                "client_id=abc"
            ),
            "https://accounts.google.com/o/oauth2/v2/auth?access_type=offline&client_id=abc"
        );
    }

    #[test]
    fn empty_query_leaves_url_unchanged() {
        assert_eq!(
            append_query("https://auth.example.com/authorize", ""),
            "https://auth.example.com/authorize"
        );
    }
}
