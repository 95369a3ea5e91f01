//! Query string and path decoding
//!
//! Form-style decoding: `+` is a space, `%XX` escapes are decoded and invalid
//! UTF-8 is replaced rather than rejected.

/// Percent-decode a URL component, replacing invalid UTF-8
pub fn percent_decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

/// Decode one `application/x-www-form-urlencoded` component
fn form_decode(raw: &str) -> String {
    percent_decode(&raw.replace('+', " "))
}

/// Parse a query string into decoded `(name, value)` pairs
///
/// Pairs without `=` and pairs with an empty value are dropped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (form_decode(name), form_decode(value)))
        .collect()
}

/// First non-empty value of `name`, if any
pub fn first_param(query: Option<&str>, name: &str) -> Option<String> {
    parse_query(query?)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, value)| value)
}
