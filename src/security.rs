use regex::Regex;
use std::sync::LazyLock;

/// Permissive `local@domain.tld` shape. Deliberately not RFC 5322: one or more
/// non-space, non-`@` characters, an `@`, the same, a `.`, the same.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Check that a string looks like an email address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Escape the five HTML-significant characters and trim surrounding whitespace.
///
/// Not idempotent: a second application re-escapes the `&` of already-escaped
/// entities. Callers must sanitize exactly once per field, after validation,
/// since length bounds apply to the raw string.
pub fn sanitize_input(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped.trim().to_string()
}
