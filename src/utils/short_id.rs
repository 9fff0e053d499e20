//! Short identifier extraction from submitted URLs.

/// Returns the final path segment of `input`, ignoring any query string,
/// fragment and trailing slashes.
///
/// Accepts both bare identifiers (`"abc123"`) and full short URLs
/// (`"https://s.example.com/abc123"`). Returns `None` when nothing is left.
pub fn extract_short_id(input: &str) -> Option<&str> {
    let end = input.find(['?', '#']).unwrap_or(input.len());

    input[..end]
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.ends_with(':'))
}
