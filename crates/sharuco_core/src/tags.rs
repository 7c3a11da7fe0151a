//! Comma-separated tag parsing.

const SEPARATOR: char = ',';

/// Split a free-text tag field into ordered, discrete tags.
///
/// Tokens are trimmed. Empty tokens are dropped wherever they occur, so a
/// trailing separator (`"a,b,"`) and a doubled one (`"a,,b"`) both yield
/// `["a", "b"]`. Repeated tags keep their first position only. Absent or
/// blank input yields an empty list.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let mut tags: Vec<String> = Vec::new();
    for token in raw.split(SEPARATOR).map(str::trim) {
        if token.is_empty() || tags.iter().any(|existing| existing == token) {
            continue;
        }
        tags.push(token.to_string());
    }
    tags
}
