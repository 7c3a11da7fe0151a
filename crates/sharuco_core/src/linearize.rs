//! Reversible single-line encoding for submitted code.
//!
//! Line breaks are stored as two-character escapes so the persisted `code`
//! field never spans lines. The escape character itself is doubled, which
//! keeps input that already contains `\n` or `\\` sequences unambiguous.

const ESCAPE: char = '\\';

/// Encode `text` as a single line.
///
/// `\` becomes `\\`, LF becomes `\n`, CR becomes `\r`. Every other character,
/// including leading/trailing whitespace and tabs, passes through untouched.
pub fn linearize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Decode a value produced by [`linearize`] back into its original text.
///
/// Never fails. Escape sequences [`linearize`] cannot produce (for example
/// `\t`, or a lone trailing `\`) are kept verbatim so legacy rows written
/// without escaping still display as stored.
pub fn delinearize(stored: &str) -> String {
    let mut out = String::with_capacity(stored.len());
    let mut chars = stored.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => out.push(ESCAPE),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}
