//! Text rendering helpers shared by the dump output and error context.

use core::fmt::Write as _;

/// Renders text as a double-quoted string with backslash escapes.
///
/// Quotes and backslashes are escaped, the common whitespace controls use
/// their short forms, and any other control character falls back to Rust's
/// default escape notation. Non-control characters pass through untouched so
/// UTF-8 payloads stay readable.
#[must_use]
pub fn quoted_escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                for escaped in c.escape_default() {
                    out.push(escaped);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a binary blob as a `0x`-prefixed lowercase hex string.
#[must_use]
pub fn hex_opaque(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Renders a multi-dimensional index tuple as a `[i][j]...` suffix.
#[must_use]
pub fn index_suffix(index: &[u64]) -> String {
    let mut out = String::new();
    for i in index {
        let _ = write!(out, "[{i}]");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(quoted_escaped(r#"say "hi"\now"#), r#""say \"hi\"\\now""#);
    }

    #[test]
    fn escapes_whitespace_controls() {
        assert_eq!(quoted_escaped("a\nb\tc"), "\"a\\nb\\tc\"");
    }

    #[test]
    fn passes_multibyte_text_through() {
        assert_eq!(quoted_escaped("héllo"), "\"héllo\"");
    }

    #[test]
    fn hex_uses_lowercase_nibbles() {
        assert_eq!(hex_opaque(&[0x00, 0x1f, 0xab]), "0x001fab");
        assert_eq!(hex_opaque(&[]), "0x");
    }

    #[test]
    fn index_suffix_stacks_dimensions() {
        assert_eq!(index_suffix(&[2, 3]), "[2][3]");
        assert_eq!(index_suffix(&[]), "");
    }
}
