// @module: Word token classification and text escaping

/// Glyphs that attach to the preceding word without a space
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ':', ';', '…', '"', '\'', '“', '”', '‘', '’', ')', ']', '}', '-', '–', '—',
];

/// Whether a trimmed token consists only of punctuation glyphs.
///
/// An empty token is not punctuation.
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| PUNCTUATION.contains(&c))
}

/// Whether a space goes in front of `token` when it is appended to a line
pub fn needs_leading_space(token: &str, is_first: bool) -> bool {
    !is_first && !is_punctuation(token)
}

/// Join tokens into a display line using the punctuation spacing rule.
///
/// Tokens are trimmed and empty ones are skipped.
pub fn join_tokens<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut line = String::new();
    for token in tokens.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if needs_leading_space(token, line.is_empty()) {
            line.push(' ');
        }
        line.push_str(token);
    }
    line
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for an ASS dialogue line.
///
/// Braces would open override blocks and a backslash could form `\N` or
/// `\h`, so backslashes are followed by a word joiner and braces are
/// backslash-escaped.
pub fn escape_ass_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in normalize_whitespace(text).chars() {
        match c {
            '\\' => escaped.push_str("\\\u{2060}"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            _ => escaped.push(c),
        }
    }
    escaped
}
