//! Child placeholders in table structure.
//!
//! The HTML parser moves text found directly in `<table>`, `<tbody>`, `<tr>` and
//! friends in front of the table. A placeholder standing for child content there
//! is wrapped in a comment, which the parser leaves in place, and unwrapped
//! again after printing.

use std::borrow::Cow;

use crate::placeholder::{token_len, PLACEHOLDER_BASE};

const TABLE_SCOPE: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "colgroup"];

const RAW_TEXT: &[&str] = &[
    "iframe", "noembed", "noframes", "plaintext", "script", "style", "textarea", "title", "xmp",
];

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Wraps the placeholders sitting directly in table structure into comments
pub fn guard_table_placeholders(html: &str) -> Cow<'_, str> {
    if !html.contains(PLACEHOLDER_BASE) {
        return Cow::Borrowed(html);
    }

    let mut out = String::new();
    let mut open: Vec<String> = Vec::new();
    let mut copied = 0;
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];

        if rest.starts_with(COMMENT_OPEN) {
            pos += rest
                .find(COMMENT_CLOSE)
                .map_or(rest.len(), |end| end + COMMENT_CLOSE.len());
            continue;
        }

        if let Some(tag) = scan_tag(rest) {
            pos += tag.len;

            if tag.closing {
                if let Some(idx) = open.iter().rposition(|name| *name == tag.name) {
                    open.truncate(idx);
                }
            } else if RAW_TEXT.contains(&tag.name.as_str()) {
                let close = format!("</{}", tag.name);
                pos += find_ignore_ascii_case(&html[pos..], &close).unwrap_or(html.len() - pos);
            } else if !tag.self_closing && !VOID.contains(&tag.name.as_str()) {
                open.push(tag.name);
            }
            continue;
        }

        let in_table = open
            .last()
            .is_some_and(|name| TABLE_SCOPE.contains(&name.as_str()));

        if in_table {
            if let Some(len) = token_len(rest) {
                out.push_str(&html[copied..pos]);
                out.push_str(COMMENT_OPEN);
                out.push_str(&rest[..len]);
                out.push_str(COMMENT_CLOSE);
                pos += len;
                copied = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if copied == 0 {
        return Cow::Borrowed(html);
    }

    out.push_str(&html[copied..]);
    Cow::Owned(out)
}

/// Turns `<!--{token}-->` back into `{token}`
pub fn unguard_placeholders(html: &str) -> Cow<'_, str> {
    let needle = format!("{COMMENT_OPEN}{PLACEHOLDER_BASE}");
    if !html.contains(needle.as_str()) {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find(needle.as_str()) {
        let after = &rest[pos + COMMENT_OPEN.len()..];

        match token_len(after).filter(|len| after[*len..].starts_with(COMMENT_CLOSE)) {
            Some(len) => {
                out.push_str(&rest[..pos]);
                out.push_str(&after[..len]);
                rest = &after[len + COMMENT_CLOSE.len()..];
            }
            None => {
                out.push_str(&rest[..pos + COMMENT_OPEN.len()]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Debug)]
struct Tag {
    /// Lowercase tag name
    name: String,
    /// Length of the whole tag, `<` to `>`
    len: usize,
    closing: bool,
    self_closing: bool,
}

/// Reads a start or end tag at the beginning of `input`
fn scan_tag(input: &str) -> Option<Tag> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }

    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }

    let mut i = name_start;
    while i < bytes.len() && !matches!(bytes[i], b'>' | b'/') && !bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let name = input[name_start..i].to_ascii_lowercase();

    let mut quote = None;
    let mut after_equals = false;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'>' => {
                    return Some(Tag {
                        name,
                        len: i + 1,
                        closing,
                        self_closing: bytes[i - 1] == b'/',
                    })
                }
                b'=' => after_equals = true,
                _ if b.is_ascii_whitespace() => {}
                _ => after_equals = false,
            },
        }
        i += 1;
    }

    None
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
