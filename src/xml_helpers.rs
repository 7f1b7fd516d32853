//! Shared XML helpers for reading and patching package parts.

use std::borrow::Cow;

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Extract an attribute whose qualified name ends in `:{local}` or equals `local`.
///
/// Used for `r:id`, where the prefix is chosen by the producing application.
pub fn attr_string_suffix(e: &BytesStart, local: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        let matches = key == local
            || (key.len() > local.len()
                && key.ends_with(local)
                && key.get(key.len() - local.len() - 1) == Some(&b':'));
        if matches {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Escape text so it can be placed inside element content.
///
/// Only `&`, `<` and `>` are escaped, which is how spreadsheet producers
/// write cell text.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(text)
}

/// Characters allowed in XML 1.0 content.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Whether `s` starts with an `_xHHHH_` escape sequence.
fn starts_with_hex_escape(s: &str) -> bool {
    matches!(
        s.as_bytes(),
        [b'_', b'x', a, b, c, d, b'_', ..]
            if [a, b, c, d].iter().all(|h| h.is_ascii_hexdigit())
    )
}

/// Escape a cell value for element content.
///
/// Like [`escape_text`], and additionally writes characters XML cannot hold
/// (control characters, `U+FFFE`, `U+FFFF`) as `_xHHHH_`. A literal `_` that
/// would otherwise read as such an escape is written as `_x005F_`.
pub fn escape_cell_text(text: &str) -> Cow<'_, str> {
    let escaped = escape_text(text);
    if escaped.chars().all(is_xml_char) && !escaped.contains("_x") {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for (idx, c) in escaped.char_indices() {
        if !is_xml_char(c) {
            out.push_str(&format!("_x{:04X}_", u32::from(c)));
        } else if c == '_' && escaped.get(idx..).is_some_and(starts_with_hex_escape) {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
