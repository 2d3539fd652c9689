//! Human-readable rendering of opaque keys and values

use crate::tree::path::{PathKey, DISPLAY_SEPARATOR};

fn is_printable(text: &str) -> bool {
    !text
        .chars()
        .any(|c| c < '\u{20}' || ('\u{7f}'..='\u{9f}').contains(&c))
}

/// Render bytes for display.
///
/// Printable UTF-8 is shown as text, exactly eight bytes as a big-endian `u64`,
/// anything else as lowercase hex.
pub fn stringify(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        if is_printable(text) {
            return text.to_string();
        }
    }
    if let Ok(word) = <[u8; 8]>::try_from(bytes) {
        return u64::from_be_bytes(word).to_string();
    }
    hex::encode(bytes)
}

/// Pretty-print JSON values with two-space indentation; otherwise [`stringify`].
pub fn format_value(bytes: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| stringify(bytes)),
        Err(_) => stringify(bytes),
    }
}

/// Path with every segment passed through [`stringify`].
pub fn format_path(path: &PathKey) -> String {
    path.segments()
        .iter()
        .map(|s| stringify(s.as_bytes()))
        .collect::<Vec<_>>()
        .join(DISPLAY_SEPARATOR)
}
