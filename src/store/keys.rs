//! Key and value encoding for nested buckets on one flat sled keyspace
//!
//! Each path segment is written as its UTF-8 bytes with `0x00` escaped to
//! `0x00 0xFF`, followed by the terminator `0x00 0x01`. Encoded keys sort in
//! lexical-by-segment path order, and every descendant of a bucket sorts after the
//! bucket and before its next sibling, so a plain ordered scan is a pre-order walk.
//!
//! Values carry a one-byte tag: [`BUCKET_TAG`] marks a bucket, [`VALUE_TAG`]
//! prefixes raw pair bytes.

use crate::error::StorageError;

pub const BUCKET_TAG: u8 = 0x00;
pub const VALUE_TAG: u8 = 0x01;

const ESCAPE: u8 = 0x00;
const ESCAPED_NUL: u8 = 0xFF;
const TERMINATOR: u8 = 0x01;

/// Decoded form of a stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Bucket,
    Value(Vec<u8>),
}

impl EntryKind {
    pub fn is_bucket(&self) -> bool {
        matches!(self, EntryKind::Bucket)
    }
}

fn push_segment(out: &mut Vec<u8>, segment: &str) {
    for &byte in segment.as_bytes() {
        if byte == ESCAPE {
            out.push(ESCAPE);
            out.push(ESCAPED_NUL);
        } else {
            out.push(byte);
        }
    }
    out.push(ESCAPE);
    out.push(TERMINATOR);
}

/// Encode a path into its storage key.
pub fn encode_path<S: AsRef<str>>(segments: &[S]) -> Vec<u8> {
    let mut out = Vec::with_capacity(segments.iter().map(|s| s.as_ref().len() + 2).sum());
    for segment in segments {
        push_segment(&mut out, segment.as_ref());
    }
    out
}

/// Encode `parent` + `name` without building an intermediate path.
pub fn encode_child<S: AsRef<str>>(parent: &[S], name: &str) -> Vec<u8> {
    let mut out = encode_path(parent);
    push_segment(&mut out, name);
    out
}

/// Decode a storage key into its path segments.
pub fn decode_path(key: &[u8]) -> Result<Vec<String>, StorageError> {
    let (segments, error) = decode_segments(key);
    match error {
        None if !segments.is_empty() => Ok(segments),
        None => Err(StorageError::InvalidData("empty key".to_string())),
        Some(message) => Err(StorageError::InvalidData(message)),
    }
}

/// Segments that decode cleanly before the first malformed byte.
///
/// Used to attribute an undecodable key to the deepest bucket it still names.
pub fn decodable_prefix(key: &[u8]) -> Vec<String> {
    decode_segments(key).0
}

fn decode_segments(key: &[u8]) -> (Vec<String>, Option<String>) {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut bytes = key.iter().copied();

    while let Some(byte) = bytes.next() {
        if byte != ESCAPE {
            current.push(byte);
            continue;
        }
        match bytes.next() {
            Some(ESCAPED_NUL) => current.push(ESCAPE),
            Some(TERMINATOR) => match String::from_utf8(std::mem::take(&mut current)) {
                Ok(segment) => segments.push(segment),
                Err(e) => return (segments, Some(format!("segment is not UTF-8: {}", e))),
            },
            Some(other) => {
                return (
                    segments,
                    Some(format!("unexpected escape sequence 0x00 0x{:02x}", other)),
                )
            }
            None => return (segments, Some("dangling escape byte".to_string())),
        }
    }

    if !current.is_empty() {
        return (segments, Some("unterminated segment".to_string()));
    }
    (segments, None)
}

pub fn encode_value(kind: &EntryKind) -> Vec<u8> {
    match kind {
        EntryKind::Bucket => vec![BUCKET_TAG],
        EntryKind::Value(bytes) => {
            let mut out = Vec::with_capacity(bytes.len() + 1);
            out.push(VALUE_TAG);
            out.extend_from_slice(bytes);
            out
        }
    }
}

pub fn decode_value(raw: &[u8]) -> Result<EntryKind, StorageError> {
    match raw.split_first() {
        Some((&BUCKET_TAG, [])) => Ok(EntryKind::Bucket),
        Some((&BUCKET_TAG, rest)) => Err(StorageError::InvalidData(format!(
            "bucket marker followed by {} stray bytes",
            rest.len()
        ))),
        Some((&VALUE_TAG, rest)) => Ok(EntryKind::Value(rest.to_vec())),
        Some((tag, _)) => Err(StorageError::InvalidData(format!(
            "unknown value tag 0x{:02x}",
            tag
        ))),
        None => Err(StorageError::InvalidData("empty value".to_string())),
    }
}
