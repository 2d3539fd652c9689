//! Export of pairs and buckets to files

use crate::error::BrowserError;
use crate::format::stringify;
use crate::tree::{Forest, NodeId, PathKey, Resolved};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

fn write_file(path: &PathKey, target: &Path, bytes: &[u8]) -> Result<(), BrowserError> {
    fs::write(target, bytes).map_err(|source| BrowserError::Export {
        path: path.clone(),
        source,
    })
}

/// Write the raw value of the pair at `path` plus a trailing newline.
pub fn export_value(forest: &Forest, path: &PathKey, target: &Path) -> Result<(), BrowserError> {
    let pair = match forest.resolve(path) {
        Resolved::Pair(_, pair) => pair,
        Resolved::Bucket(..) => return Err(BrowserError::NotAPair(path.clone())),
        Resolved::NotFound => return Err(BrowserError::PathNotFound(path.clone())),
    };
    let mut bytes = pair.value.clone();
    bytes.push(b'\n');
    write_file(path, target, &bytes)?;
    info!(path = %path, target = %target.display(), bytes = bytes.len(), "Exported value");
    Ok(())
}

/// JSON document for the node at `path`.
///
/// A pair becomes `{"key": "value"}`; a bucket becomes an object of its
/// sub-buckets (nested objects) and pairs (strings).
pub fn to_json(forest: &Forest, path: &PathKey) -> Result<Value, BrowserError> {
    match forest.resolve(path) {
        Resolved::Pair(_, pair) => {
            let mut object = Map::new();
            object.insert(pair.key.clone(), Value::String(stringify(&pair.value)));
            Ok(Value::Object(object))
        }
        Resolved::Bucket(id, _) => Ok(bucket_json(forest, id)),
        Resolved::NotFound => Err(BrowserError::PathNotFound(path.clone())),
    }
}

fn bucket_json(forest: &Forest, id: NodeId) -> Value {
    let mut object = Map::new();
    if let Some(bucket) = forest.bucket(id) {
        for &child in &bucket.buckets {
            if let Some(sub) = forest.bucket(child) {
                object.insert(sub.name.clone(), bucket_json(forest, child));
            }
        }
        for &pair_id in &bucket.pairs {
            if let Some(pair) = forest.pair(pair_id) {
                object.insert(pair.key.clone(), Value::String(stringify(&pair.value)));
            }
        }
    }
    Value::Object(object)
}

/// Write the JSON document for `path` to `target`.
pub fn export_json(forest: &Forest, path: &PathKey, target: &Path) -> Result<(), BrowserError> {
    let document = to_json(forest, path)?;
    let text = serde_json::to_string(&document).map_err(|e| BrowserError::Export {
        path: path.clone(),
        source: e.into(),
    })?;
    write_file(path, target, text.as_bytes())?;
    info!(path = %path, target = %target.display(), "Exported JSON");
    Ok(())
}
