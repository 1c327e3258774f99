//! Content codec: durable byte representation and checksums.
//!
//! Records are stored as pretty-printed JSON. Checksums are SHA-256 over a
//! canonical serialization with every object's keys sorted, rendered as
//! lowercase hex and truncated to the configured display length, so equal
//! content yields equal checksums regardless of key insertion order.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{Result, VaultError};

/// Full length of a hex-encoded SHA-256 digest.
pub const MAX_CHECKSUM_LENGTH: usize = 64;

/// Default display length of a checksum.
pub const DEFAULT_CHECKSUM_LENGTH: usize = 16;

/// Serialize a record to its durable byte form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| VaultError::Serialization { source })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserialize a record. `path` names the source in the error.
///
/// Malformed bytes are fatal for the record being read; there is no partial
/// recovery.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| VaultError::CorruptContent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize with object keys sorted at every depth.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let value =
        serde_json::to_value(value).map_err(|source| VaultError::Serialization { source })?;
    serde_json::to_vec(&sort_keys(value)).map_err(|source| VaultError::Serialization { source })
}

/// Checksum of a value's canonical JSON, truncated to `length` hex chars.
pub fn checksum<T: Serialize>(value: &T, length: usize) -> Result<String> {
    let canonical = canonical_json(value)?;
    let digest = Sha256::digest(&canonical);
    let mut hex = hex::encode(digest);
    hex.truncate(length.clamp(1, MAX_CHECKSUM_LENGTH));
    Ok(hex)
}

// Rebuilt maps insert in sorted order, which holds whether or not
// serde_json preserves insertion order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, child) in entries {
                sorted.insert(key, sort_keys(child));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use vault_model::SnapshotContent;

    #[test]
    fn checksum_of_known_value() {
        // sha256("{}")
        let sum = checksum(&json!({}), MAX_CHECKSUM_LENGTH).unwrap();
        assert_eq!(
            sum,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        assert_eq!(checksum(&json!({}), 16).unwrap(), "44136fa355b3678a");
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [{"y": 1, "x": 2}]});
        let bytes = canonical_json(&value).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn decode_malformed_is_corrupt_content() {
        let path = PathBuf::from("landing/working/content.json");
        let result: Result<SnapshotContent> = decode(b"{not json", &path);
        match result {
            Err(VaultError::CorruptContent { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected CorruptContent, got {other:?}"),
        }
    }

    #[test]
    fn encode_then_decode_preserves_content() {
        let mut content = SnapshotContent::empty_with_default_palette();
        content.texts.insert("t1".into(), "안녕".into());
        let bytes = encode(&content).unwrap();
        let back: SnapshotContent = decode(&bytes, Path::new("x")).unwrap();
        assert_eq!(back, content);
    }

    proptest! {
        #[test]
        fn checksum_ignores_insertion_order(pairs in prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,12}"), 0..20)) {
            let forward: serde_json::Map<String, Value> = pairs
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let reversed: serde_json::Map<String, Value> = pairs
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            // Duplicate keys resolve last-wins, so compare against a map built the same way.
            let expected: BTreeMap<String, String> = pairs.iter().cloned().collect();
            let forward_sum = checksum(&Value::Object(forward), 16).unwrap();
            let expected_sum = checksum(&expected, 16).unwrap();
            prop_assert_eq!(&forward_sum, &expected_sum);
            let reversed_keys: BTreeMap<String, ()> = pairs.iter().map(|(k, _)| (k.clone(), ())).collect();
            if reversed_keys.len() == pairs.len() {
                prop_assert_eq!(checksum(&Value::Object(reversed), 16).unwrap(), forward_sum);
            }
        }
    }
}
