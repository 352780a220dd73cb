//! Versioned on-disk snapshot of a key-value store.

use super::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// A stored value. Completion flags are booleans; the onboarding record
/// also keeps a country code string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Text(String),
}

/// Encoding used for snapshot files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Pretty JSON, readable and diffable
    #[default]
    Json,
    /// Compact bincode
    Binary,
}

/// Serializable image of every entry in a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,

    /// All entries, ordered by key
    pub entries: BTreeMap<String, StoredValue>,
}

impl Snapshot {
    pub fn new(entries: BTreeMap<String, StoredValue>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            entries,
        }
    }

    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>, StoreError> {
        match format {
            SnapshotFormat::Json => serde_json::to_vec_pretty(self)
                .map_err(|e| StoreError::SerializationFailed(e.to_string())),
            SnapshotFormat::Binary => bincode::serialize(&BinarySnapshot::from(self))
                .map_err(|e| StoreError::SerializationFailed(e.to_string())),
        }
    }

    /// Decode and validate a snapshot.
    pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Self, StoreError> {
        let snapshot = match format {
            SnapshotFormat::Json => serde_json::from_slice::<Snapshot>(bytes)
                .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?,
            SnapshotFormat::Binary => {
                let wire: BinarySnapshot = bincode::deserialize(bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Snapshot::from(wire)
            }
        };

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        Ok(snapshot)
    }
}

/// Bincode image of a [`Snapshot`].
///
/// Bincode cannot decode untagged enums, so values use the externally
/// tagged [`BinaryValue`].
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct BinarySnapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: Vec<(String, BinaryValue)>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum BinaryValue {
    Bool(bool),
    Text(String),
}

impl From<&StoredValue> for BinaryValue {
    fn from(value: &StoredValue) -> Self {
        match value {
            StoredValue::Bool(flag) => BinaryValue::Bool(*flag),
            StoredValue::Text(text) => BinaryValue::Text(text.clone()),
        }
    }
}

impl From<BinaryValue> for StoredValue {
    fn from(value: BinaryValue) -> Self {
        match value {
            BinaryValue::Bool(flag) => StoredValue::Bool(flag),
            BinaryValue::Text(text) => StoredValue::Text(text),
        }
    }
}

impl From<&Snapshot> for BinarySnapshot {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            version: snapshot.version,
            saved_at: snapshot.saved_at,
            entries: snapshot
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), BinaryValue::from(value)))
                .collect(),
        }
    }
}

impl From<BinarySnapshot> for Snapshot {
    fn from(wire: BinarySnapshot) -> Self {
        Self {
            version: wire.version,
            saved_at: wire.saved_at,
            entries: wire
                .entries
                .into_iter()
                .map(|(key, value)| (key, StoredValue::from(value)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut entries = BTreeMap::new();
        entries.insert("checkstate_v1_IT_cf".to_string(), StoredValue::Bool(true));
        entries.insert(
            "selectedCountryCode".to_string(),
            StoredValue::Text("IT".to_string()),
        );
        Snapshot::new(entries)
    }

    #[test]
    fn json_snapshot_keeps_values_plain() {
        let bytes = sample().encode(SnapshotFormat::Json).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"checkstate_v1_IT_cf\": true"));
        assert!(text.contains("\"selectedCountryCode\": \"IT\""));
    }

    #[test]
    fn binary_snapshot_decodes_to_same_entries() {
        let snapshot = sample();
        let bytes = snapshot.encode(SnapshotFormat::Binary).unwrap();
        let decoded = Snapshot::decode(&bytes, SnapshotFormat::Binary).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn binary_snapshot_stores_values_natively() {
        let bytes = sample().encode(SnapshotFormat::Binary).unwrap();
        let wire: BinarySnapshot = bincode::deserialize(&bytes).unwrap();

        assert_eq!(
            wire.entries,
            vec![
                (
                    "checkstate_v1_IT_cf".to_string(),
                    BinaryValue::Bool(true)
                ),
                (
                    "selectedCountryCode".to_string(),
                    BinaryValue::Text("IT".to_string())
                ),
            ]
        );
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut snapshot = sample();
        snapshot.version = 99;
        let bytes = serde_json::to_vec(&snapshot).unwrap();

        let result = Snapshot::decode(&bytes, SnapshotFormat::Json);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion {
                found: 99,
                supported: SNAPSHOT_VERSION
            })
        ));
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        let result = Snapshot::decode(b"{not json", SnapshotFormat::Json);
        assert!(matches!(result, Err(StoreError::DeserializationFailed(_))));
    }

    #[test]
    fn format_parses_from_lowercase_names() {
        let format: SnapshotFormat = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(format, SnapshotFormat::Binary);
        assert_eq!(SnapshotFormat::default(), SnapshotFormat::Json);
    }
}
