//! Datastream definition types.
//!
//! A [`Datastream`] names a source topic on a partitioned log cluster and
//! a destination sink. Definitions are created by callers, validated and
//! enriched by a connector, and persisted by the registry as JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A logical request to move data from a source topic to a destination.
///
/// The definition a caller submits is incomplete: `source.partition_count`
/// and the destination serdes may be unset. The owning connector fills
/// them in during validation and returns a new, fully bound definition;
/// the caller's value is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datastream {
    /// Identifier, unique within the registry that owns this definition.
    pub name: String,

    /// Tag naming the connector that owns this definition. A connector
    /// only processes definitions whose tag equals its own type; routing
    /// by tag is the registry's job.
    pub connector_type: String,

    /// Where the data comes from.
    pub source: DatastreamSource,

    /// Where the data goes.
    pub destination: DatastreamDestination,

    /// Side-channel instructions, keyed by the constants in [`crate::keys`].
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Datastream {
    /// Creates a new datastream definition with empty metadata.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        connector_type: impl Into<String>,
        source: DatastreamSource,
        destination: DatastreamDestination,
    ) -> Self {
        Self {
            name: name.into(),
            connector_type: connector_type.into(),
            source,
            destination,
            metadata: HashMap::new(),
        }
    }

    /// Sets a metadata entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Gets a metadata entry.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// The source half of a datastream definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastreamSource {
    /// Connector-specific URI naming the cluster and topic, of the form
    /// `scheme://host1[:port1][,host2...]/topicName`. The owning connector
    /// defines and parses the grammar.
    pub connection_string: String,

    /// Number of partitions of the source topic. Populated by the
    /// connector during validation, never supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<u32>,
}

impl DatastreamSource {
    /// Creates a source with an unset partition count.
    #[must_use]
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            partition_count: None,
        }
    }
}

/// The destination half of a datastream definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastreamDestination {
    /// Opaque URI naming the destination sink. Not interpreted by source
    /// connectors.
    pub connection_string: String,

    /// Serde identifier for record keys. Filled from connector defaults
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_serde: Option<String>,

    /// Serde identifier for record values. Filled from connector defaults
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_serde: Option<String>,
}

impl DatastreamDestination {
    /// Creates a destination with both serdes unset.
    #[must_use]
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            key_serde: None,
            value_serde: None,
        }
    }

    /// Returns true if a non-empty key serde is set.
    #[must_use]
    pub fn has_key_serde(&self) -> bool {
        self.key_serde.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns true if a non-empty value serde is set.
    #[must_use]
    pub fn has_value_serde(&self) -> bool {
        self.value_serde.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    fn sample() -> Datastream {
        Datastream::new(
            "orders-mirror",
            "kafka",
            DatastreamSource::new("kafka://broker-1:9092/orders"),
            DatastreamDestination::new("fs:///data/orders"),
        )
    }

    #[test]
    fn test_new_leaves_enrichment_unset() {
        let ds = sample();
        assert_eq!(ds.source.partition_count, None);
        assert!(!ds.destination.has_key_serde());
        assert!(!ds.destination.has_value_serde());
        assert!(ds.metadata.is_empty());
    }

    #[test]
    fn test_metadata_roundtrip() {
        let mut ds = sample();
        ds.set_metadata(keys::START_POSITION, r#"{"0":100}"#);
        assert_eq!(
            ds.get_metadata(keys::START_POSITION),
            Some(r#"{"0":100}"#)
        );
        assert_eq!(ds.get_metadata("absent"), None);
    }

    #[test]
    fn test_empty_serde_does_not_count_as_set() {
        let mut ds = sample();
        ds.destination.key_serde = Some(String::new());
        assert!(!ds.destination.has_key_serde());
        ds.destination.key_serde = Some("avro".to_string());
        assert!(ds.destination.has_key_serde());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut ds = sample();
        ds.source.partition_count = Some(4);
        ds.destination.key_serde = Some("avro".to_string());

        let json = serde_json::to_string(&ds).unwrap();
        let back: Datastream = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn test_json_omits_unset_fields() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("partition_count"));
        assert!(!json.contains("key_serde"));
    }

    #[test]
    fn test_json_missing_optionals_deserialize() {
        let json = r#"{
            "name": "orders-mirror",
            "connector_type": "kafka",
            "source": { "connection_string": "kafka://broker-1:9092/orders" },
            "destination": { "connection_string": "fs:///data/orders" }
        }"#;
        let ds: Datastream = serde_json::from_str(json).unwrap();
        assert_eq!(ds.source.partition_count, None);
        assert!(ds.metadata.is_empty());
    }
}
