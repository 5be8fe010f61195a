//! Connector SDK error types.
//!
//! Provides the error hierarchy for connector operations:
//! - [`ConnectorError`]: construction-time failures (bad configuration)
//! - [`ValidationError`]: per-datastream binding failures, the umbrella
//!   "validation failed" signal whose variants are the precise taxonomy
//! - [`MetadataClientError`]: transport-level failures of the topic
//!   metadata client

use thiserror::Error;

/// Errors raised while constructing or configuring a connector.
///
/// Distinct from [`ValidationError`]: these are attributable to the
/// connector's own configuration, not to any datastream definition.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Required configuration key is missing.
    #[error("missing required config: {0}")]
    MissingConfig(String),

    /// A configuration value is present but invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// A datastream definition failed binding validation.
///
/// Every variant names the datastream it was raised for and the offending
/// field or value. All variants except [`Infrastructure`] are permanent:
/// re-submitting the same definition against the same cluster state fails
/// the same way. [`Infrastructure`] means the cluster could not be asked —
/// the caller may retry validation later instead of rejecting the
/// definition; see [`ValidationError::is_retryable`].
///
/// [`Infrastructure`]: ValidationError::Infrastructure
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The source connection string does not match the connector's grammar.
    #[error("datastream '{datastream}': malformed source connection string: {reason}")]
    MalformedSource {
        /// Name of the rejected datastream.
        datastream: String,
        /// What the grammar objected to.
        reason: String,
    },

    /// No broker in the source's address list is whitelisted.
    #[error("datastream '{datastream}': cluster [{brokers}] is not whitelisted")]
    DisallowedCluster {
        /// Name of the rejected datastream.
        datastream: String,
        /// The offending broker address list, comma-joined.
        brokers: String,
    },

    /// The source topic does not exist on the cluster.
    #[error("datastream '{datastream}': topic '{topic}' does not exist on the source cluster")]
    TopicNotFound {
        /// Name of the rejected datastream.
        datastream: String,
        /// The missing topic.
        topic: String,
    },

    /// The start-position metadata value is not a partition-to-offset map.
    #[error("datastream '{datastream}': malformed start position: {reason}")]
    MalformedStartPosition {
        /// Name of the rejected datastream.
        datastream: String,
        /// Why the value failed to parse.
        reason: String,
    },

    /// A start-position entry references a partition the topic does not have.
    #[error(
        "datastream '{datastream}': start position references partition {partition} \
         but topic has {partition_count} partitions"
    )]
    InvalidPartition {
        /// Name of the rejected datastream.
        datastream: String,
        /// The out-of-range partition index.
        partition: i32,
        /// The discovered partition count.
        partition_count: u32,
    },

    /// A start-position entry carries a negative offset.
    #[error(
        "datastream '{datastream}': start position offset {offset} for partition \
         {partition} is negative"
    )]
    InvalidOffset {
        /// Name of the rejected datastream.
        datastream: String,
        /// The partition the offset was given for.
        partition: i32,
        /// The negative offset.
        offset: i64,
    },

    /// The cluster could not be reached to answer metadata queries.
    #[error("datastream '{datastream}': cluster metadata unavailable: {source}")]
    Infrastructure {
        /// Name of the datastream being validated.
        datastream: String,
        /// The underlying transport failure.
        source: MetadataClientError,
    },
}

impl ValidationError {
    /// Returns the name of the datastream this error was raised for.
    #[must_use]
    pub fn datastream(&self) -> &str {
        match self {
            ValidationError::MalformedSource { datastream, .. }
            | ValidationError::DisallowedCluster { datastream, .. }
            | ValidationError::TopicNotFound { datastream, .. }
            | ValidationError::MalformedStartPosition { datastream, .. }
            | ValidationError::InvalidPartition { datastream, .. }
            | ValidationError::InvalidOffset { datastream, .. }
            | ValidationError::Infrastructure { datastream, .. } => datastream,
        }
    }

    /// Whether retrying validation later could succeed without changing
    /// the definition.
    ///
    /// Only infrastructure unavailability is retryable; every other
    /// variant is a permanent property of the definition's content.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ValidationError::Infrastructure { .. })
    }
}

/// Errors raised by a topic metadata client.
#[derive(Debug, Error)]
pub enum MetadataClientError {
    /// The client itself could not be constructed.
    #[error("failed to create metadata client: {0}")]
    ClientCreation(String),

    /// The cluster did not answer the metadata request.
    #[error("metadata request failed: {0}")]
    Transport(String),

    /// The topic was absent when a partition query required it to exist.
    #[error("unknown topic '{0}'")]
    UnknownTopic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_datastream() {
        let err = ValidationError::TopicNotFound {
            datastream: "orders-mirror".into(),
            topic: "orders".into(),
        };
        assert_eq!(err.datastream(), "orders-mirror");
        assert!(err.to_string().contains("orders-mirror"));
        assert!(err.to_string().contains("'orders'"));
    }

    #[test]
    fn test_only_infrastructure_is_retryable() {
        let infra = ValidationError::Infrastructure {
            datastream: "ds".into(),
            source: MetadataClientError::Transport("broker down".into()),
        };
        assert!(infra.is_retryable());

        let permanent = [
            ValidationError::MalformedSource {
                datastream: "ds".into(),
                reason: "no scheme".into(),
            },
            ValidationError::DisallowedCluster {
                datastream: "ds".into(),
                brokers: "b:1".into(),
            },
            ValidationError::TopicNotFound {
                datastream: "ds".into(),
                topic: "t".into(),
            },
            ValidationError::MalformedStartPosition {
                datastream: "ds".into(),
                reason: "not a map".into(),
            },
            ValidationError::InvalidPartition {
                datastream: "ds".into(),
                partition: 5,
                partition_count: 1,
            },
            ValidationError::InvalidOffset {
                datastream: "ds".into(),
                partition: 0,
                offset: -1,
            },
        ];
        for err in permanent {
            assert!(!err.is_retryable(), "{err} should be permanent");
        }
    }

    #[test]
    fn test_infrastructure_preserves_transport_cause() {
        let err = ValidationError::Infrastructure {
            datastream: "ds".into(),
            source: MetadataClientError::Transport("timed out".into()),
        };
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_connector_error_display() {
        let err = ConnectorError::MissingConfig("default.key.serde".into());
        assert_eq!(
            err.to_string(),
            "missing required config: default.key.serde"
        );
    }
}
