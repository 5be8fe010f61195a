//! The Kafka binding-validation orchestrator.
//!
//! [`KafkaConnector`] sequences the binding checks for one datastream:
//! parse the source connection string, enforce the cluster whitelist,
//! confirm the topic and discover its partitions, fill serde defaults,
//! and check any requested start position. Steps run once each, in that
//! order, short-circuiting on the first failure; the whitelist gate runs
//! before any network access so unauthorized clusters are never
//! contacted.

use freshet_datastream::{keys, Datastream, DatastreamDestination};
use tracing::{debug, info, warn};

use crate::config::ConnectorConfig;
use crate::connector::Connector;
use crate::error::{ConnectorError, MetadataClientError, ValidationError};
use crate::kafka::config::KafkaConnectorConfig;
use crate::kafka::connection_string::KafkaConnectionString;
use crate::kafka::metadata::{MetadataClientFactory, MetadataClientRegistry};
use crate::kafka::start_position::{StartPositionError, StartPositions};

/// The connector type tag Kafka-sourced datastreams carry.
pub const CONNECTOR_TYPE: &str = "kafka";

/// Kafka source connector.
///
/// Holds no per-datastream state: a single instance may bind definitions
/// from multiple threads concurrently. A fresh metadata client is
/// constructed per call from the definition's own broker list.
pub struct KafkaConnector {
    name: String,
    config: KafkaConnectorConfig,
    metadata_clients: MetadataClientFactory,
}

impl std::fmt::Debug for KafkaConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaConnector")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KafkaConnector {
    /// Creates a connector using the built-in metadata-client
    /// implementations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError` if the configuration is invalid.
    pub fn new(name: impl Into<String>, config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        Self::with_registry(name, config, &MetadataClientRegistry::with_defaults())
    }

    /// Creates a connector resolving its metadata-client implementation
    /// from `registry`.
    ///
    /// The `metadata.client.factory` identifier is resolved here, once:
    /// a typo in the identifier is a construction failure, not a
    /// per-datastream one.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError` if the configuration is invalid or names
    /// an unregistered metadata-client implementation.
    pub fn with_registry(
        name: impl Into<String>,
        config: &ConnectorConfig,
        registry: &MetadataClientRegistry,
    ) -> Result<Self, ConnectorError> {
        let config = KafkaConnectorConfig::from_config(config)?;
        let metadata_clients = registry.resolve(&config.metadata_client_factory)?;
        Ok(Self {
            name: name.into(),
            config,
            metadata_clients,
        })
    }

    /// The connector instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed connector configuration.
    #[must_use]
    pub fn config(&self) -> &KafkaConnectorConfig {
        &self.config
    }
}

fn infrastructure(datastream: &str, source: MetadataClientError) -> ValidationError {
    ValidationError::Infrastructure {
        datastream: datastream.to_string(),
        source,
    }
}

impl Connector for KafkaConnector {
    fn connector_type(&self) -> &str {
        CONNECTOR_TYPE
    }

    fn initialize_datastream(
        &self,
        datastream: &Datastream,
        _all_datastreams: &[Datastream],
    ) -> Result<Datastream, ValidationError> {
        let name = datastream.name.as_str();
        debug!(connector = %self.name, datastream = name, "binding datastream");

        let source = datastream
            .source
            .connection_string
            .parse::<KafkaConnectionString>()
            .map_err(|e| ValidationError::MalformedSource {
                datastream: name.to_string(),
                reason: e.to_string(),
            })?;

        // Policy gate runs before any network access.
        if !self
            .config
            .is_cluster_whitelisted(source.brokers.iter().map(ToString::to_string))
        {
            warn!(
                datastream = name,
                brokers = %source.broker_list(),
                "source cluster not whitelisted"
            );
            return Err(ValidationError::DisallowedCluster {
                datastream: name.to_string(),
                brokers: source.broker_list(),
            });
        }

        let client = (self.metadata_clients)(&source.brokers, &self.config.client_properties)
            .map_err(|e| infrastructure(name, e))?;

        let topic = source.topic.as_str();
        let exists = client
            .topic_exists(topic)
            .map_err(|e| infrastructure(name, e))?;
        if !exists {
            return Err(ValidationError::TopicNotFound {
                datastream: name.to_string(),
                topic: topic.to_string(),
            });
        }

        let partition_count = match client.partition_count(topic) {
            Ok(count) => count,
            // Topic vanished between the existence and layout queries.
            Err(MetadataClientError::UnknownTopic(_)) => {
                return Err(ValidationError::TopicNotFound {
                    datastream: name.to_string(),
                    topic: topic.to_string(),
                });
            }
            Err(e) => return Err(infrastructure(name, e)),
        };
        debug!(datastream = name, topic, partition_count, "discovered partition layout");

        // All checks that can fail without the enriched copy are done;
        // build the copy, then run the start-position check against the
        // discovered layout. The caller's value is untouched either way.
        let mut bound = datastream.clone();
        bound.source.partition_count = Some(partition_count);
        apply_serde_defaults(&mut bound.destination, &self.config);

        if let Some(raw) = datastream.get_metadata(keys::START_POSITION) {
            let positions = StartPositions::from_json(raw).map_err(|e| {
                ValidationError::MalformedStartPosition {
                    datastream: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            positions
                .validate(partition_count)
                .map_err(|e| match e {
                    StartPositionError::InvalidPartition {
                        partition,
                        partition_count,
                    } => ValidationError::InvalidPartition {
                        datastream: name.to_string(),
                        partition,
                        partition_count,
                    },
                    StartPositionError::InvalidOffset { partition, offset } => {
                        ValidationError::InvalidOffset {
                            datastream: name.to_string(),
                            partition,
                            offset,
                        }
                    }
                })?;
            debug!(
                datastream = name,
                partitions = positions.len(),
                "start position accepted"
            );
        }

        info!(
            connector = %self.name,
            datastream = name,
            topic,
            partition_count,
            "datastream bound"
        );
        Ok(bound)
    }
}

/// Fills unset destination serdes from the configured defaults.
///
/// Caller-supplied serdes are never overwritten; an empty string counts
/// as unset.
fn apply_serde_defaults(destination: &mut DatastreamDestination, config: &KafkaConnectorConfig) {
    if !destination.has_key_serde() {
        destination.key_serde = Some(config.default_key_serde.clone());
    }
    if !destination.has_value_serde() {
        destination.value_serde = Some(config.default_value_serde.clone());
    }
}
