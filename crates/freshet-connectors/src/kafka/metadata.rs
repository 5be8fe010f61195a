//! Topic metadata clients.
//!
//! Binding validation needs exactly two answers from a cluster: does a
//! topic exist, and how many partitions does it have. The
//! [`TopicMetadataClient`] trait captures that capability so the
//! orchestrator never names the transport; [`RdkafkaMetadataClient`] is
//! the production implementation, and tests substitute the mock cluster
//! from [`crate::testing`].
//!
//! Implementations are selected by identifier through a
//! [`MetadataClientRegistry`], resolved once at connector construction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};

use crate::error::{ConnectorError, MetadataClientError};
use crate::kafka::connection_string::BrokerAddress;

/// Identifier of the built-in `rdkafka`-backed implementation.
pub const RDKAFKA_FACTORY: &str = "rdkafka";

const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Answers topic existence and partition-layout queries for one cluster.
///
/// The broker list is bound at construction by the factory; methods take
/// only the topic. Implementations must be usable behind `&self` from
/// multiple threads. Lookups may block on network I/O for up to the
/// implementation's own metadata timeout — the orchestrator adds no
/// timeout of its own.
pub trait TopicMetadataClient: Send + Sync {
    /// Returns whether `topic` exists on the cluster.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataClientError::Transport`] if the cluster did not
    /// answer; absence of the topic is `Ok(false)`, not an error.
    fn topic_exists(&self, topic: &str) -> Result<bool, MetadataClientError>;

    /// Returns the number of partitions of `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataClientError::UnknownTopic`] if the topic does
    /// not exist, or [`MetadataClientError::Transport`] if the cluster
    /// did not answer.
    fn partition_count(&self, topic: &str) -> Result<u32, MetadataClientError>;
}

/// Factory capability constructing a [`TopicMetadataClient`] for a broker
/// list, with pass-through client properties.
pub type MetadataClientFactory = Arc<
    dyn Fn(
            &[BrokerAddress],
            &HashMap<String, String>,
        ) -> Result<Box<dyn TopicMetadataClient>, MetadataClientError>
        + Send
        + Sync,
>;

/// Registry of metadata-client implementations, keyed by identifier.
///
/// The connector configuration names an implementation
/// (`metadata.client.factory`); the connector resolves it here once at
/// construction. [`MetadataClientRegistry::with_defaults`] pre-registers
/// the `rdkafka` implementation; tests register mocks under their own
/// identifiers.
#[derive(Clone)]
pub struct MetadataClientRegistry {
    factories: Arc<RwLock<HashMap<String, MetadataClientFactory>>>,
}

impl MetadataClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a registry with the built-in implementations registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(
            RDKAFKA_FACTORY,
            Arc::new(
                |brokers: &[BrokerAddress], properties: &HashMap<String, String>| {
                    RdkafkaMetadataClient::new(brokers, properties)
                        .map(|client| Box::new(client) as Box<dyn TopicMetadataClient>)
                },
            ),
        );
        registry
    }

    /// Registers a factory under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, factory: MetadataClientFactory) {
        self.factories.write().insert(name.into(), factory);
    }

    /// Resolves a factory by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Configuration` if no factory is
    /// registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<MetadataClientFactory, ConnectorError> {
        self.factories.read().get(name).cloned().ok_or_else(|| {
            ConnectorError::Configuration(format!("unknown metadata client factory: '{name}'"))
        })
    }
}

impl Default for MetadataClientRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for MetadataClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.factories.read().keys().cloned().collect();
        f.debug_struct("MetadataClientRegistry")
            .field("factories", &names)
            .finish()
    }
}

/// Production metadata client over `rdkafka`.
///
/// Uses a plain [`BaseConsumer`] (no group membership) and single-topic
/// metadata requests. A topic entry carrying a broker-side error code is
/// treated as non-existent rather than as a transport failure.
pub struct RdkafkaMetadataClient {
    consumer: BaseConsumer,
    timeout: Duration,
}

impl RdkafkaMetadataClient {
    /// Creates a client for the given broker list.
    ///
    /// `properties` are forwarded verbatim to the underlying client
    /// configuration and may override its defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataClientError::ClientCreation`] if the underlying
    /// client rejects the configuration.
    pub fn new(
        brokers: &[BrokerAddress],
        properties: &HashMap<String, String>,
    ) -> Result<Self, MetadataClientError> {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", bootstrap_servers(brokers));
        for (key, value) in properties {
            config.set(key, value);
        }

        let consumer: BaseConsumer = config
            .create()
            .map_err(|e| MetadataClientError::ClientCreation(e.to_string()))?;

        Ok(Self {
            consumer,
            timeout: DEFAULT_METADATA_TIMEOUT,
        })
    }

    /// Fetches single-topic metadata, returning the partition count when
    /// the topic exists.
    #[allow(clippy::cast_possible_truncation)] // partition counts fit in u32
    fn lookup(&self, topic: &str) -> Result<Option<u32>, MetadataClientError> {
        let metadata = self
            .consumer
            .fetch_metadata(Some(topic), self.timeout)
            .map_err(|e| MetadataClientError::Transport(e.to_string()))?;

        Ok(metadata
            .topics()
            .iter()
            .find(|t| t.name() == topic && t.error().is_none())
            .map(|t| t.partitions().len() as u32))
    }
}

impl TopicMetadataClient for RdkafkaMetadataClient {
    fn topic_exists(&self, topic: &str) -> Result<bool, MetadataClientError> {
        self.lookup(topic).map(|partitions| partitions.is_some())
    }

    fn partition_count(&self, topic: &str) -> Result<u32, MetadataClientError> {
        self.lookup(topic)?
            .ok_or_else(|| MetadataClientError::UnknownTopic(topic.to_string()))
    }
}

impl std::fmt::Debug for RdkafkaMetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdkafkaMetadataClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn bootstrap_servers(brokers: &[BrokerAddress]) -> String {
    let parts: Vec<String> = brokers.iter().map(ToString::to_string).collect();
    parts.join(",")
}
