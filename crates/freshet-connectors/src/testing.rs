//! Testing utilities for connector implementations.
//!
//! Provides an in-memory stand-in for a Kafka cluster's metadata surface
//! plus builders for datastream definitions and connector configs, so
//! binding validation can be tested without a broker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use freshet_datastream::{Datastream, DatastreamDestination, DatastreamSource};
use parking_lot::Mutex;

use crate::config::ConnectorConfig;
use crate::error::MetadataClientError;
use crate::kafka::config::{
    CONFIG_DEFAULT_KEY_SERDE, CONFIG_DEFAULT_VALUE_SERDE, CONFIG_METADATA_CLIENT_FACTORY,
};
use crate::kafka::connection_string::BrokerAddress;
use crate::kafka::connector::CONNECTOR_TYPE;
use crate::kafka::metadata::{MetadataClientFactory, MetadataClientRegistry, TopicMetadataClient};

/// Identifier the mock metadata-client factory is registered under.
pub const MOCK_FACTORY: &str = "mock";

/// An in-memory cluster metadata surface.
///
/// Tests create topics with a chosen partition count, flip reachability
/// to simulate an unreachable cluster, and assert on the number of
/// metadata lookups performed. Cloning shares the same cluster state, so
/// a test can keep a handle while the connector holds another.
#[derive(Debug, Clone, Default)]
pub struct MockCluster {
    inner: Arc<ClusterState>,
}

#[derive(Debug, Default)]
struct ClusterState {
    topics: Mutex<HashMap<String, u32>>,
    lookups: AtomicU64,
    unreachable: AtomicBool,
}

impl MockCluster {
    /// Creates an empty, reachable cluster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or resizes) a topic with the given partition count.
    pub fn create_topic(&self, name: impl Into<String>, partitions: u32) {
        self.inner.topics.lock().insert(name.into(), partitions);
    }

    /// Deletes a topic.
    pub fn delete_topic(&self, name: &str) {
        self.inner.topics.lock().remove(name);
    }

    /// Makes subsequent metadata lookups fail with a transport error
    /// (`reachable = false`) or succeed again (`true`).
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.unreachable.store(!reachable, Ordering::Relaxed);
    }

    /// Number of metadata lookups served (or refused) so far.
    #[must_use]
    pub fn lookup_count(&self) -> u64 {
        self.inner.lookups.load(Ordering::Relaxed)
    }

    /// Returns a metadata-client factory backed by this cluster.
    ///
    /// The broker list and client properties are accepted and ignored;
    /// every created client answers from this cluster's state.
    #[must_use]
    pub fn factory(&self) -> MetadataClientFactory {
        let cluster = self.clone();
        Arc::new(
            move |_brokers: &[BrokerAddress], _properties: &HashMap<String, String>| {
                Ok(Box::new(MockMetadataClient {
                    cluster: cluster.clone(),
                }) as Box<dyn TopicMetadataClient>)
            },
        )
    }

    /// Returns a registry with this cluster registered under
    /// [`MOCK_FACTORY`].
    #[must_use]
    pub fn registry(&self) -> MetadataClientRegistry {
        let registry = MetadataClientRegistry::new();
        registry.register(MOCK_FACTORY, self.factory());
        registry
    }

    fn lookup(&self, topic: &str) -> Result<Option<u32>, MetadataClientError> {
        self.inner.lookups.fetch_add(1, Ordering::Relaxed);
        if self.inner.unreachable.load(Ordering::Relaxed) {
            return Err(MetadataClientError::Transport(
                "mock cluster unreachable".to_string(),
            ));
        }
        Ok(self.inner.topics.lock().get(topic).copied())
    }
}

/// Metadata client answering from a [`MockCluster`].
#[derive(Debug)]
pub struct MockMetadataClient {
    cluster: MockCluster,
}

impl TopicMetadataClient for MockMetadataClient {
    fn topic_exists(&self, topic: &str) -> Result<bool, MetadataClientError> {
        self.cluster.lookup(topic).map(|p| p.is_some())
    }

    fn partition_count(&self, topic: &str) -> Result<u32, MetadataClientError> {
        self.cluster
            .lookup(topic)?
            .ok_or_else(|| MetadataClientError::UnknownTopic(topic.to_string()))
    }
}

/// Builds a minimal Kafka-sourced datastream definition: no serdes, no
/// metadata, partition count unset.
#[must_use]
pub fn mock_datastream(name: &str, broker: &str, topic: &str) -> Datastream {
    Datastream::new(
        name,
        CONNECTOR_TYPE,
        DatastreamSource::new(format!("kafka://{broker}/{topic}")),
        DatastreamDestination::new("mock://sink"),
    )
}

/// Builds a connector config with serde defaults `keySerde`/`valueSerde`
/// and the metadata client pointed at [`MOCK_FACTORY`].
#[must_use]
pub fn mock_connector_config() -> ConnectorConfig {
    let mut config = ConnectorConfig::new(CONNECTOR_TYPE);
    config.set(CONFIG_DEFAULT_KEY_SERDE, "keySerde");
    config.set(CONFIG_DEFAULT_VALUE_SERDE, "valueSerde");
    config.set(CONFIG_METADATA_CLIENT_FACTORY, MOCK_FACTORY);
    config
}
