//! Kafka connector configuration.
//!
//! [`KafkaConnectorConfig`] is the typed, immutable form of the
//! connector's [`ConnectorConfig`] options, parsed eagerly at connector
//! construction.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;

/// Serde identifier applied when the destination key serde is unset.
pub const CONFIG_DEFAULT_KEY_SERDE: &str = "default.key.serde";

/// Serde identifier applied when the destination value serde is unset.
pub const CONFIG_DEFAULT_VALUE_SERDE: &str = "default.value.serde";

/// Offset commit interval in milliseconds, passed through to the task
/// runtime unchanged. Must be a positive integer.
pub const CONFIG_COMMIT_INTERVAL_MS: &str = "commit.interval.ms";

/// Comma-separated `host:port` allow-list. Absent or empty means any
/// cluster may be used as a source.
pub const CONFIG_WHITELISTED_CLUSTERS: &str = "whitelisted.clusters";

/// Identifier of the metadata-client implementation to instantiate.
pub const CONFIG_METADATA_CLIENT_FACTORY: &str = "metadata.client.factory";

/// Prefix for pass-through properties handed to the metadata client's
/// underlying Kafka client configuration, prefix stripped.
pub const KAFKA_PROPERTY_PREFIX: &str = "kafka.";

const DEFAULT_COMMIT_INTERVAL_MS: u64 = 5_000;

/// Typed Kafka connector configuration.
///
/// Constructed once per connector instance and immutable thereafter.
#[derive(Debug, Clone)]
pub struct KafkaConnectorConfig {
    /// Default serde for record keys.
    pub default_key_serde: String,

    /// Default serde for record values.
    pub default_value_serde: String,

    /// Offset commit interval. Not consumed by binding validation; the
    /// scheduling runtime reads it off the connector.
    pub commit_interval: Duration,

    /// Exact `host:port` allow-list; empty means unrestricted.
    pub whitelisted_clusters: HashSet<String>,

    /// Metadata-client implementation identifier.
    pub metadata_client_factory: String,

    /// Pass-through properties for the metadata client.
    pub client_properties: HashMap<String, String>,
}

impl KafkaConnectorConfig {
    /// Parses a [`KafkaConnectorConfig`] from a [`ConnectorConfig`].
    ///
    /// Both serde defaults are required: they are what guarantees a bound
    /// datastream always carries non-empty serdes, whether or not the
    /// caller supplied its own.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError` if a required key is missing or a value
    /// is invalid.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        let default_key_serde = config.require(CONFIG_DEFAULT_KEY_SERDE)?.to_string();
        let default_value_serde = config.require(CONFIG_DEFAULT_VALUE_SERDE)?.to_string();

        let commit_interval_ms = config
            .get_parsed::<u64>(CONFIG_COMMIT_INTERVAL_MS)?
            .unwrap_or(DEFAULT_COMMIT_INTERVAL_MS);

        let whitelisted_clusters = config
            .get(CONFIG_WHITELISTED_CLUSTERS)
            .map(parse_cluster_list)
            .unwrap_or_default();

        let metadata_client_factory = config
            .get(CONFIG_METADATA_CLIENT_FACTORY)
            .unwrap_or(super::metadata::RDKAFKA_FACTORY)
            .to_string();

        let client_properties = config.properties_with_prefix(KAFKA_PROPERTY_PREFIX);

        let cfg = Self {
            default_key_serde,
            default_value_serde,
            commit_interval: Duration::from_millis(commit_interval_ms),
            whitelisted_clusters,
            metadata_client_factory,
            client_properties,
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Configuration` if the configuration is
    /// invalid.
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.default_key_serde.is_empty() {
            return Err(ConnectorError::Configuration(format!(
                "{CONFIG_DEFAULT_KEY_SERDE} cannot be empty"
            )));
        }
        if self.default_value_serde.is_empty() {
            return Err(ConnectorError::Configuration(format!(
                "{CONFIG_DEFAULT_VALUE_SERDE} cannot be empty"
            )));
        }
        if self.commit_interval.is_zero() {
            return Err(ConnectorError::Configuration(format!(
                "{CONFIG_COMMIT_INTERVAL_MS} must be a positive integer"
            )));
        }
        if self.metadata_client_factory.is_empty() {
            return Err(ConnectorError::Configuration(format!(
                "{CONFIG_METADATA_CLIENT_FACTORY} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Returns true if `brokers` is allowed by the whitelist: either the
    /// whitelist is empty, or at least one broker matches an entry
    /// exactly (case-sensitive `host:port` comparison).
    #[must_use]
    pub fn is_cluster_whitelisted<I, S>(&self, brokers: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.whitelisted_clusters.is_empty() {
            return true;
        }
        brokers
            .into_iter()
            .any(|b| self.whitelisted_clusters.contains(b.as_ref()))
    }
}

fn parse_cluster_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
