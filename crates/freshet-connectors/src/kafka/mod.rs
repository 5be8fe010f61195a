//! Kafka source connector for Freshet.
//!
//! Binds datastream definitions whose source is a Kafka topic. At
//! registration time [`KafkaConnector`] parses the source connection
//! string, enforces the configured cluster whitelist, confirms the topic
//! exists and discovers its partition layout through a
//! [`TopicMetadataClient`], fills destination serde defaults, and checks
//! any caller-supplied start position against the discovered partitions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use freshet_connectors::config::ConnectorConfig;
//! use freshet_connectors::connector::Connector;
//! use freshet_connectors::kafka::KafkaConnector;
//!
//! let mut config = ConnectorConfig::new("kafka");
//! config.set("default.key.serde", "bytes");
//! config.set("default.value.serde", "avro");
//!
//! let connector = KafkaConnector::new("kafka-ingest", &config)?;
//! let bound = connector.initialize_datastream(&datastream, &existing)?;
//! ```
//!
//! [`TopicMetadataClient`]: metadata::TopicMetadataClient

pub mod config;
pub mod connection_string;
pub mod connector;
pub mod metadata;
pub mod start_position;

pub use config::KafkaConnectorConfig;
pub use connection_string::{BrokerAddress, KafkaConnectionString};
pub use connector::KafkaConnector;
pub use metadata::{MetadataClientRegistry, TopicMetadataClient};
pub use start_position::StartPositions;
