//! The Kafka source connection-string grammar.
//!
//! A Kafka source is addressed as
//! `kafka://host1[:port1][,host2...]/topicName`: the `kafka` scheme, an
//! ordered comma-separated broker list, and the topic as the path. This is
//! the one serialized artifact the connector owns — definitions carrying
//! it are persisted by the registry — so [`KafkaConnectionString`] is a
//! dedicated parser with its own error kind, and [`fmt::Display`]
//! reproduces the canonical form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Scheme prefix of a Kafka source connection string.
const SCHEME: &str = "kafka://";

/// Why a connection string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionStringError {
    /// The string does not start with `kafka://`.
    #[error("expected 'kafka://' scheme")]
    MissingScheme,

    /// The string has no `/topicName` path segment.
    #[error("no topic name: expected 'kafka://brokers/topicName'")]
    MissingTopic,

    /// The broker list between the scheme and the path is empty.
    #[error("empty broker list")]
    NoBrokers,

    /// A broker entry is empty or has an empty host.
    #[error("invalid broker address '{0}'")]
    InvalidBroker(String),

    /// A broker entry carries a non-numeric or out-of-range port.
    #[error("invalid port in broker address '{0}'")]
    InvalidPort(String),
}

/// A single broker endpoint, `host` with an optional `port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrokerAddress {
    /// Broker hostname or IP.
    pub host: String,

    /// Broker port, when the connection string carries one.
    pub port: Option<u16>,
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => write!(f, "{}", self.host),
        }
    }
}

impl FromStr for BrokerAddress {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = match s.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ConnectionStringError::InvalidPort(s.to_string()))?;
                (host, Some(port))
            }
            None => (s, None),
        };
        if host.is_empty() {
            return Err(ConnectionStringError::InvalidBroker(s.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

/// A parsed Kafka source connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConnectionString {
    /// Ordered, non-empty broker list.
    pub brokers: Vec<BrokerAddress>,

    /// Non-empty topic name.
    pub topic: String,
}

impl KafkaConnectionString {
    /// Returns the broker list in `host:port` display form, for logging
    /// and whitelist matching.
    #[must_use]
    pub fn broker_list(&self) -> String {
        let parts: Vec<String> = self.brokers.iter().map(ToString::to_string).collect();
        parts.join(",")
    }
}

impl fmt::Display for KafkaConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.broker_list(), self.topic)
    }
}

impl FromStr for KafkaConnectionString {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or(ConnectionStringError::MissingScheme)?;

        let (authority, topic) = rest
            .split_once('/')
            .ok_or(ConnectionStringError::MissingTopic)?;
        if topic.is_empty() {
            return Err(ConnectionStringError::MissingTopic);
        }
        if authority.is_empty() {
            return Err(ConnectionStringError::NoBrokers);
        }

        let brokers = authority
            .split(',')
            .map(BrokerAddress::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            brokers,
            topic: topic.to_string(),
        })
    }
}
