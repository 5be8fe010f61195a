//! End-to-end binding validation tests for the Kafka connector, driven
//! through the [`Connector`] trait against a mock cluster.

use freshet_connectors::config::ConnectorConfig;
use freshet_connectors::connector::Connector;
use freshet_connectors::error::ValidationError;
use freshet_connectors::kafka::config::CONFIG_WHITELISTED_CLUSTERS;
use freshet_connectors::kafka::KafkaConnector;
use freshet_connectors::testing::{mock_connector_config, mock_datastream, MockCluster};
use freshet_datastream::keys;

const BROKER: &str = "broker-1:9092";

fn connector_with(cluster: &MockCluster, extra: &[(&str, &str)]) -> KafkaConnector {
    let mut config: ConnectorConfig = mock_connector_config();
    for (k, v) in extra {
        config.set(*k, *v);
    }
    KafkaConnector::with_registry("test", &config, &cluster.registry()).unwrap()
}

#[test]
fn populates_partition_count() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let bound = connector.initialize_datastream(&ds, &[]).unwrap();

    assert_eq!(bound.source.partition_count, Some(1));
    // The caller's definition is untouched.
    assert_eq!(ds.source.partition_count, None);
}

#[test]
fn populates_default_serdes() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let bound = connector.initialize_datastream(&ds, &[]).unwrap();

    assert!(bound.destination.has_key_serde());
    assert_eq!(bound.destination.key_serde.as_deref(), Some("keySerde"));
    assert!(bound.destination.has_value_serde());
    assert_eq!(bound.destination.value_serde.as_deref(), Some("valueSerde"));
}

#[test]
fn preserves_caller_supplied_serdes() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.destination.key_serde = Some("json".to_string());

    let bound = connector.initialize_datastream(&ds, &[]).unwrap();
    assert_eq!(bound.destination.key_serde.as_deref(), Some("json"));
    assert_eq!(bound.destination.value_serde.as_deref(), Some("valueSerde"));
}

#[test]
fn rejects_nonexistent_topic() {
    let cluster = MockCluster::new();
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "never-created");
    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();

    assert!(matches!(err, ValidationError::TopicNotFound { .. }));
    assert_eq!(err.datastream(), "orders-mirror");
    assert!(!err.is_retryable());
}

#[test]
fn rejects_malformed_source() {
    let cluster = MockCluster::new();
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.source.connection_string = "not-a-kafka-uri".to_string();

    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();
    assert!(matches!(err, ValidationError::MalformedSource { .. }));
    // Grammar failures never reach the cluster.
    assert_eq!(cluster.lookup_count(), 0);
}

#[test]
fn rejects_non_whitelisted_cluster_before_any_lookup() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(
        &cluster,
        &[(CONFIG_WHITELISTED_CLUSTERS, "random-broker:2546")],
    );

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();

    match err {
        ValidationError::DisallowedCluster { brokers, .. } => {
            assert_eq!(brokers, BROKER);
        }
        other => panic!("expected DisallowedCluster, got {other}"),
    }
    assert_eq!(cluster.lookup_count(), 0);
}

#[test]
fn accepts_whitelisted_cluster() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let mut config = mock_connector_config();
    config.set(CONFIG_WHITELISTED_CLUSTERS, format!("other:1,{BROKER}"));
    let connector = KafkaConnector::with_registry("test", &config, &cluster.registry()).unwrap();

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    assert!(connector.initialize_datastream(&ds, &[]).is_ok());
}

#[test]
fn accepts_valid_start_position() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.set_metadata(keys::START_POSITION, r#"{"0": 100}"#);

    let bound = connector.initialize_datastream(&ds, &[]).unwrap();
    // The request rides along unchanged for the scheduling runtime.
    assert_eq!(
        bound.get_metadata(keys::START_POSITION),
        Some(r#"{"0": 100}"#)
    );
}

#[test]
fn rejects_start_position_for_unknown_partition() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.set_metadata(keys::START_POSITION, r#"{"5": 0}"#);

    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();
    match err {
        ValidationError::InvalidPartition {
            partition,
            partition_count,
            ..
        } => {
            assert_eq!(partition, 5);
            assert_eq!(partition_count, 1);
        }
        other => panic!("expected InvalidPartition, got {other}"),
    }
}

#[test]
fn rejects_negative_start_offset() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 2);
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.set_metadata(keys::START_POSITION, r#"{"1": -5}"#);

    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidOffset { offset: -5, .. }));
}

#[test]
fn rejects_malformed_start_position() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let mut ds = mock_datastream("orders-mirror", BROKER, "orders");
    ds.set_metadata(keys::START_POSITION, "earliest");

    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();
    assert!(matches!(err, ValidationError::MalformedStartPosition { .. }));
}

#[test]
fn surfaces_unreachable_cluster_as_retryable() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    cluster.set_reachable(false);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let err = connector.initialize_datastream(&ds, &[]).unwrap_err();

    assert!(matches!(err, ValidationError::Infrastructure { .. }));
    assert!(err.is_retryable());

    // The same definition binds once the cluster answers again.
    cluster.set_reachable(true);
    assert!(connector.initialize_datastream(&ds, &[]).is_ok());
}

#[test]
fn revalidation_is_idempotent() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 3);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let first = connector.initialize_datastream(&ds, &[]).unwrap();
    let second = connector.initialize_datastream(&ds, &[]).unwrap();
    assert_eq!(first, second);

    // Re-validating an already-bound definition starts from scratch and
    // reaches the same result.
    let rebound = connector.initialize_datastream(&first, &[]).unwrap();
    assert_eq!(rebound.source.partition_count, Some(3));
    assert_eq!(rebound, first);
}

#[test]
fn revalidation_picks_up_cluster_changes() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let first = connector.initialize_datastream(&ds, &[]).unwrap();
    assert_eq!(first.source.partition_count, Some(1));

    // Prior enrichment is not trusted: a repartitioned topic shows up.
    cluster.create_topic("orders", 4);
    let second = connector.initialize_datastream(&first, &[]).unwrap();
    assert_eq!(second.source.partition_count, Some(4));
}

#[test]
fn existing_definitions_do_not_affect_outcome() {
    let cluster = MockCluster::new();
    cluster.create_topic("orders", 1);
    let connector = connector_with(&cluster, &[]);

    let ds = mock_datastream("orders-mirror", BROKER, "orders");
    let existing = vec![
        mock_datastream("other-1", BROKER, "orders"),
        mock_datastream("other-2", BROKER, "clicks"),
    ];

    let with_existing = connector.initialize_datastream(&ds, &existing).unwrap();
    let without = connector.initialize_datastream(&ds, &[]).unwrap();
    assert_eq!(with_existing, without);
}
