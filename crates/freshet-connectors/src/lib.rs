//! # Freshet Connectors
//!
//! The Connector SDK and the Kafka source connector for Freshet.
//!
//! A connector's job at registration time is *binding*: taking a logical
//! [`Datastream`](freshet_datastream::Datastream) definition and turning
//! it into a concrete, validated one — confirming the source topic exists,
//! discovering its partition layout, enforcing cluster policy, filling
//! serialization defaults, and checking caller-supplied start positions.
//! Binding either returns a new fully-enriched definition or a typed
//! [`ValidationError`](error::ValidationError); the input is never left
//! half-mutated.
//!
//! ## Modules
//!
//! - [`config`] - Key-value configuration connectors are constructed from
//! - [`connector`] - The `Connector` trait driven by the registry
//! - [`error`] - Error hierarchy (configuration, validation, metadata)
//! - [`kafka`] - The Kafka connector and its collaborators
//! - [`testing`] - Mock cluster and helpers for connector tests

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Connector error types.
pub mod error;

/// Connector configuration types.
pub mod config;

/// Core connector trait.
pub mod connector;

/// Kafka connector: connection-string grammar, topic metadata client,
/// start-position validation, and the binding orchestrator.
pub mod kafka;

/// Testing utilities (mock metadata cluster, datastream builders).
pub mod testing;
