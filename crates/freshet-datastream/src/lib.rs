//! # Freshet Datastream Model
//!
//! The shared data model for datastream definitions: a *datastream* is a
//! named request to move data from a source (a topic on a partitioned log
//! cluster) to a destination sink.
//!
//! Definitions are owned by an external registry; connectors receive them
//! for validation and enrichment. The model is plain serializable data —
//! all semantics (connection-string grammars, validation rules) live in
//! the connector crates.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Datastream definition types.
pub mod datastream;

/// Well-known datastream metadata keys.
pub mod keys;

pub use datastream::{Datastream, DatastreamDestination, DatastreamSource};
