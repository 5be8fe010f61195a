//! Well-known datastream metadata keys.
//!
//! Metadata entries under these keys carry side-channel instructions from
//! the caller to the owning connector.

/// Requested start position: a JSON object mapping partition index to the
/// offset consumption should begin at, e.g. `{"0": 100, "1": 0}`. Absent
/// means the connector's own default start policy applies.
pub const START_POSITION: &str = "system.start.position";
