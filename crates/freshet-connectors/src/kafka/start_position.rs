//! Caller-requested start positions.
//!
//! A datastream may carry a start position in its metadata (under
//! [`freshet_datastream::keys::START_POSITION`]): a JSON object mapping
//! partition index to the offset consumption should begin at. The
//! connector validates the request against the discovered partition
//! layout at binding time; honoring it is the scheduling runtime's job.

use std::collections::BTreeMap;

use thiserror::Error;

/// A start-position entry that cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartPositionError {
    /// The entry references a partition outside `0..partition_count`.
    #[error("partition {partition} out of range for topic with {partition_count} partitions")]
    InvalidPartition {
        /// The out-of-range partition index.
        partition: i32,
        /// The topic's discovered partition count.
        partition_count: u32,
    },

    /// The entry carries a negative offset.
    #[error("negative offset {offset} for partition {partition}")]
    InvalidOffset {
        /// The partition the offset was given for.
        partition: i32,
        /// The negative offset.
        offset: i64,
    },
}

/// A parsed per-partition start-position request.
///
/// Kept sorted by partition index so validation reports the lowest
/// offending partition deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartPositions {
    offsets: BTreeMap<i32, i64>,
}

impl StartPositions {
    /// Parses the JSON encoding, e.g. `{"0": 100, "1": 0}`.
    ///
    /// Parsing accepts any integer keys and offsets; range checks happen
    /// in [`StartPositions::validate`] once the partition count is known.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error if the value is not an object
    /// of integer keys to integer offsets.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let offsets: BTreeMap<i32, i64> = serde_json::from_str(raw)?;
        Ok(Self { offsets })
    }

    /// Checks every entry against the discovered partition layout.
    ///
    /// Entries are checked in ascending partition order; the first
    /// violation wins. For a single entry, the partition range check
    /// precedes the offset sign check.
    ///
    /// # Errors
    ///
    /// Returns [`StartPositionError`] for the first unsatisfiable entry.
    pub fn validate(&self, partition_count: u32) -> Result<(), StartPositionError> {
        for (&partition, &offset) in &self.offsets {
            if partition < 0 || i64::from(partition) >= i64::from(partition_count) {
                return Err(StartPositionError::InvalidPartition {
                    partition,
                    partition_count,
                });
            }
            if offset < 0 {
                return Err(StartPositionError::InvalidOffset { partition, offset });
            }
        }
        Ok(())
    }

    /// Returns the requested offset for a partition, if any.
    #[must_use]
    pub fn offset(&self, partition: i32) -> Option<i64> {
        self.offsets.get(&partition).copied()
    }

    /// Returns the number of partitions with a requested offset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if no offsets were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterates entries in ascending partition order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i64)> + '_ {
        self.offsets.iter().map(|(&p, &o)| (p, o))
    }
}
