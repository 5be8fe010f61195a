//! Core connector trait.
//!
//! The registry that owns datastream definitions drives connectors
//! through this seam: it routes each definition to the connector whose
//! type matches the definition's `connector_type` tag, then asks that
//! connector to bind it.

use freshet_datastream::Datastream;

use crate::error::ValidationError;

/// A connector capable of binding datastream definitions.
///
/// Binding is one-shot and synchronous: it validates and enriches a
/// single definition at registration time. It performs no ongoing
/// consumption and no retries — retry policy belongs to the caller, which
/// can distinguish retryable failures via
/// [`ValidationError::is_retryable`]. Calls for different definitions may
/// run concurrently; implementations hold no per-call mutable state.
pub trait Connector: Send + Sync {
    /// The connector type tag this connector processes. Definitions whose
    /// `connector_type` differs are not this connector's to bind; routing
    /// by tag is the registry's responsibility.
    fn connector_type(&self) -> &str;

    /// Validates `datastream` and returns a new, fully bound copy.
    ///
    /// On success the returned definition carries everything the
    /// scheduling runtime needs (discovered partition count, resolved
    /// serdes). The input is never mutated, so a failed call leaves no
    /// partial enrichment behind; callers swap in the returned value
    /// atomically.
    ///
    /// `all_datastreams` is the ordered set of definitions already known
    /// to the registry, supplied for cross-definition checks.
    ///
    /// Re-validating an already-bound definition starts from scratch:
    /// prior enrichment is not trusted, and the outcome is a pure
    /// function of the definition, the cluster state, and the connector
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first failed check.
    fn initialize_datastream(
        &self,
        datastream: &Datastream,
        all_datastreams: &[Datastream],
    ) -> Result<Datastream, ValidationError>;
}
