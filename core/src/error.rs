//! Reconciliation error taxonomy.

use thiserror::Error;

use crate::changelog::ChangeLog;
use crate::entity::Iri;
use crate::facet::FacetKind;
use crate::store::StoreError;

/// A fault surfaced by a read or write cycle.
///
/// Store faults are never swallowed: a failed facet query means no intent
/// is computable and no write is attempted; a failed mutation aborts the
/// remaining facet work and carries the partial audit log of the
/// mutations that did land.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The store collaborator failed while fetching the current facet
    /// state. No reconciliation intent could be computed.
    #[error("query for {facet} facet of `{ground}` failed: {source}")]
    Query {
        /// The facet whose query failed.
        facet: FacetKind,
        /// The ground entity being synchronized.
        ground: Iri,
        /// The collaborator's fault.
        source: StoreError,
    },

    /// A store mutation failed mid-write. Remaining facet writes were
    /// aborted; `applied` records what had already been attempted.
    #[error("mutation for {facet} facet of `{ground}` failed: {source}")]
    Mutation {
        /// The facet whose mutation failed.
        facet: FacetKind,
        /// The ground entity being synchronized.
        ground: Iri,
        /// The collaborator's fault.
        source: StoreError,
        /// The partial audit log up to the fault.
        applied: ChangeLog,
    },

    /// The store reported more than one definition axiom group for the
    /// ground entity and the descriptor runs under
    /// [`AmbiguityPolicy::Strict`](crate::AmbiguityPolicy::Strict).
    #[error("`{ground}` carries {groups} definition axiom groups, expected at most one")]
    AmbiguousDefinition {
        /// The entity whose definition is ambiguous.
        ground: Iri,
        /// How many groups the store reported.
        groups: usize,
    },
}

impl SyncError {
    /// Returns the audit log of mutations attempted before the fault, if
    /// the fault occurred mid-write.
    #[must_use]
    pub fn partial_log(&self) -> Option<&ChangeLog> {
        match self {
            SyncError::Mutation { applied, .. } => Some(applied),
            _ => None,
        }
    }
}
