//! Per-facet synchronization handlers.
//!
//! Each semantic facet of a ground entity (membership, hierarchy,
//! disjointness/equivalence, links, restrictions) is handled by an
//! independent struct owning its held [`TypedSet`](crate::TypedSet) and
//! implementing the small [`Facet`] contract. A
//! [`Descriptor`](crate::Descriptor) combines handlers explicitly; there
//! is no inheritance between them.

pub mod hierarchy;
pub mod link;
pub mod membership;
pub mod peer;
pub mod restriction;

use std::fmt;

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::diagnostics::{AmbiguityPolicy, DiagnosticSink};
use crate::entity::Iri;
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::set::TypedSet;
use crate::store::{OntologyStore, StoreError};

pub use hierarchy::{Direction, HierarchyFacet};
pub use link::{DataLinkFacet, ObjectLinkFacet};
pub use membership::TypeFacet;
pub use peer::PeerFacet;
pub use restriction::RestrictionFacet;

/// Identifies the facet a change log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacetKind {
    /// Class/instance membership.
    Type,
    /// Entities subsumed by the ground.
    Sub,
    /// Entities subsuming the ground.
    Super,
    /// Pairwise disjointness.
    Disjoint,
    /// Pairwise equivalence.
    Equivalent,
    /// Object-property links.
    ObjectLink,
    /// Data-property links.
    DataLink,
    /// Compound definition restrictions.
    Restriction,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FacetKind::Type => "type",
            FacetKind::Sub => "sub",
            FacetKind::Super => "super",
            FacetKind::Disjoint => "disjoint",
            FacetKind::Equivalent => "equivalent",
            FacetKind::ObjectLink => "object-link",
            FacetKind::DataLink => "data-link",
            FacetKind::Restriction => "restriction",
        })
    }
}

/// Everything a handler needs for one read or write cycle.
pub struct SyncContext<'a> {
    /// The ground entity being synchronized.
    pub ground: &'a Iri,
    /// The store collaborator.
    pub store: &'a mut dyn OntologyStore,
    /// Receiver for non-fatal diagnostics.
    pub sink: &'a dyn DiagnosticSink,
    /// Policy for the multiple-definition-axiom case.
    pub policy: AmbiguityPolicy,
}

/// The contract every facet handler satisfies: own the held set, merge
/// store state into it on read, flush it to the store on write.
pub trait Facet {
    /// The facet this handler synchronizes.
    fn kind(&self) -> FacetKind;

    /// Queries the store and merges the result into the held set, so the
    /// held state converges to the store's. Idempotent and repeatable.
    ///
    /// # Errors
    ///
    /// [`SyncError::Query`] if the store query fails;
    /// [`SyncError::AmbiguousDefinition`] under the strict policy.
    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError>;

    /// Reconciles the held set against a fresh store query and applies the
    /// difference as store mutations.
    ///
    /// # Errors
    ///
    /// [`SyncError::Query`] if the fresh query fails (no mutation is
    /// attempted); [`SyncError::Mutation`] if a store call fails mid-way
    /// (carries the partial log).
    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError>;
}

/// Drops the ground's self-reference and the `owl:Nothing` sentinel from a
/// raw query result.
///
/// An entity is never its own super/sub/equivalent/disjoint member, even
/// when the store (or its reasoner) reports it that way.
pub(crate) fn strip_self_and_nothing(raw: Vec<Iri>, ground: &Iri) -> TypedSet<Iri> {
    raw.into_iter()
        .filter(|e| e != ground && !e.is_nothing())
        .collect()
}

/// Merges a queried entity set into the held set, logging one intent per
/// held-set change. After the merge the held set equals the queried set.
pub(crate) fn merge_entities(
    kind: FacetKind,
    held: &mut TypedSet<Iri>,
    queried: &TypedSet<Iri>,
) -> ChangeLog {
    let intent = reconcile(queried, held);
    let mut log = ChangeLog::new();
    for entity in &intent.to_add {
        let applied = held.add(entity.clone()).into();
        log.push(MappingIntent::added(
            kind,
            AxiomElement::Entity(entity.clone()),
            applied,
        ));
    }
    for entity in &intent.to_remove {
        let applied = held.remove(entity).into();
        log.push(MappingIntent::removed(
            kind,
            AxiomElement::Entity(entity.clone()),
            applied,
        ));
    }
    log
}

pub(crate) fn query_error(kind: FacetKind, ground: &Iri, source: StoreError) -> SyncError {
    SyncError::Query {
        facet: kind,
        ground: ground.clone(),
        source,
    }
}

pub(crate) fn mutation_error(
    kind: FacetKind,
    ground: &Iri,
    source: StoreError,
    applied: ChangeLog,
) -> SyncError {
    SyncError::Mutation {
        facet: kind,
        ground: ground.clone(),
        source,
        applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::vocab;

    #[test]
    fn strip_filters_self_and_bottom() {
        let ground = Iri::new("ex:Room");
        let raw = vec![
            Iri::new("ex:Location"),
            ground.clone(),
            vocab::nothing(),
            Iri::new("ex:Area"),
        ];
        let filtered = strip_self_and_nothing(raw, &ground);
        assert_eq!(filtered.len(), 2);
        assert!(!filtered.contains(&ground));
        assert!(!filtered.contains(&vocab::nothing()));
    }

    #[test]
    fn merge_converges_held_to_queried() {
        let queried: TypedSet<Iri> = [Iri::new("ex:B"), Iri::new("ex:C")].into_iter().collect();
        let mut held: TypedSet<Iri> = [Iri::new("ex:A"), Iri::new("ex:B")].into_iter().collect();
        let log = merge_entities(FacetKind::Super, &mut held, &queried);
        assert_eq!(held, queried.iter().cloned().collect::<TypedSet<Iri>>());
        // One add (C) and one remove (A), both applied.
        assert_eq!(log.len(), 2);
        assert_eq!(log.applied_count(), 2);
    }
}
