//! The store collaborator interface.
//!
//! The reconciliation core never talks to an ontology backend directly; it
//! consumes this trait. For every facet family the trait offers a *query*
//! operation returning the store's current view of a ground entity and a
//! set of *mutation* operations the facet writers translate intents into.
//! Backends own their persistence format, locking discipline, and
//! reasoning; the core only reconciles declared facts with queried facts.

use thiserror::Error;

use crate::entity::Iri;
use crate::link::Literal;
use crate::restriction::Restriction;

/// A fault raised by the store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached at all.
    #[error("store unreachable: {0}")]
    Unreachable(String),
    /// The backend refused a mutation (e.g., opened read-only).
    #[error("store is read-only: {0}")]
    ReadOnly(String),
    /// Any other backend-reported failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The change handle returned by every store mutation.
///
/// `NoOperation` covers mutations the store recognized as already
/// satisfied (e.g., retracting an absent edge); it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeApplied {
    /// The store's state changed.
    Success,
    /// The mutation was a no-op.
    NoOperation,
}

impl From<bool> for ChangeApplied {
    /// Maps a "did the content change" flag (e.g.
    /// [`TypedSet::add`](crate::TypedSet::add)) onto a change handle.
    fn from(changed: bool) -> Self {
        if changed {
            ChangeApplied::Success
        } else {
            ChangeApplied::NoOperation
        }
    }
}

/// Edge-shaped facets: one directed axiom per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// Class/instance membership (`rdf:type` for individuals,
    /// class-assertion for classes).
    Type,
    /// Entities subsumed by the ground (`X subClassOf ground`).
    Sub,
    /// Entities subsuming the ground (`ground subClassOf X`).
    Super,
}

/// N-ary group facets: the store primitive asserts a *set* of mutually
/// disjoint/equivalent entities, not an ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKind {
    /// `owl:disjointWith` / `owl:AllDisjointClasses`-style groups.
    Disjoint,
    /// `owl:equivalentClass`-style groups.
    Equivalent,
}

/// Store operations consumed by the reconciliation core.
///
/// Object-safe: descriptors hold `&mut dyn OntologyStore` for the duration
/// of a read or write cycle. All operations are synchronous and blocking;
/// a call either returns or raises a [`StoreError`] the core surfaces
/// unchanged.
pub trait OntologyStore {
    /// Queries the entities related to `ground` through an edge facet.
    ///
    /// The result is raw store output: it may contain the ground itself or
    /// the `owl:Nothing` sentinel; the core filters those before
    /// reconciling.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the query cannot be answered.
    fn edges(&self, ground: &Iri, kind: EdgeKind) -> Result<Vec<Iri>, StoreError>;

    /// Asserts one edge axiom between `ground` and `other`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn assert_edge(
        &mut self,
        ground: &Iri,
        kind: EdgeKind,
        other: &Iri,
    ) -> Result<ChangeApplied, StoreError>;

    /// Retracts one edge axiom between `ground` and `other`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn retract_edge(
        &mut self,
        ground: &Iri,
        kind: EdgeKind,
        other: &Iri,
    ) -> Result<ChangeApplied, StoreError>;

    /// Queries the members grouped with `ground` under an n-ary facet.
    ///
    /// Raw store output; typically includes `ground` itself.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the query cannot be answered.
    fn group_members(&self, ground: &Iri, kind: GroupKind) -> Result<Vec<Iri>, StoreError>;

    /// Asserts an n-ary disjointness/equivalence group over `members`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn assert_group(&mut self, kind: GroupKind, members: &[Iri])
        -> Result<ChangeApplied, StoreError>;

    /// Retracts an n-ary disjointness/equivalence group over `members`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn retract_group(
        &mut self,
        kind: GroupKind,
        members: &[Iri],
    ) -> Result<ChangeApplied, StoreError>;

    /// Queries all object links of `ground` as (property, values) pairs.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the query cannot be answered.
    fn object_links(&self, ground: &Iri) -> Result<Vec<(Iri, Vec<Iri>)>, StoreError>;

    /// Queries all data links of `ground` as (property, values) pairs.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the query cannot be answered.
    fn data_links(&self, ground: &Iri) -> Result<Vec<(Iri, Vec<Literal>)>, StoreError>;

    /// Asserts one object-property assertion `(ground, property, value)`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn assert_object_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Iri,
    ) -> Result<ChangeApplied, StoreError>;

    /// Retracts one object-property assertion `(ground, property, value)`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn retract_object_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Iri,
    ) -> Result<ChangeApplied, StoreError>;

    /// Asserts one data-property assertion `(ground, property, value)`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn assert_data_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Literal,
    ) -> Result<ChangeApplied, StoreError>;

    /// Retracts one data-property assertion `(ground, property, value)`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn retract_data_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Literal,
    ) -> Result<ChangeApplied, StoreError>;

    /// Queries the conjunctive restriction groups defining `ground`.
    ///
    /// A well-formed entity yields at most one group; more than one is the
    /// ambiguity case handled per [`crate::diagnostics::AmbiguityPolicy`].
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the query cannot be answered.
    fn definition_groups(&self, ground: &Iri) -> Result<Vec<Vec<Restriction>>, StoreError>;

    /// Asserts one restriction conjunct on `ground`'s definition.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn assert_restriction(
        &mut self,
        ground: &Iri,
        restriction: &Restriction,
    ) -> Result<ChangeApplied, StoreError>;

    /// Retracts one restriction conjunct from `ground`'s definition.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn retract_restriction(
        &mut self,
        ground: &Iri,
        restriction: &Restriction,
    ) -> Result<ChangeApplied, StoreError>;

    /// Converts `ground`'s equivalence definition axiom (if any) into
    /// plain superclass assertions, unlocking the compound axiom so
    /// individual conjuncts can be retracted.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn unpack_definition(&mut self, ground: &Iri) -> Result<ChangeApplied, StoreError>;

    /// Converts `ground`'s plain superclass assertions back into a single
    /// equivalence definition axiom.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's fault if the mutation is refused.
    fn pack_definition(&mut self, ground: &Iri) -> Result<ChangeApplied, StoreError>;
}
