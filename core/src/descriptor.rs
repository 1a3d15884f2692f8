//! Descriptors: stateful views of one ground entity.
//!
//! A [`Descriptor`] is bound to one named entity in the store and owns one
//! facet handler per semantic facet it was built with. Concrete
//! per-entity-kind descriptors are thin instantiations: a class descriptor
//! mounts hierarchy + disjointness + restrictions, an individual
//! descriptor mounts types + links, and so on.
//!
//! # Lifecycle
//!
//! The usual caller-driven sequence is *Unbound* (freshly built, held sets
//! empty) → *Read* ([`read_axioms`](Descriptor::read_axioms) populated the
//! held sets) → *Modified* (local adds/removes diverged from the last
//! read) → *Written* ([`write_axioms`](Descriptor::write_axioms) flushed),
//! often followed by a re-read after the store reasons ("write, reason,
//! read"). None of this is enforced: the states are caller discipline,
//! not engine invariants, and every operation is valid in every state.

use std::sync::Arc;

use crate::changelog::ChangeLog;
use crate::diagnostics::{AmbiguityPolicy, DiagnosticSink, TracingSink};
use crate::entity::Iri;
use crate::error::SyncError;
use crate::facet::{
    DataLinkFacet, Direction, Facet, HierarchyFacet, ObjectLinkFacet, PeerFacet, RestrictionFacet,
    SyncContext, TypeFacet,
};
use crate::link::{Link, Literal};
use crate::restriction::Restriction;
use crate::set::TypedSet;
use crate::store::{GroupKind, OntologyStore};

/// A stateful object keeping one ground entity's facets in sync with the
/// store.
///
/// Built via [`Descriptor::for_ground`]; facets not mounted at build time
/// are simply skipped by both cycles. Synchronous and single-threaded:
/// each cycle blocks on the store and returns before the next step runs.
/// Multiple descriptors bound to the same ground are not coordinated.
pub struct Descriptor {
    ground: Iri,
    policy: AmbiguityPolicy,
    sink: Arc<dyn DiagnosticSink>,
    types: Option<TypeFacet>,
    subs: Option<HierarchyFacet>,
    supers: Option<HierarchyFacet>,
    disjoints: Option<PeerFacet>,
    equivalents: Option<PeerFacet>,
    object_links: Option<ObjectLinkFacet>,
    data_links: Option<DataLinkFacet>,
    restrictions: Option<RestrictionFacet>,
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("ground", &self.ground)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Descriptor {
    /// Starts building a descriptor bound to the given ground entity.
    #[must_use]
    pub fn for_ground(ground: impl Into<Iri>) -> DescriptorBuilder {
        DescriptorBuilder {
            ground: ground.into(),
            policy: AmbiguityPolicy::default(),
            sink: Arc::new(TracingSink),
            types: false,
            subs: false,
            supers: false,
            disjoints: false,
            equivalents: false,
            object_links: false,
            data_links: false,
            restrictions: false,
        }
    }

    /// The ground entity this descriptor represents.
    #[must_use]
    pub fn ground(&self) -> &Iri {
        &self.ground
    }

    /// Queries every mounted facet and merges the results into the held
    /// sets, so held state converges to the store's. Idempotent and
    /// repeatable. The returned log documents what the read observed, in
    /// the same shape writes use.
    ///
    /// # Errors
    ///
    /// Propagates the first facet's [`SyncError`]; later facets are not
    /// read.
    pub fn read_axioms(&mut self, store: &mut dyn OntologyStore) -> Result<ChangeLog, SyncError> {
        let ground = self.ground.clone();
        let sink = Arc::clone(&self.sink);
        let policy = self.policy;
        let mut log = ChangeLog::new();
        for facet in self.read_order() {
            let mut ctx = SyncContext {
                ground: &ground,
                store: &mut *store,
                sink: sink.as_ref(),
                policy,
            };
            log.extend(facet.read(&mut ctx)?);
        }
        Ok(log)
    }

    /// Flushes every mounted facet's held state to the store: each facet
    /// re-queries, diffs, and applies the difference.
    ///
    /// The restriction facet runs first: re-deriving the compound
    /// definition rewrites super-class edges, so it must precede the
    /// hierarchy facet when both are mounted.
    ///
    /// # Errors
    ///
    /// Propagates the first facet's [`SyncError`]; remaining facet writes
    /// are aborted. A mid-write fault carries the partial log via
    /// [`SyncError::partial_log`].
    pub fn write_axioms(&mut self, store: &mut dyn OntologyStore) -> Result<ChangeLog, SyncError> {
        let ground = self.ground.clone();
        let sink = Arc::clone(&self.sink);
        let policy = self.policy;
        let mut log = ChangeLog::new();
        for facet in self.write_order() {
            let mut ctx = SyncContext {
                ground: &ground,
                store: &mut *store,
                sink: sink.as_ref(),
                policy,
            };
            match facet.write(&mut ctx) {
                Ok(part) => log.extend(part),
                // A mid-write fault must surface with everything the whole
                // cycle attempted, not just the failing facet's part.
                Err(SyncError::Mutation {
                    facet,
                    ground,
                    source,
                    applied,
                }) => {
                    log.extend(applied);
                    return Err(SyncError::Mutation {
                        facet,
                        ground,
                        source,
                        applied: log,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(log)
    }

    fn read_order(&mut self) -> Vec<&mut dyn Facet> {
        let mut order: Vec<&mut dyn Facet> = Vec::new();
        if let Some(f) = self.types.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.subs.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.supers.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.disjoints.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.equivalents.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.object_links.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.data_links.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.restrictions.as_mut() {
            order.push(f);
        }
        order
    }

    fn write_order(&mut self) -> Vec<&mut dyn Facet> {
        let mut order: Vec<&mut dyn Facet> = Vec::new();
        // Restrictions first: the compound rewrite must settle before any
        // facet that diffs against super/sub-class edges.
        if let Some(f) = self.restrictions.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.types.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.subs.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.supers.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.disjoints.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.equivalents.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.object_links.as_mut() {
            order.push(f);
        }
        if let Some(f) = self.data_links.as_mut() {
            order.push(f);
        }
        order
    }

    /// Held membership set, if the facet is mounted.
    #[must_use]
    pub fn types(&self) -> Option<&TypedSet<Iri>> {
        self.types.as_ref().map(TypeFacet::held)
    }

    /// Mutable held membership set, if the facet is mounted.
    pub fn types_mut(&mut self) -> Option<&mut TypedSet<Iri>> {
        self.types.as_mut().map(TypeFacet::held_mut)
    }

    /// Held sub-entity set, if the facet is mounted.
    #[must_use]
    pub fn subs(&self) -> Option<&TypedSet<Iri>> {
        self.subs.as_ref().map(HierarchyFacet::held)
    }

    /// Mutable held sub-entity set, if the facet is mounted.
    pub fn subs_mut(&mut self) -> Option<&mut TypedSet<Iri>> {
        self.subs.as_mut().map(HierarchyFacet::held_mut)
    }

    /// Held super-entity set, if the facet is mounted.
    #[must_use]
    pub fn supers(&self) -> Option<&TypedSet<Iri>> {
        self.supers.as_ref().map(HierarchyFacet::held)
    }

    /// Mutable held super-entity set, if the facet is mounted.
    pub fn supers_mut(&mut self) -> Option<&mut TypedSet<Iri>> {
        self.supers.as_mut().map(HierarchyFacet::held_mut)
    }

    /// Held disjoint-peer set, if the facet is mounted.
    #[must_use]
    pub fn disjoints(&self) -> Option<&TypedSet<Iri>> {
        self.disjoints.as_ref().map(PeerFacet::held)
    }

    /// Mutable held disjoint-peer set, if the facet is mounted.
    pub fn disjoints_mut(&mut self) -> Option<&mut TypedSet<Iri>> {
        self.disjoints.as_mut().map(PeerFacet::held_mut)
    }

    /// Held equivalent-peer set, if the facet is mounted.
    #[must_use]
    pub fn equivalents(&self) -> Option<&TypedSet<Iri>> {
        self.equivalents.as_ref().map(PeerFacet::held)
    }

    /// Mutable held equivalent-peer set, if the facet is mounted.
    pub fn equivalents_mut(&mut self) -> Option<&mut TypedSet<Iri>> {
        self.equivalents.as_mut().map(PeerFacet::held_mut)
    }

    /// Held object-link set, if the facet is mounted.
    #[must_use]
    pub fn object_links(&self) -> Option<&TypedSet<Link<Iri>>> {
        self.object_links.as_ref().map(ObjectLinkFacet::held)
    }

    /// Mutable held object-link set, if the facet is mounted.
    pub fn object_links_mut(&mut self) -> Option<&mut TypedSet<Link<Iri>>> {
        self.object_links.as_mut().map(ObjectLinkFacet::held_mut)
    }

    /// Held data-link set, if the facet is mounted.
    #[must_use]
    pub fn data_links(&self) -> Option<&TypedSet<Link<Literal>>> {
        self.data_links.as_ref().map(DataLinkFacet::held)
    }

    /// Mutable held data-link set, if the facet is mounted.
    pub fn data_links_mut(&mut self) -> Option<&mut TypedSet<Link<Literal>>> {
        self.data_links.as_mut().map(DataLinkFacet::held_mut)
    }

    /// Held restriction set, if the facet is mounted.
    #[must_use]
    pub fn restrictions(&self) -> Option<&TypedSet<Restriction>> {
        self.restrictions.as_ref().map(RestrictionFacet::held)
    }

    /// Mutable held restriction set, if the facet is mounted.
    pub fn restrictions_mut(&mut self) -> Option<&mut TypedSet<Restriction>> {
        self.restrictions.as_mut().map(RestrictionFacet::held_mut)
    }
}

/// Assembles a [`Descriptor`] from the facets a concrete entity kind
/// needs.
#[must_use = "call build() to obtain the descriptor"]
pub struct DescriptorBuilder {
    ground: Iri,
    policy: AmbiguityPolicy,
    sink: Arc<dyn DiagnosticSink>,
    types: bool,
    subs: bool,
    supers: bool,
    disjoints: bool,
    equivalents: bool,
    object_links: bool,
    data_links: bool,
    restrictions: bool,
}

impl DescriptorBuilder {
    /// Mounts the membership facet.
    #[must_use]
    pub fn with_types(mut self) -> Self {
        self.types = true;
        self
    }

    /// Mounts the sub-entity hierarchy facet.
    #[must_use]
    pub fn with_subs(mut self) -> Self {
        self.subs = true;
        self
    }

    /// Mounts the super-entity hierarchy facet.
    #[must_use]
    pub fn with_supers(mut self) -> Self {
        self.supers = true;
        self
    }

    /// Mounts the disjointness facet.
    #[must_use]
    pub fn with_disjoints(mut self) -> Self {
        self.disjoints = true;
        self
    }

    /// Mounts the equivalence facet.
    #[must_use]
    pub fn with_equivalents(mut self) -> Self {
        self.equivalents = true;
        self
    }

    /// Mounts the object-link facet.
    #[must_use]
    pub fn with_object_links(mut self) -> Self {
        self.object_links = true;
        self
    }

    /// Mounts the data-link facet.
    #[must_use]
    pub fn with_data_links(mut self) -> Self {
        self.data_links = true;
        self
    }

    /// Mounts the compound-restriction facet.
    #[must_use]
    pub fn with_restrictions(mut self) -> Self {
        self.restrictions = true;
        self
    }

    /// Sets the policy for the multiple-definition-axiom case.
    #[must_use]
    pub fn with_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Injects the diagnostic sink (default: [`TracingSink`]).
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Finishes assembly.
    #[must_use]
    pub fn build(self) -> Descriptor {
        Descriptor {
            ground: self.ground,
            policy: self.policy,
            sink: self.sink,
            types: self.types.then(TypeFacet::new),
            subs: self.subs.then(|| HierarchyFacet::new(Direction::Sub)),
            supers: self.supers.then(|| HierarchyFacet::new(Direction::Super)),
            disjoints: self.disjoints.then(|| PeerFacet::new(GroupKind::Disjoint)),
            equivalents: self
                .equivalents
                .then(|| PeerFacet::new(GroupKind::Equivalent)),
            object_links: self.object_links.then(ObjectLinkFacet::new),
            data_links: self.data_links.then(DataLinkFacet::new),
            restrictions: self.restrictions.then(RestrictionFacet::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmounted_facets_have_no_sets() {
        let descriptor = Descriptor::for_ground("ex:Room").with_supers().build();
        assert!(descriptor.supers().is_some());
        assert!(descriptor.types().is_none());
        assert!(descriptor.restrictions().is_none());
        assert_eq!(descriptor.ground(), &Iri::new("ex:Room"));
    }

    #[test]
    fn held_sets_are_locally_mutable() {
        let mut descriptor = Descriptor::for_ground("ex:Room").with_supers().build();
        if let Some(supers) = descriptor.supers_mut() {
            assert!(supers.add(Iri::new("ex:Location")));
        }
        assert_eq!(descriptor.supers().map(TypedSet::len), Some(1));
    }
}
