//! Disjointness and equivalence facets.
//!
//! The store primitive for these facets is n-ary: it asserts or retracts a
//! *group* of mutually disjoint/equivalent entities. The reconciler,
//! however, works element-by-element, so every add/remove is wrapped into
//! a fresh two-element `{ground, other}` group before calling the store.

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::entity::Iri;
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::set::TypedSet;
use crate::store::GroupKind;

use super::{
    merge_entities, mutation_error, query_error, strip_self_and_nothing, Facet, FacetKind,
    SyncContext,
};

/// Synchronizes the ground's disjoint or equivalent peers.
///
/// Query results are stripped of the ground itself: an entity is not its
/// own disjoint/equivalent peer even when the raw group membership
/// includes it (groups always do).
#[derive(Debug)]
pub struct PeerFacet {
    group: GroupKind,
    held: TypedSet<Iri>,
}

impl PeerFacet {
    /// Creates the handler for the given group kind with an empty held
    /// set.
    #[must_use]
    pub fn new(group: GroupKind) -> Self {
        PeerFacet {
            group,
            held: TypedSet::new(),
        }
    }

    /// The group kind this handler tracks.
    #[must_use]
    pub fn group(&self) -> GroupKind {
        self.group
    }

    /// The held peer set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Iri> {
        &self.held
    }

    /// Mutable access to the held peer set.
    pub fn held_mut(&mut self) -> &mut TypedSet<Iri> {
        &mut self.held
    }

    fn query(&self, ctx: &SyncContext<'_>) -> Result<TypedSet<Iri>, SyncError> {
        let raw = ctx
            .store
            .group_members(ctx.ground, self.group)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        Ok(strip_self_and_nothing(raw, ctx.ground))
    }
}

impl Facet for PeerFacet {
    fn kind(&self) -> FacetKind {
        match self.group {
            GroupKind::Disjoint => FacetKind::Disjoint,
            GroupKind::Equivalent => FacetKind::Equivalent,
        }
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let queried = self.query(ctx)?;
        Ok(merge_entities(self.kind(), &mut self.held, &queried))
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let external = self.query(ctx)?;
        let intent = reconcile(&self.held, &external);

        let mut log = ChangeLog::new();
        for peer in &intent.to_add {
            let pair = [ctx.ground.clone(), peer.clone()];
            match ctx.store.assert_group(self.group, &pair) {
                Ok(applied) => log.push(MappingIntent::added(
                    self.kind(),
                    AxiomElement::Entity(peer.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        for peer in &intent.to_remove {
            let pair = [ctx.ground.clone(), peer.clone()];
            match ctx.store.retract_group(self.group, &pair) {
                Ok(applied) => log.push(MappingIntent::removed(
                    self.kind(),
                    AxiomElement::Entity(peer.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        Ok(log)
    }
}
