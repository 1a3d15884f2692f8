//! Class/instance membership facet.

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::set::TypedSet;
use crate::store::EdgeKind;

use super::{merge_entities, mutation_error, query_error, Facet, FacetKind, SyncContext};
use crate::entity::Iri;

/// Synchronizes the ground's membership edges (the classes an individual
/// belongs to, or the meta-classes of a class).
///
/// No sentinel filtering applies: membership in `owl:Thing` or any other
/// class is a plain edge, added and removed element-by-element.
#[derive(Debug, Default)]
pub struct TypeFacet {
    held: TypedSet<Iri>,
}

impl TypeFacet {
    /// Creates the handler with an empty held set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The held membership set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Iri> {
        &self.held
    }

    /// Mutable access to the held membership set for local add/remove
    /// between cycles.
    pub fn held_mut(&mut self) -> &mut TypedSet<Iri> {
        &mut self.held
    }
}

impl Facet for TypeFacet {
    fn kind(&self) -> FacetKind {
        FacetKind::Type
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let raw = ctx
            .store
            .edges(ctx.ground, EdgeKind::Type)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let queried: TypedSet<Iri> = raw.into_iter().collect();
        Ok(merge_entities(self.kind(), &mut self.held, &queried))
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let raw = ctx
            .store
            .edges(ctx.ground, EdgeKind::Type)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let external: TypedSet<Iri> = raw.into_iter().collect();
        let intent = reconcile(&self.held, &external);

        let mut log = ChangeLog::new();
        for class in &intent.to_add {
            match ctx.store.assert_edge(ctx.ground, EdgeKind::Type, class) {
                Ok(applied) => log.push(MappingIntent::added(
                    self.kind(),
                    AxiomElement::Entity(class.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        for class in &intent.to_remove {
            match ctx.store.retract_edge(ctx.ground, EdgeKind::Type, class) {
                Ok(applied) => log.push(MappingIntent::removed(
                    self.kind(),
                    AxiomElement::Entity(class.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        Ok(log)
    }
}
