//! Subsumption hierarchy facet (sub- and super-entities).

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::entity::Iri;
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::set::TypedSet;
use crate::store::EdgeKind;

use super::{
    merge_entities, mutation_error, query_error, strip_self_and_nothing, Facet, FacetKind,
    SyncContext,
};

/// Which side of the subsumption relation this handler tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Entities the ground subsumes.
    Sub,
    /// Entities subsuming the ground.
    Super,
}

impl Direction {
    fn edge_kind(self) -> EdgeKind {
        match self {
            Direction::Sub => EdgeKind::Sub,
            Direction::Super => EdgeKind::Super,
        }
    }

    fn facet_kind(self) -> FacetKind {
        match self {
            Direction::Sub => FacetKind::Sub,
            Direction::Super => FacetKind::Super,
        }
    }
}

/// Synchronizes one direction of the ground's subsumption hierarchy.
///
/// Query results are stripped of the ground's self-reference and the
/// `owl:Nothing` sentinel before reconciling (a reasoner-closed store
/// reports both). On write, an add of `owl:Nothing` is skipped rather
/// than asserted.
#[derive(Debug)]
pub struct HierarchyFacet {
    direction: Direction,
    held: TypedSet<Iri>,
}

impl HierarchyFacet {
    /// Creates the handler for the given direction with an empty held set.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        HierarchyFacet {
            direction,
            held: TypedSet::new(),
        }
    }

    /// The direction this handler tracks.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The held hierarchy set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Iri> {
        &self.held
    }

    /// Mutable access to the held hierarchy set.
    pub fn held_mut(&mut self) -> &mut TypedSet<Iri> {
        &mut self.held
    }

    fn query(&self, ctx: &SyncContext<'_>) -> Result<TypedSet<Iri>, SyncError> {
        let raw = ctx
            .store
            .edges(ctx.ground, self.direction.edge_kind())
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        Ok(strip_self_and_nothing(raw, ctx.ground))
    }
}

impl Facet for HierarchyFacet {
    fn kind(&self) -> FacetKind {
        self.direction.facet_kind()
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let queried = self.query(ctx)?;
        Ok(merge_entities(self.kind(), &mut self.held, &queried))
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let external = self.query(ctx)?;
        let intent = reconcile(&self.held, &external);
        let edge = self.direction.edge_kind();

        let mut log = ChangeLog::new();
        for entity in &intent.to_add {
            // The bottom class subsumes nothing; never assert an edge to it.
            if entity.is_nothing() {
                continue;
            }
            match ctx.store.assert_edge(ctx.ground, edge, entity) {
                Ok(applied) => log.push(MappingIntent::added(
                    self.kind(),
                    AxiomElement::Entity(entity.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        for entity in &intent.to_remove {
            match ctx.store.retract_edge(ctx.ground, edge, entity) {
                Ok(applied) => log.push(MappingIntent::removed(
                    self.kind(),
                    AxiomElement::Entity(entity.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }
        Ok(log)
    }
}
