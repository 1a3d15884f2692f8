//! Compound definition (restriction) facet.
//!
//! The store represents every restriction held by one subject as a single
//! conjunctive definition axiom, so this facet cannot patch elements in
//! place. An unsettled diff instead unlocks the compound axiom
//! (equivalence → plain superclasses), retracts and asserts individual
//! conjuncts, and re-packs the definition iff conjuncts remain.
//!
//! Callers mixing this facet with a hierarchy facet must write this one
//! first: re-deriving the definition rewrites the super-class edges the
//! hierarchy facet diffs against.
//! [`Descriptor::write_axioms`](crate::Descriptor::write_axioms) enforces
//! that order.

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::diagnostics::{AmbiguityPolicy, Diagnostic};
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::restriction::Restriction;
use crate::set::TypedSet;
use crate::store::EdgeKind;

use super::{mutation_error, query_error, Facet, FacetKind, SyncContext};

/// Synchronizes the conjunctive restriction set defining the ground
/// entity.
#[derive(Debug, Default)]
pub struct RestrictionFacet {
    held: TypedSet<Restriction>,
}

impl RestrictionFacet {
    /// Creates the handler with an empty held set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The held restriction set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Restriction> {
        &self.held
    }

    /// Mutable access to the held restriction set.
    pub fn held_mut(&mut self) -> &mut TypedSet<Restriction> {
        &mut self.held
    }

    /// Queries the store's definition groups and resolves them to one
    /// external restriction set per the ambiguity policy.
    fn query(&self, ctx: &mut SyncContext<'_>) -> Result<TypedSet<Restriction>, SyncError> {
        let groups = ctx
            .store
            .definition_groups(ctx.ground)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        if groups.len() > 1 {
            match ctx.policy {
                AmbiguityPolicy::Strict => {
                    return Err(SyncError::AmbiguousDefinition {
                        ground: ctx.ground.clone(),
                        groups: groups.len(),
                    });
                }
                AmbiguityPolicy::FirstWins => {
                    ctx.sink.emit(&Diagnostic::AmbiguousDefinition {
                        ground: ctx.ground.clone(),
                        groups: groups.len(),
                    });
                }
            }
        }
        Ok(groups.into_iter().next().unwrap_or_default().into_iter().collect())
    }
}

impl Facet for RestrictionFacet {
    fn kind(&self) -> FacetKind {
        FacetKind::Restriction
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let queried = self.query(ctx)?;
        let intent = reconcile(&queried, &self.held);
        let mut log = ChangeLog::new();
        for restriction in &intent.to_add {
            let applied = self.held.add(restriction.clone()).into();
            log.push(MappingIntent::added(
                self.kind(),
                AxiomElement::Restriction(restriction.clone()),
                applied,
            ));
        }
        for restriction in &intent.to_remove {
            let applied = self.held.remove(restriction).into();
            log.push(MappingIntent::removed(
                self.kind(),
                AxiomElement::Restriction(restriction.clone()),
                applied,
            ));
        }
        Ok(log)
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let external = self.query(ctx)?;
        let intent = reconcile(&self.held, &external);
        let mut log = ChangeLog::new();
        if intent.is_settled() {
            return Ok(log);
        }

        // Unlock the compound axiom so individual conjuncts can move.
        // Conversions are not element mutations and are not logged.
        if let Err(e) = ctx.store.unpack_definition(ctx.ground) {
            return Err(mutation_error(self.kind(), ctx.ground, e, log));
        }

        for restriction in &intent.to_remove {
            match ctx.store.retract_restriction(ctx.ground, restriction) {
                Ok(applied) => log.push(MappingIntent::removed(
                    self.kind(),
                    AxiomElement::Restriction(restriction.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
            // A plain "is-a class X" conjunct is materialized by the store
            // as a separate subsumption edge; retract that too.
            if let Some(class) = restriction.as_class() {
                if let Err(e) = ctx.store.retract_edge(ctx.ground, EdgeKind::Super, class) {
                    return Err(mutation_error(self.kind(), ctx.ground, e, log));
                }
            }
        }
        for restriction in &intent.to_add {
            match ctx.store.assert_restriction(ctx.ground, restriction) {
                Ok(applied) => log.push(MappingIntent::added(
                    self.kind(),
                    AxiomElement::Restriction(restriction.clone()),
                    applied,
                )),
                Err(e) => return Err(mutation_error(self.kind(), ctx.ground, e, log)),
            }
        }

        // Re-derive the compound axiom iff conjuncts remain; otherwise the
        // plain superclass assertions stand on their own.
        if !self.held.is_empty() {
            if let Err(e) = ctx.store.pack_definition(ctx.ground) {
                return Err(mutation_error(self.kind(), ctx.ground, e, log));
            }
        }
        Ok(log)
    }
}
