//! Object- and data-link facets.
//!
//! Links reconcile on property identity: the diff partitions properties,
//! not values. Writes then fan out over the partitioned link's value set,
//! one store call per (property, value) pair. Reads merge queried values
//! into held links for properties present on both sides, so a read still
//! converges value-level state even though the diff does not see it.

use std::hash::Hash;

use crate::changelog::{AxiomElement, ChangeLog, MappingIntent};
use crate::entity::Iri;
use crate::error::SyncError;
use crate::intent::reconcile;
use crate::link::{Link, Literal};
use crate::set::TypedSet;
use crate::store::{ChangeApplied, StoreError};

use super::{mutation_error, query_error, Facet, FacetKind, SyncContext};

fn queried_links<V: Eq + Hash + Clone>(pairs: Vec<(Iri, Vec<V>)>) -> TypedSet<Link<V>> {
    pairs
        .into_iter()
        .map(|(property, values)| Link::with_values(property, values))
        .collect()
}

/// Merges queried links into the held link set, logging one intent per
/// (property, value) pair that changed. Held links for properties absent
/// from the query are dropped wholesale; properties on both sides have the
/// queried values merged into the held value set (respecting its singleton
/// flag).
fn merge_links<V, F>(
    kind: FacetKind,
    held: &mut TypedSet<Link<V>>,
    queried: &TypedSet<Link<V>>,
    element: F,
) -> ChangeLog
where
    V: Eq + Hash + Clone,
    F: Fn(&Iri, &V) -> AxiomElement,
{
    let intent = reconcile(queried, held);
    let mut log = ChangeLog::new();
    for link in &intent.to_add {
        for value in &link.values {
            log.push(MappingIntent::added(
                kind,
                element(&link.property, value),
                ChangeApplied::Success,
            ));
        }
        held.add(link.clone());
    }
    for link in &intent.to_remove {
        // `link` is the held copy here: reconcile cloned it out of `held`.
        for value in &link.values {
            log.push(MappingIntent::removed(
                kind,
                element(&link.property, value),
                ChangeApplied::Success,
            ));
        }
        held.remove(link);
    }
    for link in &intent.unchanged {
        let Some(held_link) = held.get_mut(link) else {
            continue;
        };
        for value in &link.values {
            let applied: ChangeApplied = held_link.values.add(value.clone()).into();
            if applied == ChangeApplied::Success {
                log.push(MappingIntent::added(
                    kind,
                    element(&link.property, value),
                    applied,
                ));
            }
        }
    }
    log
}

/// Direction of one fanned-out store call.
#[derive(Clone, Copy)]
enum Op {
    Assert,
    Retract,
}

/// Flushes the held/external link diff to the store, fanning out one call
/// per (property, value) pair. A single dispatch closure keeps the store
/// borrowed mutably only once.
fn write_links<V, F, FE>(
    kind: FacetKind,
    ground: &Iri,
    held: &TypedSet<Link<V>>,
    external: &TypedSet<Link<V>>,
    mut call: F,
    element: FE,
) -> Result<ChangeLog, SyncError>
where
    V: Eq + Hash + Clone,
    F: FnMut(Op, &Iri, &V) -> Result<ChangeApplied, StoreError>,
    FE: Fn(&Iri, &V) -> AxiomElement,
{
    let intent = reconcile(held, external);
    let mut log = ChangeLog::new();
    for link in &intent.to_add {
        for value in &link.values {
            match call(Op::Assert, &link.property, value) {
                Ok(applied) => log.push(MappingIntent::added(
                    kind,
                    element(&link.property, value),
                    applied,
                )),
                Err(e) => return Err(mutation_error(kind, ground, e, log)),
            }
        }
    }
    for link in &intent.to_remove {
        for value in &link.values {
            match call(Op::Retract, &link.property, value) {
                Ok(applied) => log.push(MappingIntent::removed(
                    kind,
                    element(&link.property, value),
                    applied,
                )),
                Err(e) => return Err(mutation_error(kind, ground, e, log)),
            }
        }
    }
    Ok(log)
}

/// Synchronizes the ground individual's object-property links.
#[derive(Debug, Default)]
pub struct ObjectLinkFacet {
    held: TypedSet<Link<Iri>>,
}

impl ObjectLinkFacet {
    /// Creates the handler with an empty held set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The held link set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Link<Iri>> {
        &self.held
    }

    /// Mutable access to the held link set.
    pub fn held_mut(&mut self) -> &mut TypedSet<Link<Iri>> {
        &mut self.held
    }
}

impl Facet for ObjectLinkFacet {
    fn kind(&self) -> FacetKind {
        FacetKind::ObjectLink
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let pairs = ctx
            .store
            .object_links(ctx.ground)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let queried = queried_links(pairs);
        Ok(merge_links(
            self.kind(),
            &mut self.held,
            &queried,
            |property, value| AxiomElement::ObjectLink {
                property: property.clone(),
                value: value.clone(),
            },
        ))
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let pairs = ctx
            .store
            .object_links(ctx.ground)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let external = queried_links(pairs);
        let ground = ctx.ground.clone();
        let store = &mut *ctx.store;
        write_links(
            self.kind(),
            &ground,
            &self.held,
            &external,
            |op, property, value| match op {
                Op::Assert => store.assert_object_link(&ground, property, value),
                Op::Retract => store.retract_object_link(&ground, property, value),
            },
            |property, value| AxiomElement::ObjectLink {
                property: property.clone(),
                value: value.clone(),
            },
        )
    }
}

/// Synchronizes the ground individual's data-property links.
#[derive(Debug, Default)]
pub struct DataLinkFacet {
    held: TypedSet<Link<Literal>>,
}

impl DataLinkFacet {
    /// Creates the handler with an empty held set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The held link set.
    #[must_use]
    pub fn held(&self) -> &TypedSet<Link<Literal>> {
        &self.held
    }

    /// Mutable access to the held link set.
    pub fn held_mut(&mut self) -> &mut TypedSet<Link<Literal>> {
        &mut self.held
    }
}

impl Facet for DataLinkFacet {
    fn kind(&self) -> FacetKind {
        FacetKind::DataLink
    }

    fn read(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let pairs = ctx
            .store
            .data_links(ctx.ground)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let queried = queried_links(pairs);
        Ok(merge_links(
            self.kind(),
            &mut self.held,
            &queried,
            |property, value| AxiomElement::DataLink {
                property: property.clone(),
                value: value.clone(),
            },
        ))
    }

    fn write(&mut self, ctx: &mut SyncContext<'_>) -> Result<ChangeLog, SyncError> {
        let pairs = ctx
            .store
            .data_links(ctx.ground)
            .map_err(|e| query_error(self.kind(), ctx.ground, e))?;
        let external = queried_links(pairs);
        let ground = ctx.ground.clone();
        let store = &mut *ctx.store;
        write_links(
            self.kind(),
            &ground,
            &self.held,
            &external,
            |op, property, value| match op {
                Op::Assert => store.assert_data_link(&ground, property, value),
                Op::Retract => store.retract_data_link(&ground, property, value),
            },
            |property, value| AxiomElement::DataLink {
                property: property.clone(),
                value: value.clone(),
            },
        )
    }
}
