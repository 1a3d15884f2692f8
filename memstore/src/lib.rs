//! Deterministic in-memory ontology store for owlsync tests and
//! development.
//!
//! [`MemoryStore`] implements the full [`OntologyStore`] contract over
//! plain maps, with seeding helpers to stage store state and fault
//! injection ([`set_offline`](MemoryStore::set_offline),
//! [`set_read_only`](MemoryStore::set_read_only)) to exercise the core's
//! error paths. It intentionally mimics two store behaviors the core
//! compensates for: raw group queries include the queried entity itself,
//! and asserting a `Class` restriction conjunct materializes the implied
//! super-class edge.
//!
//! Not a reasoner and not thread-safe beyond `&mut` discipline; edges are
//! stored per direction without inverse closure.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::collections::HashMap;

use owlsync::{
    ChangeApplied, EdgeKind, GroupKind, Iri, Literal, OntologyStore, Restriction, StoreError,
};

/// A ground entity's compound definition: conjunctive restriction groups
/// plus the packed/unpacked state of the defining axiom.
#[derive(Debug, Clone, Default)]
struct Definition {
    /// Conjunctive groups. A well-formed entity has at most one; seeding
    /// can stage more to exercise the ambiguity path.
    groups: Vec<Vec<Restriction>>,
    /// True while the conjuncts are attached via a single equivalence
    /// axiom; false while they stand as plain superclass assertions.
    packed: bool,
}

/// In-memory [`OntologyStore`] with deterministic iteration order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    edges: HashMap<(EdgeKind, Iri), Vec<Iri>>,
    groups: Vec<(GroupKind, Vec<Iri>)>,
    object_links: HashMap<Iri, Vec<(Iri, Vec<Iri>)>>,
    data_links: HashMap<Iri, Vec<(Iri, Vec<Literal>)>>,
    definitions: HashMap<Iri, Definition>,
    offline: bool,
    read_only: bool,
    mutation_budget: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation fails with [`StoreError::Unreachable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// When set, queries succeed but every mutation fails with
    /// [`StoreError::ReadOnly`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Allows exactly `budget` further mutations, then fails each one with
    /// [`StoreError::Backend`]. Used to fault a write cycle mid-way.
    pub fn set_mutation_budget(&mut self, budget: usize) {
        self.mutation_budget = Some(budget);
    }

    fn guard_query(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unreachable("store is offline".into()));
        }
        Ok(())
    }

    fn guard_mutation(&mut self) -> Result<(), StoreError> {
        self.guard_query()?;
        if self.read_only {
            return Err(StoreError::ReadOnly("store opened read-only".into()));
        }
        if let Some(budget) = self.mutation_budget.as_mut() {
            if *budget == 0 {
                return Err(StoreError::Backend("mutation budget exhausted".into()));
            }
            *budget -= 1;
        }
        Ok(())
    }

    // ---- seeding -------------------------------------------------------

    /// Stages one edge axiom.
    pub fn seed_edge(&mut self, ground: impl Into<Iri>, kind: EdgeKind, other: impl Into<Iri>) {
        let entry = self.edges.entry((kind, ground.into())).or_default();
        let other = other.into();
        if !entry.contains(&other) {
            entry.push(other);
        }
    }

    /// Stages one n-ary group.
    pub fn seed_group(&mut self, kind: GroupKind, members: impl IntoIterator<Item = Iri>) {
        self.groups.push((kind, members.into_iter().collect()));
    }

    /// Stages one object-property assertion.
    pub fn seed_object_link(
        &mut self,
        ground: impl Into<Iri>,
        property: impl Into<Iri>,
        value: impl Into<Iri>,
    ) {
        push_link(
            self.object_links.entry(ground.into()).or_default(),
            property.into(),
            value.into(),
        );
    }

    /// Stages one data-property assertion.
    pub fn seed_data_link(
        &mut self,
        ground: impl Into<Iri>,
        property: impl Into<Iri>,
        value: Literal,
    ) {
        push_link(
            self.data_links.entry(ground.into()).or_default(),
            property.into(),
            value,
        );
    }

    /// Stages a definition group for `ground`. Call twice to stage the
    /// multiple-axiom ambiguity.
    pub fn seed_definition(
        &mut self,
        ground: impl Into<Iri>,
        restrictions: impl IntoIterator<Item = Restriction>,
        packed: bool,
    ) {
        let definition = self.definitions.entry(ground.into()).or_default();
        definition.groups.push(restrictions.into_iter().collect());
        definition.packed = packed;
    }

    // ---- inspection ----------------------------------------------------

    /// Returns the stored edge targets for `ground` (empty if none).
    #[must_use]
    pub fn edge_targets(&self, ground: &Iri, kind: EdgeKind) -> Vec<Iri> {
        self.edges
            .get(&(kind, ground.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of stored groups of the given kind.
    #[must_use]
    pub fn group_count(&self, kind: GroupKind) -> usize {
        self.groups.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Returns all restriction conjuncts of `ground`'s definition,
    /// flattened across groups.
    #[must_use]
    pub fn definition(&self, ground: &Iri) -> Vec<Restriction> {
        self.definitions
            .get(ground)
            .map(|d| d.groups.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns how many definition groups `ground` currently carries.
    #[must_use]
    pub fn definition_group_count(&self, ground: &Iri) -> usize {
        self.definitions
            .get(ground)
            .map(|d| d.groups.iter().filter(|g| !g.is_empty()).count())
            .unwrap_or(0)
    }

    /// Returns true if `ground`'s definition is attached via a single
    /// equivalence axiom (as opposed to plain superclass assertions).
    #[must_use]
    pub fn is_packed(&self, ground: &Iri) -> bool {
        self.definitions.get(ground).is_some_and(|d| d.packed)
    }
}

fn push_link<V: PartialEq>(links: &mut Vec<(Iri, Vec<V>)>, property: Iri, value: V) {
    if let Some((_, values)) = links.iter_mut().find(|(p, _)| *p == property) {
        if !values.contains(&value) {
            values.push(value);
        }
    } else {
        links.push((property, vec![value]));
    }
}

fn remove_link<V: PartialEq>(
    links: &mut Vec<(Iri, Vec<V>)>,
    property: &Iri,
    value: &V,
) -> ChangeApplied {
    let Some(idx) = links.iter().position(|(p, _)| p == property) else {
        return ChangeApplied::NoOperation;
    };
    let values = &mut links[idx].1;
    let Some(value_idx) = values.iter().position(|v| v == value) else {
        return ChangeApplied::NoOperation;
    };
    values.remove(value_idx);
    if values.is_empty() {
        links.remove(idx);
    }
    ChangeApplied::Success
}

fn same_members(a: &[Iri], b: &[Iri]) -> bool {
    a.len() == b.len() && a.iter().all(|m| b.contains(m))
}

impl OntologyStore for MemoryStore {
    fn edges(&self, ground: &Iri, kind: EdgeKind) -> Result<Vec<Iri>, StoreError> {
        self.guard_query()?;
        Ok(self.edge_targets(ground, kind))
    }

    fn assert_edge(
        &mut self,
        ground: &Iri,
        kind: EdgeKind,
        other: &Iri,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let entry = self.edges.entry((kind, ground.clone())).or_default();
        if entry.contains(other) {
            return Ok(ChangeApplied::NoOperation);
        }
        tracing::debug!(%ground, ?kind, %other, "assert edge");
        entry.push(other.clone());
        Ok(ChangeApplied::Success)
    }

    fn retract_edge(
        &mut self,
        ground: &Iri,
        kind: EdgeKind,
        other: &Iri,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(entry) = self.edges.get_mut(&(kind, ground.clone())) else {
            return Ok(ChangeApplied::NoOperation);
        };
        match entry.iter().position(|e| e == other) {
            Some(idx) => {
                tracing::debug!(%ground, ?kind, %other, "retract edge");
                entry.remove(idx);
                Ok(ChangeApplied::Success)
            }
            None => Ok(ChangeApplied::NoOperation),
        }
    }

    fn group_members(&self, ground: &Iri, kind: GroupKind) -> Result<Vec<Iri>, StoreError> {
        self.guard_query()?;
        let mut members = Vec::new();
        for (_, group) in self.groups.iter().filter(|(k, _)| *k == kind) {
            if group.contains(ground) {
                for member in group {
                    if !members.contains(member) {
                        members.push(member.clone());
                    }
                }
            }
        }
        Ok(members)
    }

    fn assert_group(
        &mut self,
        kind: GroupKind,
        members: &[Iri],
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let exists = self
            .groups
            .iter()
            .any(|(k, group)| *k == kind && same_members(group, members));
        if exists {
            return Ok(ChangeApplied::NoOperation);
        }
        tracing::debug!(?kind, count = members.len(), "assert group");
        self.groups.push((kind, members.to_vec()));
        Ok(ChangeApplied::Success)
    }

    fn retract_group(
        &mut self,
        kind: GroupKind,
        members: &[Iri],
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let before = self.groups.len();
        self.groups
            .retain(|(k, group)| *k != kind || !same_members(group, members));
        Ok((self.groups.len() != before).into())
    }

    fn object_links(&self, ground: &Iri) -> Result<Vec<(Iri, Vec<Iri>)>, StoreError> {
        self.guard_query()?;
        Ok(self.object_links.get(ground).cloned().unwrap_or_default())
    }

    fn data_links(&self, ground: &Iri) -> Result<Vec<(Iri, Vec<Literal>)>, StoreError> {
        self.guard_query()?;
        Ok(self.data_links.get(ground).cloned().unwrap_or_default())
    }

    fn assert_object_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Iri,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let links = self.object_links.entry(ground.clone()).or_default();
        let had = links
            .iter()
            .any(|(p, values)| p == property && values.contains(value));
        push_link(links, property.clone(), value.clone());
        Ok((!had).into())
    }

    fn retract_object_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Iri,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(links) = self.object_links.get_mut(ground) else {
            return Ok(ChangeApplied::NoOperation);
        };
        Ok(remove_link(links, property, value))
    }

    fn assert_data_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Literal,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let links = self.data_links.entry(ground.clone()).or_default();
        let had = links
            .iter()
            .any(|(p, values)| p == property && values.contains(value));
        push_link(links, property.clone(), value.clone());
        Ok((!had).into())
    }

    fn retract_data_link(
        &mut self,
        ground: &Iri,
        property: &Iri,
        value: &Literal,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(links) = self.data_links.get_mut(ground) else {
            return Ok(ChangeApplied::NoOperation);
        };
        Ok(remove_link(links, property, value))
    }

    fn definition_groups(&self, ground: &Iri) -> Result<Vec<Vec<Restriction>>, StoreError> {
        self.guard_query()?;
        Ok(self
            .definitions
            .get(ground)
            .map(|d| d.groups.iter().filter(|g| !g.is_empty()).cloned().collect())
            .unwrap_or_default())
    }

    fn assert_restriction(
        &mut self,
        ground: &Iri,
        restriction: &Restriction,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        // A plain class conjunct is materialized as a super-class edge as
        // well; the core's compound writer compensates on removal.
        if let Some(class) = restriction.as_class() {
            let entry = self
                .edges
                .entry((EdgeKind::Super, ground.clone()))
                .or_default();
            if !entry.contains(class) {
                entry.push(class.clone());
            }
        }
        let definition = self.definitions.entry(ground.clone()).or_default();
        if definition.groups.is_empty() {
            definition.groups.push(Vec::new());
        }
        if definition.groups[0].contains(restriction) {
            return Ok(ChangeApplied::NoOperation);
        }
        tracing::debug!(%ground, %restriction, "assert restriction");
        definition.groups[0].push(restriction.clone());
        Ok(ChangeApplied::Success)
    }

    fn retract_restriction(
        &mut self,
        ground: &Iri,
        restriction: &Restriction,
    ) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(definition) = self.definitions.get_mut(ground) else {
            return Ok(ChangeApplied::NoOperation);
        };
        let mut removed = false;
        for group in &mut definition.groups {
            if let Some(idx) = group.iter().position(|r| r == restriction) {
                group.remove(idx);
                removed = true;
            }
        }
        definition.groups.retain(|g| !g.is_empty());
        Ok(removed.into())
    }

    fn unpack_definition(&mut self, ground: &Iri) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(definition) = self.definitions.get_mut(ground) else {
            return Ok(ChangeApplied::NoOperation);
        };
        if !definition.packed || definition.groups.is_empty() {
            return Ok(ChangeApplied::NoOperation);
        }
        definition.packed = false;
        Ok(ChangeApplied::Success)
    }

    fn pack_definition(&mut self, ground: &Iri) -> Result<ChangeApplied, StoreError> {
        self.guard_mutation()?;
        let Some(definition) = self.definitions.get_mut(ground) else {
            return Ok(ChangeApplied::NoOperation);
        };
        if definition.groups.is_empty() {
            return Ok(ChangeApplied::NoOperation);
        }
        // Packing collapses whatever plain assertions exist into a single
        // equivalence axiom, i.e. a single conjunctive group.
        let merged: Vec<Restriction> = definition.groups.drain(..).flatten().collect();
        definition.groups.push(merged);
        let was_packed = definition.packed;
        definition.packed = true;
        Ok((!was_packed).into())
    }
}
