//! End-to-end descriptor cycles against the in-memory store.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use owlsync::{
    vocab, AmbiguityPolicy, Constraint, Descriptor, Diagnostic, DiagnosticSink, EdgeKind,
    FacetKind, GroupKind, Iri, Link, Literal, Restriction, SyncError,
};
use owlsync_memstore::MemoryStore;

fn iri(s: &str) -> Iri {
    Iri::new(s)
}

fn min_doors() -> Restriction {
    Restriction::Object {
        property: iri("ex:hasDoor"),
        constraint: Constraint::Min(2),
        filler: iri("ex:Door"),
    }
}

#[test]
fn hierarchy_write_applies_the_diff() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Room", EdgeKind::Super, "ex:B");
    store.seed_edge("ex:Room", EdgeKind::Super, "ex:C");

    let mut room = Descriptor::for_ground("ex:Room").with_supers().build();
    if let Some(supers) = room.supers_mut() {
        supers.add(iri("ex:A"));
        supers.add(iri("ex:B"));
    }

    let log = room.write_axioms(&mut store)?;
    // One assert (A) and one retract (C); B is unchanged.
    assert_eq!(log.len(), 2);
    assert_eq!(log.applied_count(), 2);

    let targets = store.edge_targets(&iri("ex:Room"), EdgeKind::Super);
    assert!(targets.contains(&iri("ex:A")));
    assert!(targets.contains(&iri("ex:B")));
    assert!(!targets.contains(&iri("ex:C")));
    Ok(())
}

#[test]
fn write_then_read_converges() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Room", EdgeKind::Super, "ex:C");

    let mut room = Descriptor::for_ground("ex:Room").with_supers().build();
    if let Some(supers) = room.supers_mut() {
        supers.add(iri("ex:A"));
    }
    room.write_axioms(&mut store)?;

    let log = room.read_axioms(&mut store)?;
    // The write already settled everything; the read observes no drift.
    assert!(log.is_empty());
    let held: Vec<Iri> = room.supers().into_iter().flatten().cloned().collect();
    assert_eq!(held, store.edge_targets(&iri("ex:Room"), EdgeKind::Super));
    Ok(())
}

#[test]
fn reads_are_idempotent() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Room", EdgeKind::Type, "ex:Location");

    let mut room = Descriptor::for_ground("ex:Room").with_types().build();
    let first = room.read_axioms(&mut store)?;
    assert_eq!(first.len(), 1);
    let second = room.read_axioms(&mut store)?;
    assert!(second.is_empty());
    Ok(())
}

#[test]
fn read_excludes_self_and_nothing() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Room", EdgeKind::Super, "ex:Room");
    store.seed_edge("ex:Room", EdgeKind::Super, vocab::OWL_NOTHING);
    store.seed_edge("ex:Room", EdgeKind::Super, "ex:Location");
    store.seed_group(GroupKind::Disjoint, [iri("ex:Room"), iri("ex:Corridor")]);

    let mut room = Descriptor::for_ground("ex:Room")
        .with_supers()
        .with_disjoints()
        .build();
    room.read_axioms(&mut store)?;

    let supers: Vec<&Iri> = room.supers().into_iter().flatten().collect();
    assert_eq!(supers, vec![&iri("ex:Location")]);
    let disjoints: Vec<&Iri> = room.disjoints().into_iter().flatten().collect();
    assert_eq!(disjoints, vec![&iri("ex:Corridor")]);
    Ok(())
}

#[test]
fn nothing_is_never_asserted_on_write() -> Result<()> {
    let mut store = MemoryStore::new();
    let mut room = Descriptor::for_ground("ex:Room").with_supers().build();
    if let Some(supers) = room.supers_mut() {
        supers.add(vocab::nothing());
        supers.add(iri("ex:Location"));
    }

    let log = room.write_axioms(&mut store)?;
    assert_eq!(log.len(), 1);
    assert_eq!(
        store.edge_targets(&iri("ex:Room"), EdgeKind::Super),
        vec![iri("ex:Location")]
    );
    Ok(())
}

#[test]
fn peer_writes_emit_pairwise_groups() -> Result<()> {
    let mut store = MemoryStore::new();
    let mut room = Descriptor::for_ground("ex:Room").with_disjoints().build();
    if let Some(disjoints) = room.disjoints_mut() {
        disjoints.add(iri("ex:Corridor"));
        disjoints.add(iri("ex:Stairwell"));
    }

    let log = room.write_axioms(&mut store)?;
    assert_eq!(log.len(), 2);
    // One fresh {ground, other} group per element, not one n-ary group.
    assert_eq!(store.group_count(GroupKind::Disjoint), 2);
    Ok(())
}

#[test]
fn link_writes_fan_out_per_value() -> Result<()> {
    let mut store = MemoryStore::new();
    let mut robot = Descriptor::for_ground("ex:Robot1")
        .with_object_links()
        .with_data_links()
        .build();
    if let Some(links) = robot.object_links_mut() {
        links.add(Link::with_values(
            iri("ex:isIn"),
            [iri("ex:Room1"), iri("ex:Room2")],
        ));
    }
    if let Some(links) = robot.data_links_mut() {
        links.add(Link::with_values(iri("ex:battery"), [Literal::Int(80)]));
    }

    let log = robot.write_axioms(&mut store)?;
    // Two object pairs fan out from one link, plus one data pair.
    assert_eq!(log.for_facet(FacetKind::ObjectLink).count(), 2);
    assert_eq!(log.for_facet(FacetKind::DataLink).count(), 1);
    Ok(())
}

#[test]
fn link_reads_merge_values_for_shared_properties() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_object_link("ex:Robot1", "ex:isIn", "ex:Room2");

    let mut robot = Descriptor::for_ground("ex:Robot1").with_object_links().build();
    if let Some(links) = robot.object_links_mut() {
        links.add(Link::with_values(iri("ex:isIn"), [iri("ex:Room1")]));
    }

    let log = robot.read_axioms(&mut store)?;
    // The property exists on both sides (links compare by property), so
    // the queried value is merged into the held link.
    assert_eq!(log.len(), 1);
    let held = robot.object_links().and_then(|links| {
        links
            .iter()
            .find(|l| l.property == iri("ex:isIn"))
            .map(|l| l.values.len())
    });
    assert_eq!(held, Some(2));
    Ok(())
}

#[test]
fn singleton_set_keeps_latest_queried_value() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Robot1", EdgeKind::Type, "ex:Robot");
    store.seed_edge("ex:Robot1", EdgeKind::Type, "ex:Agent");

    let mut robot = Descriptor::for_ground("ex:Robot1").with_types().build();
    if let Some(types) = robot.types_mut() {
        types.set_singleton(true);
    }
    robot.read_axioms(&mut store)?;

    let types: Vec<&Iri> = robot.types().into_iter().flatten().collect();
    assert_eq!(types, vec![&iri("ex:Agent")]);
    Ok(())
}

#[test]
fn restriction_write_packs_a_fresh_definition() -> Result<()> {
    let mut store = MemoryStore::new();
    let ground = iri("ex:Room");
    let mut room = Descriptor::for_ground(&ground).with_restrictions().build();
    if let Some(restrictions) = room.restrictions_mut() {
        restrictions.add(min_doors());
    }

    let log = room.write_axioms(&mut store)?;
    // Convert-equivalence-to-super was a no-op (none existed), one assert,
    // convert-super-to-equivalence repacked: exactly one intent recorded.
    assert_eq!(log.len(), 1);
    assert_eq!(store.definition(&ground), vec![min_doors()]);
    assert!(store.is_packed(&ground));
    Ok(())
}

#[test]
fn restriction_update_is_atomic() -> Result<()> {
    let mut store = MemoryStore::new();
    let ground = iri("ex:Room");
    store.seed_definition(
        &ground,
        [Restriction::Class(iri("ex:Location")), min_doors()],
        true,
    );
    store.seed_edge(&ground, EdgeKind::Super, "ex:Location");

    let mut room = Descriptor::for_ground(&ground).with_restrictions().build();
    room.read_axioms(&mut store)?;

    let exact_windows = Restriction::Object {
        property: iri("ex:hasWindow"),
        constraint: Constraint::Exact(3),
        filler: iri("ex:Window"),
    };
    if let Some(restrictions) = room.restrictions_mut() {
        assert!(restrictions.remove(&Restriction::Class(iri("ex:Location"))));
        assert!(restrictions.add(exact_windows.clone()));
    }
    let log = room.write_axioms(&mut store)?;
    assert_eq!(log.len(), 2);

    // One packed definition afterwards, never a half-converted state.
    assert_eq!(store.definition_group_count(&ground), 1);
    assert!(store.is_packed(&ground));
    let definition = store.definition(&ground);
    assert!(definition.contains(&min_doors()));
    assert!(definition.contains(&exact_windows));
    assert!(!definition.contains(&Restriction::Class(iri("ex:Location"))));
    // The implied super-class edge of the dropped Class conjunct is gone.
    assert!(!store
        .edge_targets(&ground, EdgeKind::Super)
        .contains(&iri("ex:Location")));

    // And the cycle converges: a re-read observes nothing new.
    assert!(room.read_axioms(&mut store)?.is_empty());
    Ok(())
}

#[test]
fn removing_every_restriction_leaves_definition_unpacked() -> Result<()> {
    let mut store = MemoryStore::new();
    let ground = iri("ex:Room");
    store.seed_definition(&ground, [min_doors()], true);

    let mut room = Descriptor::for_ground(&ground).with_restrictions().build();
    room.read_axioms(&mut store)?;
    if let Some(restrictions) = room.restrictions_mut() {
        assert!(restrictions.remove(&min_doors()));
    }

    let log = room.write_axioms(&mut store)?;
    assert_eq!(log.len(), 1);
    assert!(store.definition(&ground).is_empty());
    assert!(!store.is_packed(&ground));
    Ok(())
}

#[test]
fn query_failure_aborts_before_any_mutation() {
    let mut store = MemoryStore::new();
    store.set_offline(true);

    let mut room = Descriptor::for_ground("ex:Room").with_supers().build();
    if let Some(supers) = room.supers_mut() {
        supers.add(iri("ex:Location"));
    }

    match room.write_axioms(&mut store) {
        Err(SyncError::Query { facet, .. }) => assert_eq!(facet, FacetKind::Super),
        other => panic!("expected query error, got {other:?}"),
    }
    store.set_offline(false);
    assert!(store.edge_targets(&iri("ex:Room"), EdgeKind::Super).is_empty());
}

#[test]
fn mutation_failure_carries_the_partial_log() {
    let mut store = MemoryStore::new();
    let mut room = Descriptor::for_ground("ex:Room")
        .with_types()
        .with_supers()
        .build();
    if let Some(types) = room.types_mut() {
        types.add(iri("ex:Location"));
    }
    if let Some(supers) = room.supers_mut() {
        supers.add(iri("ex:Area"));
    }
    // First mutation (the type assert) lands, the second faults.
    store.set_mutation_budget(1);

    match room.write_axioms(&mut store) {
        Err(err @ SyncError::Mutation { .. }) => {
            let partial = err.partial_log().map(|log| log.len());
            assert_eq!(partial, Some(1));
            if let SyncError::Mutation { facet, .. } = err {
                assert_eq!(facet, FacetKind::Super);
            }
        }
        other => panic!("expected mutation error, got {other:?}"),
    }
}

#[derive(Default)]
struct CollectingSink(Mutex<Vec<Diagnostic>>);

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut seen) = self.0.lock() {
            seen.push(diagnostic.clone());
        }
    }
}

#[test]
fn ambiguous_definition_first_wins_emits_diagnostic() -> Result<()> {
    let mut store = MemoryStore::new();
    let ground = iri("ex:Room");
    store.seed_definition(&ground, [min_doors()], true);
    store.seed_definition(&ground, [Restriction::Class(iri("ex:Area"))], true);

    let sink = Arc::new(CollectingSink::default());
    let mut room = Descriptor::for_ground(&ground)
        .with_restrictions()
        .with_sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
        .build();
    room.read_axioms(&mut store)?;

    // First group wins.
    let held: Vec<&Restriction> = room.restrictions().into_iter().flatten().collect();
    assert_eq!(held, vec![&min_doors()]);
    let seen = sink.0.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
    assert_eq!(
        *seen,
        vec![Diagnostic::AmbiguousDefinition {
            ground: ground.clone(),
            groups: 2
        }]
    );
    Ok(())
}

#[test]
fn ambiguous_definition_is_fatal_under_strict_policy() {
    let mut store = MemoryStore::new();
    let ground = iri("ex:Room");
    store.seed_definition(&ground, [min_doors()], true);
    store.seed_definition(&ground, [Restriction::Class(iri("ex:Area"))], true);

    let mut room = Descriptor::for_ground(&ground)
        .with_restrictions()
        .with_policy(AmbiguityPolicy::Strict)
        .build();
    match room.read_axioms(&mut store) {
        Err(SyncError::AmbiguousDefinition { groups, .. }) => assert_eq!(groups, 2),
        other => panic!("expected ambiguity error, got {other:?}"),
    }
}

#[test]
fn empty_cycle_is_a_no_op() -> Result<()> {
    let mut store = MemoryStore::new();
    let mut room = Descriptor::for_ground("ex:Room")
        .with_types()
        .with_subs()
        .with_supers()
        .with_disjoints()
        .with_equivalents()
        .with_object_links()
        .with_data_links()
        .with_restrictions()
        .build();
    assert!(room.read_axioms(&mut store)?.is_empty());
    assert!(room.write_axioms(&mut store)?.is_empty());
    Ok(())
}

#[test]
fn local_removal_retracts_and_settles() -> Result<()> {
    let mut store = MemoryStore::new();
    store.seed_edge("ex:Room", EdgeKind::Type, "ex:Location");

    let mut room = Descriptor::for_ground("ex:Room").with_types().build();
    if let Some(types) = room.types_mut() {
        types.add(iri("ex:Location"));
    }
    // Held equals external: nothing to do.
    assert!(room.write_axioms(&mut store)?.is_empty());

    if let Some(types) = room.types_mut() {
        // Removing an absent element is a no-change, not an error.
        assert!(!types.remove(&iri("ex:Agent")));
        assert!(types.remove(&iri("ex:Location")));
    }
    let log = room.write_axioms(&mut store)?;
    assert_eq!(log.len(), 1);
    assert_eq!(log.applied_count(), 1);
    assert!(store.edge_targets(&iri("ex:Room"), EdgeKind::Type).is_empty());
    assert!(room.write_axioms(&mut store)?.is_empty());
    Ok(())
}
