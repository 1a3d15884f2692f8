//! Reconciliation core keeping in-memory entity descriptors in sync with
//! an OWL ontology store.
//!
//! The crate maps typed, optionally-singleton facet collections
//! ([`TypedSet`]) of a named ground entity onto the axioms an external
//! store holds for it, computes the minimal difference between the two
//! ([`reconcile`] → [`SynchronisationIntent`]), and translates that
//! difference into store mutations, including the compound-restriction
//! case where a conjunctive definition axiom must be unlocked, rewritten,
//! and re-packed as a whole.
//!
//! The store itself is a collaborator behind the [`OntologyStore`] trait;
//! this crate performs no reasoning and owns no persistence format. It
//! reconciles *declared* facts with *queried* facts, nothing more.
//!
//! # Entry Point
//!
//! ```no_run
//! use owlsync::Descriptor;
//!
//! # fn demo(store: &mut dyn owlsync::OntologyStore) -> Result<(), owlsync::SyncError> {
//! let mut room = Descriptor::for_ground("ex:Room")
//!     .with_supers()
//!     .with_disjoints()
//!     .with_restrictions()
//!     .build();
//!
//! room.read_axioms(store)?; // store → held sets
//! if let Some(supers) = room.supers_mut() {
//!     supers.add("ex:Location".into());
//! }
//! let log = room.write_axioms(store)?; // held sets → store, audited
//! assert!(log.iter().count() >= 1);
//! # Ok(()) }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod changelog;
pub mod descriptor;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod facet;
pub mod intent;
pub mod link;
pub mod restriction;
pub mod set;
pub mod store;

pub use changelog::{AxiomElement, Change, ChangeLog, MappingIntent};
pub use descriptor::{Descriptor, DescriptorBuilder};
pub use diagnostics::{AmbiguityPolicy, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use entity::{vocab, Iri};
pub use error::SyncError;
pub use facet::FacetKind;
pub use intent::{reconcile, SynchronisationIntent};
pub use link::{Link, Literal};
pub use restriction::{Constraint, Restriction};
pub use set::TypedSet;
pub use store::{ChangeApplied, EdgeKind, GroupKind, OntologyStore, StoreError};
