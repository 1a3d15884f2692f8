//! Structured diagnostics emitted during reconciliation.
//!
//! Non-fatal conditions (today: a ground entity carrying more than one
//! definition axiom group) are reported as [`Diagnostic`] events to an
//! injected [`DiagnosticSink`], never printed to a global stream. The
//! default sink forwards to `tracing` with structured fields.

use crate::entity::Iri;

/// How to treat a store that reports more than one conjunctive
/// restriction-axiom group for an entity expected to carry exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmbiguityPolicy {
    /// Keep reconciliation total on malformed data: take the first
    /// observed group and emit [`Diagnostic::AmbiguousDefinition`].
    #[default]
    FirstWins,
    /// Fail the read with
    /// [`SyncError::AmbiguousDefinition`](crate::SyncError::AmbiguousDefinition).
    Strict,
}

/// A non-fatal condition observed during a read or write cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// The store returned several definition axiom groups for one ground
    /// entity; the first was used, the rest ignored.
    AmbiguousDefinition {
        /// The entity whose definition is ambiguous.
        ground: Iri,
        /// How many groups the store reported.
        groups: usize,
    },
}

/// Receiver for [`Diagnostic`] events.
///
/// Injected into a descriptor at build time; implementations must be
/// shareable across cycles.
pub trait DiagnosticSink: Send + Sync {
    /// Receives one diagnostic event.
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Default sink: forwards diagnostics to `tracing` as structured events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::AmbiguousDefinition { ground, groups } => {
                tracing::warn!(
                    ground = %ground,
                    groups,
                    "entity carries multiple definition axiom groups; using the first"
                );
            }
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collector(Mutex<Vec<Diagnostic>>);

    impl DiagnosticSink for Collector {
        fn emit(&self, diagnostic: &Diagnostic) {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(diagnostic.clone());
            }
        }
    }

    #[test]
    fn sinks_are_injectable() {
        let sink = Collector(Mutex::new(Vec::new()));
        sink.emit(&Diagnostic::AmbiguousDefinition {
            ground: Iri::new("ex:Room"),
            groups: 2,
        });
        let seen = match sink.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        assert_eq!(seen.len(), 1);
    }
}
