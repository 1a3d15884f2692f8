//! Audit records of attempted store mutations.
//!
//! Every read and write cycle returns a [`ChangeLog`]: an ordered list of
//! [`MappingIntent`] records, one per element the cycle touched. Writes
//! log the store calls they issued; reads log the held-set merges in the
//! same shape, so both directions are auditable and testable uniformly.

use std::fmt;

use crate::entity::Iri;
use crate::facet::FacetKind;
use crate::link::Literal;
use crate::restriction::Restriction;
use crate::store::ChangeApplied;

/// The element a mapping intent applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxiomElement {
    /// A plain entity reference (edge and group facets).
    Entity(Iri),
    /// One (property, individual) pair of an object link.
    ObjectLink {
        /// The linking property.
        property: Iri,
        /// The linked individual.
        value: Iri,
    },
    /// One (property, literal) pair of a data link.
    DataLink {
        /// The linking property.
        property: Iri,
        /// The linked literal.
        value: Literal,
    },
    /// One restriction conjunct.
    Restriction(Restriction),
}

impl fmt::Display for AxiomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxiomElement::Entity(iri) => write!(f, "{iri}"),
            AxiomElement::ObjectLink { property, value } => write!(f, "{property} -> {value}"),
            AxiomElement::DataLink { property, value } => write!(f, "{property} -> {value}"),
            AxiomElement::Restriction(r) => write!(f, "{r}"),
        }
    }
}

/// The direction of one attempted change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Change {
    /// The element was asserted (write) or merged into the held set
    /// (read).
    Add(AxiomElement),
    /// The element was retracted (write) or dropped from the held set
    /// (read).
    Remove(AxiomElement),
}

impl Change {
    /// Returns the element the change applies to.
    #[must_use]
    pub fn element(&self) -> &AxiomElement {
        match self {
            Change::Add(e) | Change::Remove(e) => e,
        }
    }
}

/// An immutable record of one mutation attempted against the store (or,
/// for reads, one merge applied to the held set).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingIntent {
    /// The facet the change belongs to.
    pub facet: FacetKind,
    /// What was added or removed.
    pub change: Change,
    /// The change handle the store (or held set) reported.
    pub applied: ChangeApplied,
}

impl MappingIntent {
    /// Creates a record of an addition.
    #[must_use]
    pub fn added(facet: FacetKind, element: AxiomElement, applied: ChangeApplied) -> Self {
        MappingIntent {
            facet,
            change: Change::Add(element),
            applied,
        }
    }

    /// Creates a record of a removal.
    #[must_use]
    pub fn removed(facet: FacetKind, element: AxiomElement, applied: ChangeApplied) -> Self {
        MappingIntent {
            facet,
            change: Change::Remove(element),
            applied,
        }
    }
}

impl fmt::Display for MappingIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, element) = match &self.change {
            Change::Add(e) => ('+', e),
            Change::Remove(e) => ('-', e),
        };
        let status = match self.applied {
            ChangeApplied::Success => "applied",
            ChangeApplied::NoOperation => "no-op",
        };
        write!(f, "[{}] {sign}{element} ({status})", self.facet)
    }
}

/// The ordered record of mutations attempted during one read or write
/// cycle. An empty log means the cycle was a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeLog {
    entries: Vec<MappingIntent>,
}

impl ChangeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record.
    pub fn push(&mut self, intent: MappingIntent) {
        self.entries.push(intent);
    }

    /// Appends all records of another log, preserving order.
    pub fn extend(&mut self, other: ChangeLog) {
        self.entries.extend(other.entries);
    }

    /// Iterates the records in the order they were attempted.
    pub fn iter(&self) -> std::slice::Iter<'_, MappingIntent> {
        self.entries.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the count of records whose change actually took effect.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.applied == ChangeApplied::Success)
            .count()
    }

    /// Returns the records belonging to one facet.
    pub fn for_facet(&self, facet: FacetKind) -> impl Iterator<Item = &MappingIntent> {
        self.entries.iter().filter(move |e| e.facet == facet)
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a MappingIntent;
    type IntoIter = std::slice::Iter<'a, MappingIntent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ChangeLog {
    type Item = MappingIntent;
    type IntoIter = std::vec::IntoIter<MappingIntent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<MappingIntent> for ChangeLog {
    fn from_iter<I: IntoIterator<Item = MappingIntent>>(iter: I) -> Self {
        ChangeLog {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(facet: FacetKind, applied: ChangeApplied) -> MappingIntent {
        MappingIntent::added(facet, AxiomElement::Entity(Iri::new("ex:A")), applied)
    }

    #[test]
    fn applied_count_ignores_no_ops() {
        let mut log = ChangeLog::new();
        log.push(intent(FacetKind::Super, ChangeApplied::Success));
        log.push(intent(FacetKind::Super, ChangeApplied::NoOperation));
        log.push(intent(FacetKind::Type, ChangeApplied::Success));
        assert_eq!(log.len(), 3);
        assert_eq!(log.applied_count(), 2);
        assert_eq!(log.for_facet(FacetKind::Super).count(), 2);
    }

    #[test]
    fn display_shows_direction_and_status() {
        let i = MappingIntent::removed(
            FacetKind::Disjoint,
            AxiomElement::Entity(Iri::new("ex:B")),
            ChangeApplied::NoOperation,
        );
        assert_eq!(i.to_string(), "[disjoint] -ex:B (no-op)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_serde() -> Result<(), serde_json::Error> {
        let mut log = ChangeLog::new();
        log.push(intent(FacetKind::Equivalent, ChangeApplied::Success));
        let json = serde_json::to_string(&log)?;
        let back: ChangeLog = serde_json::from_str(&json)?;
        assert_eq!(log, back);
        Ok(())
    }
}
