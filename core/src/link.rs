//! Property links: a property paired with its own set of values.
//!
//! Links carry individual-to-individual (object) and individual-to-literal
//! (data) assertions. A [`Link`] compares by property identity only, not
//! by its value contents: two links for `ex:hasColor` are the same facet
//! member regardless of which colors they carry. Reads merge values into
//! the held link; writes fan out one store call per (property, value)
//! pair.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::entity::Iri;
use crate::set::TypedSet;

/// A literal value carried by a data link.
///
/// Deliberately float-free so literals stay `Eq + Hash` and can live in a
/// [`TypedSet`]; non-integral numerics travel in lexical form via
/// [`Literal::Typed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// A plain string literal.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// A literal in lexical form with an explicit datatype.
    Typed {
        /// The lexical representation (e.g., `"2.5"`).
        lexical: String,
        /// The datatype IRI (e.g., `xsd:decimal`).
        datatype: Iri,
    },
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "\"{s}\""),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Typed { lexical, datatype } => write!(f, "\"{lexical}\"^^{datatype}"),
        }
    }
}

/// One property of a ground entity together with its held values.
///
/// Equality and hashing are **by property only**. Consequently the
/// reconciler partitions links by property: a property present on both
/// sides counts as `unchanged` even when its values differ. Reads merge
/// queried values into such links; a write cycle does not reconcile
/// value-level drift inside them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link<V> {
    /// The linking property.
    pub property: Iri,
    /// The values held for that property.
    pub values: TypedSet<V>,
}

impl<V: PartialEq> Link<V> {
    /// Creates a link with no values yet.
    #[must_use]
    pub fn new(property: Iri) -> Self {
        Link {
            property,
            values: TypedSet::new(),
        }
    }

    /// Creates a link holding the given values.
    pub fn with_values(property: Iri, values: impl IntoIterator<Item = V>) -> Self {
        Link {
            property,
            values: values.into_iter().collect(),
        }
    }

    /// Creates a link whose value set enforces the singleton constraint
    /// (functional-property usage).
    #[must_use]
    pub fn functional(property: Iri) -> Self {
        Link {
            property,
            values: TypedSet::singleton(),
        }
    }
}

impl<V> PartialEq for Link<V> {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
    }
}

impl<V> Eq for Link<V> {}

impl<V> Hash for Link<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.property.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_values() {
        let a = Link::with_values(Iri::new("ex:hasColor"), [Literal::Str("red".into())]);
        let b = Link::with_values(Iri::new("ex:hasColor"), [Literal::Str("blue".into())]);
        assert_eq!(a, b);
        assert_ne!(a, Link::<Literal>::new(Iri::new("ex:hasShape")));
    }

    #[test]
    fn links_deduplicate_by_property_in_typed_sets() {
        let mut set = TypedSet::new();
        assert!(set.add(Link::with_values(Iri::new("ex:isIn"), [Iri::new("ex:Room1")])));
        assert!(!set.add(Link::with_values(Iri::new("ex:isIn"), [Iri::new("ex:Room2")])));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn functional_link_keeps_latest_value() {
        let mut link = Link::functional(Iri::new("ex:isIn"));
        link.values.add(Iri::new("ex:Room1"));
        link.values.add(Iri::new("ex:Room2"));
        assert_eq!(link.values.len(), 1);
        assert!(link.values.contains(&Iri::new("ex:Room2")));
    }
}
