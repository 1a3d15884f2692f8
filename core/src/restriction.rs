//! Property restrictions forming compound class definitions.
//!
//! A single [`Restriction`] describes one constraint on a ground entity
//! (a cardinality bound, a value quantifier, or a named parent class). The
//! store represents all restrictions held by one subject as a single
//! conjunctive definition axiom, which is why the restriction facet cannot
//! be patched element-by-element; see [`crate::facet::restriction`].

use std::fmt;

use crate::entity::Iri;

/// The quantifier/cardinality kind of a property restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    /// At least `n` successors (`owl:minCardinality`).
    Min(u32),
    /// At most `n` successors (`owl:maxCardinality`).
    Max(u32),
    /// Exactly `n` successors (`owl:cardinality`).
    Exact(u32),
    /// At least one successor in the filler (`owl:someValuesFrom`).
    SomeValues,
    /// All successors in the filler (`owl:allValuesFrom`).
    OnlyValues,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Min(n) => write!(f, "min {n}"),
            Constraint::Max(n) => write!(f, "max {n}"),
            Constraint::Exact(n) => write!(f, "exactly {n}"),
            Constraint::SomeValues => f.write_str("some"),
            Constraint::OnlyValues => f.write_str("only"),
        }
    }
}

/// One conjunct of a ground entity's compound definition.
///
/// A closed set of variants: a plain named parent class, or a constrained
/// data/object property. Multiple restrictions held by one subject are
/// AND-combined into a single definition axiom by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restriction {
    /// "is-a class X", materialized by the store as a subsumption edge in
    /// addition to the definition conjunct.
    Class(Iri),
    /// A constraint on a data property ranging over a datatype.
    Data {
        /// The restricted data property.
        property: Iri,
        /// Quantifier or cardinality bound.
        constraint: Constraint,
        /// The datatype the property values are drawn from.
        datatype: Iri,
    },
    /// A constraint on an object property ranging over a class.
    Object {
        /// The restricted object property.
        property: Iri,
        /// Quantifier or cardinality bound.
        constraint: Constraint,
        /// The class the property successors are drawn from.
        filler: Iri,
    },
}

impl Restriction {
    /// Returns the named class if this is a plain `Class` conjunct.
    ///
    /// The compound writer uses this to retract the subsumption edge the
    /// store materializes alongside a `Class` conjunct.
    #[must_use]
    pub fn as_class(&self) -> Option<&Iri> {
        match self {
            Restriction::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Returns the restricted property, if any.
    #[must_use]
    pub fn property(&self) -> Option<&Iri> {
        match self {
            Restriction::Class(_) => None,
            Restriction::Data { property, .. } | Restriction::Object { property, .. } => {
                Some(property)
            }
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Class(class) => write!(f, "class {class}"),
            Restriction::Data {
                property,
                constraint,
                datatype,
            } => write!(f, "{property} {constraint} {datatype}"),
            Restriction::Object {
                property,
                constraint,
                filler,
            } => write!(f, "{property} {constraint} {filler}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_accessor() {
        let class = Restriction::Class(Iri::new("ex:Location"));
        assert_eq!(class.as_class(), Some(&Iri::new("ex:Location")));
        assert_eq!(class.property(), None);

        let min_doors = Restriction::Object {
            property: Iri::new("ex:hasDoor"),
            constraint: Constraint::Min(2),
            filler: Iri::new("ex:Door"),
        };
        assert_eq!(min_doors.as_class(), None);
        assert_eq!(min_doors.property(), Some(&Iri::new("ex:hasDoor")));
    }

    #[test]
    fn display_is_readable() {
        let r = Restriction::Object {
            property: Iri::new("ex:hasDoor"),
            constraint: Constraint::Min(2),
            filler: Iri::new("ex:Door"),
        };
        assert_eq!(r.to_string(), "ex:hasDoor min 2 ex:Door");
    }
}
