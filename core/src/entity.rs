//! Entity references and well-known vocabulary IRIs.
//!
//! An [`Iri`] names something in the external store: a class, an
//! individual, or a property. It is an opaque, immutable value compared by
//! name; the core never inspects its structure.

use std::fmt;
use std::sync::Arc;

/// An opaque reference to a named entity in the store.
///
/// Cheap to clone (shared backing string) and compared by full name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Creates a reference from any string-like name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Iri(Arc::from(name.as_ref()))
    }

    /// Returns the full name of the referenced entity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this reference names the `owl:Nothing` bottom class.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        self.as_str() == vocab::OWL_NOTHING
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iri({})", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri(Arc::from(s))
    }
}

impl From<&Iri> for Iri {
    fn from(iri: &Iri) -> Self {
        iri.clone()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Iri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Iri {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Iri::from)
    }
}

/// Standard vocabulary IRIs used across the facet handlers.
pub mod vocab {
    use super::Iri;

    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// `owl:Thing` — the top class.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:Nothing` — the bottom class; the store's "nothing" sentinel.
    pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `owl:equivalentClass`.
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:disjointWith`.
    pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";

    /// Returns the `owl:Nothing` sentinel as an entity reference.
    #[must_use]
    pub fn nothing() -> Iri {
        Iri::new(OWL_NOTHING)
    }

    /// Returns the `owl:Thing` top class as an entity reference.
    #[must_use]
    pub fn thing() -> Iri {
        Iri::new(OWL_THING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compared_by_name() {
        let a = Iri::new("ex:Room");
        let b = Iri::from("ex:Room".to_string());
        assert_eq!(a, b);
        assert_ne!(a, Iri::new("ex:Door"));
    }

    #[test]
    fn nothing_sentinel() {
        assert!(vocab::nothing().is_nothing());
        assert!(!vocab::thing().is_nothing());
    }
}
