//! Uniqueness-preserving facet collections.
//!
//! A [`TypedSet`] holds the values of one semantic facet of a ground
//! entity, such as its types or its super-classes. Elements are unique
//! under value equality; an optional singleton constraint keeps at most
//! one element, latest insertion winning.

/// A set of facet values with optional singleton semantics.
///
/// Backed by an insertion-ordered `Vec` so that "latest wins" under the
/// singleton constraint is observable, and so reads that rebuild the set
/// from a store query keep the query's order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypedSet<T> {
    items: Vec<T>,
    singleton: bool,
}

impl<T> Default for TypedSet<T> {
    fn default() -> Self {
        TypedSet {
            items: Vec::new(),
            singleton: false,
        }
    }
}

impl<T: PartialEq> TypedSet<T> {
    /// Creates an empty set without the singleton constraint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with the singleton constraint enabled.
    #[must_use]
    pub fn singleton() -> Self {
        TypedSet {
            items: Vec::new(),
            singleton: true,
        }
    }

    /// Inserts a value, returning `true` iff the set's content changed.
    ///
    /// Under the singleton constraint the existing content is cleared
    /// first, so inserting a different element always reports a change and
    /// leaves exactly that element behind.
    pub fn add(&mut self, value: T) -> bool {
        if self.singleton {
            if self.items.len() == 1 && self.items[0] == value {
                return false;
            }
            self.items.clear();
            self.items.push(value);
            return true;
        }
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Removes a value, returning `true` iff it was present.
    ///
    /// Removing an absent value is not an error; it reports "no change".
    pub fn remove(&mut self, value: &T) -> bool {
        match self.items.iter().position(|v| v == value) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns true if the value is a member of the set.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Enables or disables the singleton constraint.
    ///
    /// Deliberately non-retroactive: existing content is never trimmed,
    /// only future [`add`](Self::add) calls enforce the constraint.
    pub fn set_singleton(&mut self, singleton: bool) {
        self.singleton = singleton;
    }

    /// Returns true if the singleton constraint is enabled.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the first member in insertion order, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Iterates the members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes all members, keeping the singleton flag.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Looks up the member equal to `value` and returns a mutable
    /// reference to the stored copy.
    ///
    /// Used by the link facets, where equality is coarser than identity
    /// (links compare by property only) and the stored value set must be
    /// merged in place.
    pub fn get_mut(&mut self, value: &T) -> Option<&mut T> {
        self.items.iter_mut().find(|v| *v == value)
    }
}

impl<T: PartialEq> Extend<T> for TypedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: PartialEq> FromIterator<T> for TypedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TypedSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a TypedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for TypedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_rejected() {
        let mut set = TypedSet::new();
        assert!(set.add("a"));
        assert!(!set.add("a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn removal_of_absent_value_is_no_change() {
        let mut set = TypedSet::from_iter(["a"]);
        assert!(!set.remove(&"b"));
        assert!(set.remove(&"a"));
        assert!(set.is_empty());
    }

    #[test]
    fn singleton_latest_wins() {
        let mut set = TypedSet::singleton();
        assert!(set.add("a"));
        assert!(set.add("b"));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&"b"));
        assert!(!set.contains(&"a"));
    }

    #[test]
    fn singleton_same_value_is_no_change() {
        let mut set = TypedSet::singleton();
        assert!(set.add("a"));
        assert!(!set.add("a"));
    }

    #[test]
    fn set_singleton_is_not_retroactive() {
        let mut set = TypedSet::from_iter(["a", "b"]);
        set.set_singleton(true);
        // Existing content is kept; only the next add enforces the flag.
        assert_eq!(set.len(), 2);
        assert!(set.add("c"));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&"c"));
    }
}
