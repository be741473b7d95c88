use core::any::TypeId;
use core::fmt;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::hash::NoOpHashState;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`], for per-type tables such as descriptor caches
/// and hook registrations.
///
/// `TypeId` is already a hash, so keys are not hashed again.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use op_utils::TypeIdMap;
///
/// let mut hooks: TypeIdMap<Vec<&str>> = TypeIdMap::new();
/// hooks.get_or_insert(TypeId::of::<u32>(), Vec::new).push("hex");
/// hooks.get_or_insert(TypeId::of::<u32>(), Vec::new).push("padded");
///
/// assert_eq!(hooks.get(&TypeId::of::<u32>()).unwrap().len(), 2);
/// assert!(!hooks.contains(&TypeId::of::<i32>()));
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the value of `type_id`, inserting `f()` first if there is none.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: &TypeId) -> Option<&mut V> {
        self.0.get_mut(type_id)
    }

    /// Inserts `value`, returning the value previously stored for `type_id`.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    #[inline]
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        self.0.remove(type_id)
    }

    /// Removes every entry, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }

    /// Iterates over the entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.0.iter()
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn removing_the_last_entry_empties_the_map() {
        let mut map = TypeIdMap::new();
        assert!(map.insert(TypeId::of::<u8>(), 1).is_none());
        assert_eq!(map.insert(TypeId::of::<u8>(), 2), Some(1));
        assert_eq!(map.len(), 1);

        *map.get_mut(&TypeId::of::<u8>()).unwrap() += 1;
        assert_eq!(map.remove(&TypeId::of::<u8>()), Some(3));
        assert!(map.is_empty());
    }
}
