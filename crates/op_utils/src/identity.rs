use core::any::TypeId;

use hashbrown::HashSet;

use crate::hash::FixedHashState;

// -----------------------------------------------------------------------------
// Identity

/// The identity of a live object: its address paired with its type.
///
/// The address alone is not enough, a struct and its first field share one.
/// Two distinct live objects never share both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    /// Create the identity of the object behind `value`.
    #[inline]
    pub fn of<T: ?Sized + 'static>(value: &T) -> Self {
        Self {
            address: core::ptr::from_ref(value).cast::<()>() as usize,
            type_id: TypeId::of::<T>(),
        }
    }

    /// Create an identity from raw parts.
    #[inline]
    pub const fn from_raw(address: usize, type_id: TypeId) -> Self {
        Self { address, type_id }
    }

    /// Returns the address part.
    #[inline]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Returns the type part.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }
}

// -----------------------------------------------------------------------------
// IdentitySet

/// The set of objects currently being expanded by a traversal.
///
/// # Examples
///
/// ```
/// use op_utils::{Identity, IdentitySet};
///
/// let value = 5_u32;
/// let mut set = IdentitySet::new();
///
/// assert!(set.enter(Identity::of(&value)));
/// assert!(!set.enter(Identity::of(&value)));
///
/// set.leave(Identity::of(&value));
/// assert!(set.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct IdentitySet(HashSet<Identity, FixedHashState>);

impl IdentitySet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self(HashSet::with_hasher(FixedHashState))
    }

    /// Marks `identity` as being expanded.
    ///
    /// Returns `false` if it already was, which means a cycle.
    #[inline]
    pub fn enter(&mut self, identity: Identity) -> bool {
        self.0.insert(identity)
    }

    /// Returns `true` if `identity` is being expanded.
    #[inline]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.0.contains(identity)
    }

    /// Marks `identity` as finished.
    #[inline]
    pub fn leave(&mut self, identity: Identity) {
        self.0.remove(&identity);
    }

    /// Returns the number of objects being expanded.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is being expanded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forgets every identity, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
