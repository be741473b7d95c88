use alloc::boxed::Box;

use crate::Reflect;

/// A reflected list-like collection: `VecDeque`, `LinkedList`, `BTreeSet`
/// and `HashSet`.
pub trait List: Reflect {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the elements in collection order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + Send + '_>;
}
