use alloc::boxed::Box;

use crate::Reflect;

/// A reflected map: `HashMap` and `BTreeMap`.
pub trait Map: Reflect {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the entries in map order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + Send + '_>;
}
