//! Helpers for work stacks that outlive a single traversal.
//!
//! A traversal stack usually borrows from its input, so it cannot be stored in
//! a long-lived struct as is. [`recycle`] empties the stack and hands back the
//! same allocation with a fresh element lifetime.

use alloc::vec::Vec;

/// Empties `stack` and returns its allocation re-typed as `Vec<U>`.
///
/// When `T` and `U` have the same size and alignment (frames that only differ
/// in a lifetime parameter), the standard library reuses the buffer in place.
///
/// # Examples
///
/// ```
/// use op_utils::stack::recycle;
///
/// fn frames<'a>(input: &'a str) -> Vec<&'a str> {
///     input.split(' ').collect()
/// }
///
/// let stack = frames("a b c");
/// let capacity = stack.capacity();
/// let reused: Vec<&'static str> = recycle(stack);
///
/// assert!(reused.is_empty());
/// assert_eq!(reused.capacity(), capacity);
/// ```
#[inline]
pub fn recycle<T, U>(mut stack: Vec<T>) -> Vec<U> {
    stack.clear();
    stack.into_iter().filter_map(|_| None).collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::recycle;

    struct Frame<'a> {
        _source: &'a [u8],
        _cursor: usize,
    }

    #[test]
    fn keeps_allocation() {
        let data = [1_u8, 2, 3];
        let mut stack: Vec<Frame<'_>> = Vec::with_capacity(16);
        stack.push(Frame {
            _source: &data,
            _cursor: 0,
        });
        let before = stack.capacity();

        let stack: Vec<Frame<'static>> = recycle(stack);
        assert!(stack.is_empty());
        assert_eq!(stack.capacity(), before);
    }
}
