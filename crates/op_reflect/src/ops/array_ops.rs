use op_value::ArrayValue;

use crate::Reflect;

/// A reflected array: `Vec<T>`, `[T; N]` or `Box<[T]>`.
pub trait Array: Reflect {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the element at `index` mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Copies the elements into natively stored [`ArrayValue`], if the
    /// element type is a native scalar.
    ///
    /// ```
    /// use op_reflect::ops::Array;
    /// use op_value::NativeKind;
    ///
    /// let native = vec![1_i32, 2, 3].to_native().unwrap();
    /// assert_eq!(native.native_kind(), Some(NativeKind::I32));
    /// assert!(vec![String::new()].to_native().is_none());
    /// ```
    fn to_native(&self) -> Option<ArrayValue>;
}
