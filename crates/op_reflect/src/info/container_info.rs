use alloc::boxed::Box;
use alloc::vec::Vec;

use op_value::ArrayValue;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};
use crate::ops::{List, Map};

/// Builds a collection from finished elements, `None` if one has the wrong type.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>;

/// Builds a map from finished entries, `None` if one has the wrong type.
pub type FromEntriesFn = fn(Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Option<Box<dyn Reflect>>;

/// Copies a natively stored [`ArrayValue`] into an array type.
pub type FromNativeFn = fn(&ArrayValue) -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// ArrayInfo

/// A container for compile-time array info: `Vec<T>`, `[T; N]` and `Box<[T]>`.
///
/// # Examples
///
/// ```
/// use op_reflect::info::Typed;
///
/// let info = <[f32; 3]>::type_info().as_array().unwrap();
/// assert_eq!(info.fixed_len(), Some(3));
/// assert!(info.item_info().type_is::<f32>());
/// ```
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    fixed_len: Option<usize>,
    from_items: FromItemsFn,
    from_native: FromNativeFn,
}

impl ArrayInfo {
    /// Create a new [`ArrayInfo`].
    pub fn new<T: Typed, Item: Typed>(
        fixed_len: Option<usize>,
        from_items: FromItemsFn,
        from_native: FromNativeFn,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item: Item::type_info,
            fixed_len,
            from_items,
            from_native,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the element type's [`TypeInfo`].
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// Returns `N` for `[T; N]`, `None` for growable arrays.
    #[inline]
    pub const fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    /// Builds an array from finished elements.
    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_items)(items)
    }

    /// Copies a native [`ArrayValue`] with a matching element type.
    #[inline]
    pub fn from_native(&self, array: &ArrayValue) -> Option<Box<dyn Reflect>> {
        (self.from_native)(array)
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// A container for compile-time list info: `VecDeque`, `LinkedList`,
/// `BTreeSet` and `HashSet`.
///
/// Every list implements the interface `dyn List`, which is where the
/// predefined list conversion hook is registered.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    interfaces: [Type; 1],
    from_items: FromItemsFn,
}

impl ListInfo {
    /// Create a new [`ListInfo`].
    pub fn new<T: Typed, Item: Typed>(from_items: FromItemsFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            item: Item::type_info,
            interfaces: [Type::of::<dyn List>()],
            from_items,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the element type's [`TypeInfo`].
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// Returns the implemented interfaces.
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// Builds a list from finished elements.
    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// A container for compile-time map info: `HashMap` and `BTreeMap`.
///
/// Every map implements the interface `dyn Map`, which is where the
/// predefined map conversion hook is registered.
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
    interfaces: [Type; 1],
    from_entries: FromEntriesFn,
}

impl MapInfo {
    /// Create a new [`MapInfo`].
    pub fn new<T: Typed, K: Typed, V: Typed>(from_entries: FromEntriesFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            key: K::type_info,
            value: V::type_info,
            interfaces: [Type::of::<dyn Map>()],
            from_entries,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the key type's [`TypeInfo`].
    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    /// Returns the value type's [`TypeInfo`].
    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }

    /// Returns the implemented interfaces.
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// Builds a map from finished entries.
    #[inline]
    pub fn from_entries(
        &self,
        entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
    ) -> Option<Box<dyn Reflect>> {
        (self.from_entries)(entries)
    }
}
