//! Containers for static storage of type information.
//!
//! ## NonGenericTypeInfoCell
//!
//! For non generic types, [`NonGenericTypeInfoCell`] stores the [`TypeInfo`].
//! Internally, there is an [`OnceLock<T>`], almost no additional expenses.
//!
//! ## GenericTypeInfoCell
//!
//! If the type is generic, the `static CELL` inside the function is shared by
//! every instantiation. Therefore, the inner of this container is a
//! [`TypeIdMap<T>`] wrapped in [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use op_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// See [`Typed`](crate::info::Typed) for an example.
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the `Info` stored in the cell.
    ///
    /// If there is no entry found, a new one will be generated from the given function.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of type information with generics.
///
/// ## Example
///
/// ```
/// use op_reflect::impls::GenericTypeInfoCell;
/// use op_reflect::info::{OpaqueInfo, TypeInfo, Typed};
///
/// struct Tagged<T>(T);
///
/// impl<T: 'static> Typed for Tagged<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(<Tagged<u8>>::type_info().type_is::<Tagged<u8>>());
/// assert!(<Tagged<i8>>::type_info().type_is::<Tagged<i8>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns a reference to the `Info` stored in the cell.
    ///
    /// This method will then return the correct `Info` reference for the given type `G`.
    /// If there is no entry found, a new one will be generated from the given function.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &TypeInfo {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
