use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

/// Wraps a finished inner value, `None` if it has the wrong type.
pub type WrapFn = fn(Box<dyn Reflect>) -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// OptionalInfo

/// A container for `Option<T>` info.
///
/// `None` is written as [`Value::Null`](op_value::Value::Null),
/// `Some(x)` as `x` itself.
#[derive(Debug)]
pub struct OptionalInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
    some: WrapFn,
    none: fn() -> Box<dyn Reflect>,
}

impl OptionalInfo {
    /// Create a new [`OptionalInfo`].
    pub fn new<T: Typed, Inner: Typed>(some: WrapFn, none: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: Inner::type_info,
            some,
            none,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the inner type's [`TypeInfo`].
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Builds `Some(inner)`.
    #[inline]
    pub fn some(&self, inner: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
        (self.some)(inner)
    }

    /// Builds `None`.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// A container for pointer info: `Box<T>`, `Arc<T>`, `Mutex<T>`, `RwLock<T>`.
///
/// Pointers are transparent: they are written as their pointee.
#[derive(Debug)]
pub struct PointerInfo {
    ty: Type,
    pointee: fn() -> &'static TypeInfo,
    wrap: WrapFn,
    locking: bool,
}

impl PointerInfo {
    /// Create a new [`PointerInfo`].
    ///
    /// `locking` pointers must be locked to reach their pointee.
    pub fn new<T: Typed, Pointee: Typed>(wrap: WrapFn, locking: bool) -> Self {
        Self {
            ty: Type::of::<T>(),
            pointee: Pointee::type_info,
            wrap,
            locking,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the pointee's [`TypeInfo`].
    #[inline]
    pub fn pointee_info(&self) -> &'static TypeInfo {
        (self.pointee)()
    }

    /// Returns `true` for `Mutex` and `RwLock`.
    #[inline]
    pub const fn is_locking(&self) -> bool {
        self.locking
    }

    /// Wraps a finished pointee.
    #[inline]
    pub fn wrap(&self, pointee: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
        (self.wrap)(pointee)
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// The info of `Box<dyn Reflect>`.
///
/// The runtime type of the boxed value decides how it is written. Reading one
/// back needs a concrete type, given by `#[reflect(explicit_type = T)]` or by
/// a runtime type tag.
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    /// Create a new [`DynamicInfo`].
    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
