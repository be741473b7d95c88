use alloc::boxed::Box;

use op_value::Value;

use crate::Reflect;
use crate::construct::{Constructor, Instantiate};
use crate::info::{Type, Typed};
use crate::ops::Leaf;
use crate::transform::TransformerDecl;

// -----------------------------------------------------------------------------
// LeafInfo

/// A container for the info of an admitted leaf type.
///
/// Leaves are converted to and from a [`Value`] directly, numbers with
/// range-checked coercion.
#[derive(Debug)]
pub struct LeafInfo {
    ty: Type,
    from_value: fn(&Value) -> Option<Box<dyn Reflect>>,
    blank: fn() -> Box<dyn Reflect>,
}

impl LeafInfo {
    /// Create a new [`LeafInfo`].
    #[inline]
    pub fn new<T: Leaf + Typed + Instantiate>() -> Self {
        Self {
            ty: Type::of::<T>(),
            from_value: boxed_from_value::<T>,
            blank: boxed_blank::<T>,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Converts a document value into this leaf type.
    ///
    /// ```
    /// use op_reflect::info::Typed;
    /// use op_value::Value;
    ///
    /// let info = u8::type_info().as_leaf().unwrap();
    /// let value = info.from_value(&Value::Int(200)).unwrap();
    /// assert_eq!(value.downcast_ref::<u8>(), Some(&200));
    /// assert!(info.from_value(&Value::Int(300)).is_none());
    /// ```
    #[inline]
    pub fn from_value(&self, value: &Value) -> Option<Box<dyn Reflect>> {
        (self.from_value)(value)
    }

    /// Returns the blank value, e.g. `0` or an empty string.
    #[inline]
    pub fn blank(&self) -> Box<dyn Reflect> {
        (self.blank)()
    }
}

fn boxed_from_value<T: Leaf>(value: &Value) -> Option<Box<dyn Reflect>> {
    T::from_value(value).map(|leaf| Box::new(leaf) as Box<dyn Reflect>)
}

fn boxed_blank<T: Leaf + Instantiate>() -> Box<dyn Reflect> {
    Box::new(T::instantiate())
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// A container for the info of an opaque type.
///
/// Opaque types expose no structure. They are only marshalled through a
/// conversion hook, declared on the type or registered against it.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
    interfaces: Box<[Type]>,
    transformer: Option<TransformerDecl>,
    constructor: Constructor,
}

impl OpaqueInfo {
    /// Create a new [`OpaqueInfo`].
    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            interfaces: Box::new([]),
            transformer: None,
            constructor: Constructor::None,
        }
    }

    /// Replaces the readable type path.
    #[inline]
    pub fn with_type_path(mut self, path: &'static str) -> Self {
        self.ty = self.ty.with_path(path);
        self
    }

    /// Sets the implemented interfaces.
    #[inline]
    pub fn with_interfaces(mut self, interfaces: &[Type]) -> Self {
        self.interfaces = interfaces.into();
        self
    }

    /// Sets the type-level conversion hook.
    #[inline]
    pub fn with_transformer(mut self, transformer: TransformerDecl) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Sets how blank instances are created.
    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the implemented interfaces.
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// Returns the type-level conversion hook.
    #[inline]
    pub const fn transformer(&self) -> Option<&TransformerDecl> {
        self.transformer.as_ref()
    }

    /// Returns how blank instances are created.
    #[inline]
    pub const fn constructor(&self) -> Constructor {
        self.constructor
    }
}
