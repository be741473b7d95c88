use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Array, Enum, Leaf, List, Map, Pointer, Struct};

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable enumeration of "kinds" of a reflected type.
///
/// Each variant contains a trait object with methods specific to a kind of
/// type. A [`ReflectRef`] is obtained via [`Reflect::reflect_ref`].
pub enum ReflectRef<'a> {
    Leaf(&'a dyn Leaf),
    Opaque(&'a dyn Reflect),
    Struct(&'a dyn Struct),
    Enum(&'a dyn Enum),
    Array(&'a dyn Array),
    List(&'a dyn List),
    Map(&'a dyn Map),
    /// `None`, or the value inside `Some`.
    Optional(Option<&'a dyn Reflect>),
    Pointer(&'a dyn Pointer),
    /// The value inside a `Box<dyn Reflect>`.
    Dynamic(&'a dyn Reflect),
}

impl ReflectRef<'_> {
    /// Returns the [`ReflectKind`] of this view.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Leaf(_) => ReflectKind::Leaf,
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Array(_) => ReflectKind::Array,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Dynamic(_) => ReflectKind::Dynamic,
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable enumeration of "kinds" of a reflected type.
///
/// A [`ReflectMut`] is obtained via [`Reflect::reflect_mut`].
pub enum ReflectMut<'a> {
    Leaf(&'a mut dyn Leaf),
    Opaque(&'a mut dyn Reflect),
    Struct(&'a mut dyn Struct),
    Enum(&'a mut dyn Enum),
    Array(&'a mut dyn Array),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Optional(Option<&'a mut dyn Reflect>),
    Pointer(&'a mut dyn Pointer),
    Dynamic(&'a mut dyn Reflect),
}

impl ReflectMut<'_> {
    /// Returns the [`ReflectKind`] of this view.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Leaf(_) => ReflectKind::Leaf,
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Array(_) => ReflectKind::Array,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Dynamic(_) => ReflectKind::Dynamic,
        }
    }
}
