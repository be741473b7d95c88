use core::any::TypeId;
use core::fmt;

use crate::construct::Constructor;
use crate::info::{ArrayInfo, DynamicInfo, EnumInfo, LeafInfo, ListInfo, MapInfo};
use crate::info::{OpaqueInfo, OptionalInfo, PointerInfo, StructInfo, Type};
use crate::transform::TransformerDecl;

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// The kind decides how the engine walks a value:
///
/// - `Leaf`: converted to and from a [`Value`](op_value::Value) directly.
/// - `Opaque`: only marshalled through a conversion hook.
/// - `Struct`: walked field by field.
/// - `Enum`: fieldless enums, written as a name or an ordinal.
/// - `Array`: walked element by element.
/// - `List`, `Map`: collections, converted by the predefined hooks.
/// - `Optional`, `Pointer`: transparent wrappers.
/// - `Dynamic`: `Box<dyn Reflect>`, the runtime type decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Leaf,
    Opaque,
    Struct,
    Enum,
    Array,
    List,
    Map,
    Optional,
    Pointer,
    Dynamic,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => f.pad("Leaf"),
            Self::Opaque => f.pad("Opaque"),
            Self::Struct => f.pad("Struct"),
            Self::Enum => f.pad("Enum"),
            Self::Array => f.pad("Array"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Optional => f.pad("Optional"),
            Self::Pointer => f.pad("Pointer"),
            Self::Dynamic => f.pad("Dynamic"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug, thiserror::Error)]
#[error("reflect kind mismatch: expected {expected}, received {received}")]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static type information for reflected types.
///
/// A type's `TypeInfo` is provided by [`Typed`](crate::info::Typed), and
/// lives for the rest of the program.
///
/// Besides the kind-specific data, every `TypeInfo` answers the questions
/// hook resolution asks about a type: its base type, the interfaces it
/// implements and the conversion hook it declares.
///
/// # Examples
///
/// ```
/// use op_reflect::info::{ReflectKind, Typed};
///
/// let info = <Vec<u8>>::type_info();
/// assert_eq!(info.kind(), ReflectKind::Array);
/// assert!(info.type_is::<Vec<u8>>());
/// assert_eq!(info.as_array().unwrap().item_info().type_path(), "u8");
/// ```
#[derive(Debug)]
pub enum TypeInfo {
    Leaf(LeafInfo),
    Opaque(OpaqueInfo),
    Struct(StructInfo),
    Enum(EnumInfo),
    Array(ArrayInfo),
    List(ListInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Pointer(PointerInfo),
    Dynamic(DynamicInfo),
}

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to specific type information.
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_leaf: Leaf => LeafInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);

    /// Returns the [`ReflectKind`] for this `TypeInfo`.
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

    /// Returns the underlying [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Leaf(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    /// Returns the readable path of the described type.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Check if the described type is `T`.
    #[inline]
    pub fn type_is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Returns `true` for leaf kinds, which the engine converts directly.
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns the base type, for a struct declaring a `#[reflect(base)]` field.
    pub fn base(&self) -> Option<&'static TypeInfo> {
        match self {
            Self::Struct(info) => info.base_field().map(|field| field.type_info()),
            _ => None,
        }
    }

    /// Returns the interfaces the type implements, in declaration order.
    ///
    /// Lists and maps implicitly implement `dyn List` and `dyn Map`.
    pub fn interfaces(&self) -> &[Type] {
        match self {
            Self::Opaque(info) => info.interfaces(),
            Self::Struct(info) => info.interfaces(),
            Self::Enum(info) => info.interfaces(),
            Self::List(info) => info.interfaces(),
            Self::Map(info) => info.interfaces(),
            _ => &[],
        }
    }

    /// Returns the conversion hook declared on the type itself.
    pub fn transformer(&self) -> Option<&TransformerDecl> {
        match self {
            Self::Opaque(info) => info.transformer(),
            Self::Struct(info) => info.transformer(),
            Self::Enum(info) => info.transformer(),
            _ => None,
        }
    }

    /// Returns how a blank instance of a struct or opaque type is created.
    ///
    /// Other kinds are built structurally, see [`construct::instantiate`].
    ///
    /// [`construct::instantiate`]: crate::construct::instantiate
    pub fn constructor(&self) -> Constructor {
        match self {
            Self::Opaque(info) => info.constructor(),
            Self::Struct(info) => info.constructor(),
            _ => Constructor::None,
        }
    }
}
