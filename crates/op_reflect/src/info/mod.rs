//! Static type information.
//!
//! - [`Typed`]: provides a type's [`TypeInfo`].
//! - [`TypeInfo`]: one variant per [`ReflectKind`].
//! - [`Type`]: `TypeId` plus a readable path, also used for interfaces.
//! - [`NamedField`]: a struct field and its marshalling annotations.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod enum_info;
mod leaf_info;
mod struct_info;
mod ty;
mod type_info;
mod typed;
mod wrapper_info;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ArrayInfo, ListInfo, MapInfo};
pub use container_info::{FromEntriesFn, FromItemsFn, FromNativeFn};
pub use enum_info::{EnumInfo, VariantFn};
pub use leaf_info::{LeafInfo, OpaqueInfo};
pub use struct_info::{DefaultFn, NamedField, StructInfo};
pub use ty::Type;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use typed::Typed;
pub use wrapper_info::{DynamicInfo, OptionalInfo, PointerInfo, WrapFn};
