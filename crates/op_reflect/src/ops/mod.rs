//! Structural access to reflected values.
//!
//! [`Reflect::reflect_ref`] and [`Reflect::reflect_mut`] cast a value to one
//! of the following subtraits, chosen by its [`ReflectKind`]:
//!
//! - [`Leaf`]: converted to and from a [`Value`](op_value::Value) directly.
//! - [`Struct`]: fields by index, in declaration order.
//! - [`Enum`]: a fieldless variant.
//! - [`Array`]: elements by index, e.g. `Vec<T>`, `[T; N]`.
//! - [`List`]: elements by iteration, e.g. `VecDeque<T>`, `HashSet<T>`.
//! - [`Map`]: entries by iteration, e.g. `BTreeMap<K, V>`.
//! - [`Pointer`]: a transparent wrapper, e.g. `Arc<T>`, `Mutex<T>`.
//!
//! [`Reflect::reflect_ref`]: crate::Reflect::reflect_ref
//! [`Reflect::reflect_mut`]: crate::Reflect::reflect_mut
//! [`ReflectKind`]: crate::info::ReflectKind

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod enum_ops;
mod kind;
mod leaf_ops;
mod list_ops;
mod map_ops;
mod pointer_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use leaf_ops::Leaf;
pub use list_ops::List;
pub use map_ops::Map;
pub use pointer_ops::Pointer;
pub use struct_ops::Struct;
