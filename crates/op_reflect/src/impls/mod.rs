//! Reflection for built-in types, and the cells used to implement [`Typed`].
//!
//! - [`NonGenericTypeInfoCell`]: used to implement [`Typed`] for non-generic types.
//! - [`GenericTypeInfoCell`]: used to implement [`Typed`] for generic types.
//!
//! ## Implemented Menu
//!
//! - leaves:
//!     - `()`, `bool`, `char`
//!     - `i8`-`i64`, `isize`, `u8`-`u64`, `usize`, `f32`, `f64`
//!     - `String`
//!     - `Value`, `ObjectValue`, `ArrayValue`
//! - arrays: `Vec<T>`, `[T; N]`, `Box<[T]>`
//! - lists: `VecDeque<T>`, `LinkedList<T>`, `BTreeSet<T>`, `HashSet<T>`
//! - maps: `BTreeMap<K, V>`, `HashMap<K, V>`
//! - `Option<T>`
//! - pointers: `Box<T>`, `Arc<T>`, `Mutex<T>`, `RwLock<T>`
//! - `Box<dyn Reflect>`
//! - opaque: `core::time::Duration`, `std::path::PathBuf`
//!
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod array;
mod collections;
mod dynamic;
mod leaf;
mod opaque;
mod option;
mod pointer;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
