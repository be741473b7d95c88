//! The document model: a small, codec-agnostic value tree.
//!
//! A [`Value`] is either a leaf (null, boolean, number, char, text, bytes)
//! or one of two containers, [`ObjectValue`] and [`ArrayValue`].
//!
//! Containers only ever hold admitted kinds. The typed APIs (`push`, `put`)
//! take anything convertible into a [`Value`], the dynamic ones (`try_push`,
//! `try_put`) check the admission rule at runtime and fail with
//! [`ValueError::TypeNotAdmitted`].
//!
//! ```
//! use op_value::{ArrayValue, ObjectValue, Value};
//!
//! let mut tags = ArrayValue::new();
//! tags.push("x");
//! tags.push("y");
//!
//! let mut object = ObjectValue::new();
//! object.put("name", "a");
//! object.put("tags", tags);
//!
//! assert_eq!(object.get_str("name"), Some(&Value::from("a")));
//! assert!(object.try_put("bad", vec!['x']).is_err());
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod admit;
mod array;
mod codec;
mod error;
mod object;
mod value;

#[cfg(feature = "serde")]
mod serde;

// -----------------------------------------------------------------------------
// Top-level exports

pub use admit::admit;
pub use array::{ArrayValue, NativeKind};
pub use codec::Codec;
pub use error::ValueError;
pub use object::ObjectValue;
pub use value::{Value, ValueKind};
