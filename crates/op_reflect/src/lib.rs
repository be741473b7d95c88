//! Reflection and object-graph marshalling.
//!
//! This crate converts in-memory object graphs into the document model of
//! [`op_value`] and back.
//!
//! - [`Reflect`], [`info`] and [`ops`]: runtime type information and
//!   structural access, usually obtained through [`derive::Reflect`].
//! - [`capture`]: the per-type descriptor cache ([`TypeCaptureCache`]).
//! - [`transform`]: conversion hooks and their inheritance-aware resolution.
//! - [`marshal`]: the engine itself ([`Opacker`]).
//! - [`construct`]: building target objects without user constructors.
//! - [`registry`]: type path lookup for runtime type tags.
//!
//! # Example
//!
//! ```
//! use op_reflect::{derive::Reflect, Opacker};
//! use op_value::Value;
//!
//! #[derive(Reflect, Debug, PartialEq)]
//! struct Item {
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let item = Item { name: "a".into(), tags: vec!["x".into(), "y".into()] };
//!
//! let mut opacker = Opacker::builder().build();
//! let value = opacker.serialize(&item).unwrap();
//!
//! let object = value.as_object().unwrap();
//! assert_eq!(object.get_str("name"), Some(&Value::from("a")));
//!
//! let back: Item = opacker.deserialize(&value).unwrap();
//! assert_eq!(back, item);
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Code generated by `#[derive(Reflect)]` names this crate `op_reflect`,
// which must also resolve inside the crate itself (unit tests).
extern crate self as op_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod capture;
pub mod construct;
pub mod impls;
pub mod info;
pub mod marshal;
pub mod ops;
pub mod registry;
pub mod transform;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use capture::TypeCaptureCache;
pub use marshal::{MarshalError, Opacker, OpackerBuilder};
pub use op_reflect_derive as derive;
pub use reflection::Reflect;
