//! Type lookup by path.
//!
//! With element wrapping enabled, list and map elements are written as
//! `{"type": path, "value": ...}`. Reading them back needs the
//! [`TypeInfo`](crate::info::TypeInfo) behind `path`, which is what the
//! [`TypeRegistry`] provides.
//!
//! A registry is filled in three ways:
//!
//! - [`TypeRegistry::new`] registers every leaf type;
//! - every type captured by a [`TypeCaptureCache`] is registered in the
//!   cache's registry, with the types it mentions;
//! - types annotated with `#[reflect(auto_register)]` are registered by
//!   [`TypeRegistry::auto_register`] (feature `auto_register`, through the
//!   [`inventory`] crate).
//!
//! [`TypeCaptureCache`]: crate::TypeCaptureCache
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::{TypeRegistry, TypeRegistryArc};
