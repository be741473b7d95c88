//! Per-type descriptors and their cache.
//!
//! A [`TypeDescriptor`] is everything the engine needs to know about one type:
//! its fields, flattened over the base chain, and its resolved hook chain.
//! Descriptors are computed once per [`TypeCaptureCache`] and shared.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use cache::TypeCaptureCache;
pub use descriptor::{Accessor, FieldDescriptor, TypeDescriptor};
