//! Small containers shared by the `op_*` crates.
//!
//! - [`hash`]: `hashbrown` containers hashed with a fixed `foldhash` seed.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`IdentitySet`]: a set of object identities, used for cycle detection.
//! - [`stack`]: helpers for work stacks that are reused across calls.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod identity;
mod typeid_map;

pub mod hash;
pub mod stack;

// -----------------------------------------------------------------------------
// Top-level exports

pub use identity::{Identity, IdentitySet};
pub use typeid_map::TypeIdMap;
