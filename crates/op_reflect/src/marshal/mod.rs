//! The marshalling engine.
//!
//! [`Opacker`] walks an object graph and produces a [`Value`] document, or
//! reads one back into a new object graph.
//!
//! ## Serialization
//!
//! Each value goes through the same dispatch:
//!
//! - a field-level hook, when the value is a field that declares one, runs
//!   first. Its output is dispatched in turn; if it declines, the field value
//!   goes on to the type-level chain;
//! - leaves are written directly, arrays of native scalars as natively stored
//!   [`ArrayValue`](op_value::ArrayValue)s;
//! - the type-level hooks run in resolution order. A hook output of another
//!   type is dispatched again from the start;
//! - what remains is written by kind: structs as objects (base fields first),
//!   arrays and lists as arrays, maps as objects, enums as names or ordinals,
//!   `None` as `Null`. Lists and maps need [`ListTransformer`] or
//!   [`MapTransformer`] in their hook chain.
//!
//! Containers are tracked while they are being written. Reaching one of them
//! again is a cycle, handled by the [`CyclePolicy`].
//!
//! Nesting costs heap, not call stack, except through locks: every nested
//! `Mutex` or `RwLock` is written while its guard is held, one call deeper.
//!
//! ## Deserialization
//!
//! Dispatch is mirrored with the hooks in reverse order. A hook that returns
//! a [`Value`] replaces the document, a hook that returns the goal type
//! finishes it. Structs are built with [`construct::instantiate`] and then
//! filled field by field. A missing field takes its default supplier, or
//! `None` if it is optional, and fails otherwise.
//!
//! [`construct::instantiate`]: crate::construct::instantiate
//! [`ListTransformer`]: crate::transform::ListTransformer
//! [`MapTransformer`]: crate::transform::MapTransformer
//! [`Value`]: op_value::Value

// -----------------------------------------------------------------------------
// Modules

mod config;
mod de;
mod error;
mod opacker;
mod ser;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use config::{CyclePolicy, EnumRepr, OpackerBuilder, OpackerConfig};
pub use error::{DeserializeError, MarshalError, SerializeError, TypeTrail};
pub use opacker::Opacker;

pub(crate) use tag::{tag, untag};
