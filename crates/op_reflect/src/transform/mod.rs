//! Conversion hooks ("transformers").
//!
//! A [`Transformer`] replaces a value with another one while it is being
//! marshalled: typically an opaque type with something the engine can walk,
//! or a [`Value`](op_value::Value) written as is.
//!
//! Hooks reach a type in three ways:
//!
//! - declared on the type, `#[reflect(transformer = H)]`;
//! - registered against a type or an interface through
//!   [`TypeCaptureCache::register_transformer`];
//! - declared on a single field, where it runs before the type-level hooks.
//!
//! The inheritable flag decides whether a declaration also applies to types
//! deriving from the declaring one, see [`resolve`].
//!
//! [`TypeCaptureCache::register_transformer`]: crate::TypeCaptureCache::register_transformer

// -----------------------------------------------------------------------------
// Modules

mod decl;
mod predefined;
mod resolve;
mod transformer;

// -----------------------------------------------------------------------------
// Exports

pub use decl::{TransformerDecl, TransformerRef};
pub use predefined::{Base64Transformer, DurationTransformer, PathTransformer};
pub use predefined::{ListTransformer, MapTransformer};
pub use resolve::{Registrations, resolve};
pub use transformer::{CreateTransformer, Transformer};
