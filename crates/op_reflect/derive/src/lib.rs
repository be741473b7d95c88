//! Derive macro for `op_reflect`.
//!
//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits:
///
/// - `Typed`
/// - `Reflect`
/// - `Struct` (for structs with named fields, tuple structs and unit structs)
/// - `Enum` (for enums whose variants carry no fields)
/// - `Instantiate` (unless `#[reflect(instantiate = false)]`)
///
/// Generic types are supported. Each type parameter must be
/// `Send + Sync + 'static` and each reflected field type must itself be
/// reflected.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(
///     implements(dyn Shape, dyn Named),   // interfaces hooks may be declared on
///     transformer = ShapeHook,            // type-level conversion hook
///     inheritable,                        // the hook also applies to derived types
///     type_path = "geo::Square",          // path written in type tags
///     auto_register,                      // collected by `TypeRegistry::auto_register`
/// )]
/// struct Square { /* ... */ }
/// ```
///
/// Blank instances are built from the blank values of the fields by
/// default. `#[reflect(default)]` uses `Default::default()` instead, and
/// `#[reflect(instantiate = false)]` makes the type impossible to build
/// from a document.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Square {
///     #[reflect(base)]                    // fields of `Shape` come first
///     shape: Shape,
///     #[reflect(rename = "len")]          // name used in documents
///     side: f64,
///     #[reflect(ignore)]                  // never marshalled, `Default` when built
///     cache: Vec<u8>,
///     #[reflect(explicit_type = Meta)]    // concrete type behind the box
///     meta: Box<dyn Reflect>,
///     #[reflect(transformer = Hex)]       // hook for this field only
///     color: u32,
///     #[reflect(default = one)]           // `one()` when the document lacks it
///     scale: f64,
///     #[reflect(default)]                 // `Default::default()` when missing
///     tags: Vec<String>,
/// }
/// ```
///
/// ## Enum Attributes
///
/// Variants may carry `#[reflect(rename = "...")]`, the name written when
/// enums are marshalled by name.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// enum Level {
///     #[reflect(rename = "lo")]
///     Low,
///     High,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_derive(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
