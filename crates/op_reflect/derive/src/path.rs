//! Paths to items of `op_reflect`, as seen from the deriving crate.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `op_reflect` crate.
///
/// 1. For crates that depend on `op_reflect`, `::op_reflect` is returned.
/// 2. For crates that depend on `op_core`, `::op_core::reflect` is returned.
/// 3. For other situations, `::op_reflect` is returned, but this may be incorrect.
///
/// Reading the manifest is not cheap, the path is resolved once per
/// derive and passed around.
pub(crate) fn op_reflect() -> syn::Path {
    op_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("op_reflect"))
}

#[inline(always)]
pub(crate) fn box_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::__macro_exports::alloc_utils::Box }
}

#[inline(always)]
pub(crate) fn reflect_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::Reflect }
}

#[inline(always)]
pub(crate) fn info_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::info }
}

#[inline(always)]
pub(crate) fn ops_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::ops }
}

#[inline(always)]
pub(crate) fn construct_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::construct }
}

#[inline(always)]
pub(crate) fn transformer_decl_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::transform::TransformerDecl }
}

#[inline(always)]
pub(crate) fn impls_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::impls }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(op_reflect: &syn::Path) -> TokenStream {
    quote! { #op_reflect::__macro_exports::auto_register }
}
