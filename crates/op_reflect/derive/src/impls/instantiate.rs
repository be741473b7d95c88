use proc_macro2::TokenStream;
use quote::quote;
use syn::WhereClause;

use crate::derive_data::{ReflectEnum, ReflectMeta, ReflectStruct};
use crate::path;

fn impl_instantiate(meta: &ReflectMeta, where_clause: &WhereClause, body: TokenStream) -> TokenStream {
    let construct_ = path::construct_(&meta.op_reflect);
    let ident = meta.ident;
    let (impl_generics, ty_generics, _) = meta.generics.split_for_impl();

    quote! {
        impl #impl_generics #construct_::Instantiate for #ident #ty_generics #where_clause {
            fn instantiate() -> Self {
                #body
            }
        }
    }
}

/// Blank struct: reflected fields are blank, ignored fields are `Default`.
pub(crate) fn impl_struct_instantiate(data: &ReflectStruct, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    if meta.attrs.no_instantiate.is_some() {
        return TokenStream::new();
    }

    let body = if meta.attrs.default.is_some() {
        quote! { ::core::default::Default::default() }
    } else {
        let construct_ = path::construct_(&meta.op_reflect);
        let members = data.fields.iter().map(|field| &field.member);
        let ignored = data.ignored.iter().map(|field| &field.member);
        quote! {
            Self {
                #(#members: #construct_::Instantiate::instantiate(),)*
                #(#ignored: ::core::default::Default::default(),)*
            }
        }
    };

    impl_instantiate(meta, where_clause, body)
}

/// Blank enum: the first variant.
pub(crate) fn impl_enum_instantiate(data: &ReflectEnum, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    if meta.attrs.no_instantiate.is_some() {
        return TokenStream::new();
    }

    let body = match (meta.attrs.default, data.variants.first()) {
        (None, Some(first)) => {
            let ident = first.ident;
            quote! { Self::#ident }
        }
        _ => quote! { ::core::default::Default::default() },
    };

    impl_instantiate(meta, where_clause, body)
}
