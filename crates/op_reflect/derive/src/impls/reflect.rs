use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::WhereClause;

use crate::derive_data::{ReflectEnum, ReflectMeta, ReflectStruct};
use crate::path;

/// Implements `Reflect` for a type whose `ReflectRef` variant is `kind`.
fn impl_reflect(meta: &ReflectMeta, where_clause: &WhereClause, kind: Ident) -> TokenStream {
    let op_reflect = &meta.op_reflect;
    let reflect_ = path::reflect_(op_reflect);
    let info_ = path::info_(op_reflect);
    let ops_ = path::ops_(op_reflect);
    let box_ = path::box_(op_reflect);
    let ident = meta.ident;
    let (impl_generics, ty_generics, _) = meta.generics.split_for_impl();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #info_::TypeInfo {
                <Self as #info_::Typed>::type_info()
            }

            fn set(
                &mut self,
                value: #box_<dyn #reflect_>,
            ) -> ::core::result::Result<(), #box_<dyn #reflect_>> {
                *self = value.take_as::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #ops_::ReflectRef::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #ops_::ReflectMut<'_> {
                #ops_::ReflectMut::#kind(self)
            }
        }
    }
}

pub(crate) fn impl_struct_reflect(data: &ReflectStruct, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    let op_reflect = &meta.op_reflect;
    let reflect_ = path::reflect_(op_reflect);
    let ops_ = path::ops_(op_reflect);
    let ident = meta.ident;
    let (impl_generics, ty_generics, _) = meta.generics.split_for_impl();

    let reflect = impl_reflect(meta, where_clause, quote::format_ident!("Struct"));

    let indices = 0..data.fields.len();
    let members = data.fields.iter().map(|field| &field.member);
    let indices_mut = 0..data.fields.len();
    let members_mut = data.fields.iter().map(|field| &field.member);
    let len = data.fields.len();

    quote! {
        #reflect

        impl #impl_generics #ops_::Struct for #ident #ty_generics #where_clause {
            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #reflect_> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#members as &dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #reflect_> {
                match index {
                    #(#indices_mut => ::core::option::Option::Some(&mut self.#members_mut as &mut dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #len
            }
        }
    }
}

pub(crate) fn impl_enum_reflect(data: &ReflectEnum, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    let ops_ = path::ops_(&meta.op_reflect);
    let ident = meta.ident;
    let (impl_generics, ty_generics, _) = meta.generics.split_for_impl();

    let reflect = impl_reflect(meta, where_clause, quote::format_ident!("Enum"));

    let variants = data.variants.iter().map(|variant| variant.ident);
    let indices = 0..data.variants.len();

    quote! {
        #reflect

        impl #impl_generics #ops_::Enum for #ident #ty_generics #where_clause {
            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#variants => #indices,)*
                }
            }
        }
    }
}
