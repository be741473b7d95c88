use proc_macro2::TokenStream;
use quote::quote;
use syn::WhereClause;

use crate::derive_data::{FieldDefault, ReflectEnum, ReflectMeta, ReflectStruct};
use crate::path;

/// Implements `Typed`, storing the info in a static cell.
///
/// Generic types share a single static across all instantiations, so they
/// use the cell keyed by `TypeId`.
fn impl_typed(meta: &ReflectMeta, where_clause: &WhereClause, info: TokenStream) -> TokenStream {
    let info_ = path::info_(&meta.op_reflect);
    let impls_ = path::impls_(&meta.op_reflect);
    let ident = meta.ident;
    let (impl_generics, ty_generics, _) = meta.generics.split_for_impl();

    let body = if meta.is_generic() {
        quote! {
            static CELL: #impls_::GenericTypeInfoCell = #impls_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info)
        }
    } else {
        quote! {
            static CELL: #impls_::NonGenericTypeInfoCell = #impls_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info)
        }
    };

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #body
            }
        }
    }
}

/// Builder calls shared by struct and enum info.
fn type_level(meta: &ReflectMeta) -> TokenStream {
    let info_ = path::info_(&meta.op_reflect);
    let decl_ = path::transformer_decl_(&meta.op_reflect);

    let type_path = meta.attrs.type_path.as_ref().map(|lit| {
        quote! { .with_type_path(#lit) }
    });

    let interfaces = (!meta.attrs.interfaces.is_empty()).then(|| {
        let interfaces = &meta.attrs.interfaces;
        quote! { .with_interfaces(&[#(#info_::Type::of::<#interfaces>()),*]) }
    });

    let transformer = meta.attrs.transformer.as_ref().map(|hook| {
        let inheritable = meta.attrs.inheritable;
        quote! { .with_transformer(#decl_::new::<#hook>(#inheritable)) }
    });

    quote! { #type_path #interfaces #transformer }
}

pub(crate) fn impl_struct_typed(data: &ReflectStruct, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    let op_reflect = &meta.op_reflect;
    let info_ = path::info_(op_reflect);
    let decl_ = path::transformer_decl_(op_reflect);
    let box_ = path::box_(op_reflect);
    let reflect_ = path::reflect_(op_reflect);

    let fields = data.fields.iter().map(|field| {
        let ty = field.ty;
        let name = &field.name;

        let rename = field.attrs.rename.as_ref().map(|lit| quote! { .with_rename(#lit) });
        let explicit = field.attrs.explicit_type.as_ref().map(|explicit| {
            quote! { .with_explicit::<#explicit>() }
        });
        let transformer = field.attrs.transformer.as_ref().map(|hook| {
            let inheritable = field.attrs.inheritable;
            quote! { .with_transformer(#decl_::new::<#hook>(#inheritable)) }
        });
        let default = field.attrs.default.as_ref().map(|default| {
            let value = match default {
                FieldDefault::Trait => quote! { <#ty as ::core::default::Default>::default() },
                FieldDefault::Path(path) => quote! { #path() },
            };
            quote! { .with_default(|| #box_::<#ty>::new(#value) as #box_<dyn #reflect_>) }
        });

        quote! {
            #info_::NamedField::new::<#ty>(#name) #rename #explicit #transformer #default
        }
    });

    let base = data.base_index().map(|index| quote! { .with_base(#index) });
    let type_level = type_level(meta);
    let constructor = meta.constructor();

    let info = quote! {
        #info_::TypeInfo::Struct(
            #info_::StructInfo::new::<Self>(&[#(#fields),*])
                #base
                #type_level
                .with_constructor(#constructor)
        )
    };

    impl_typed(meta, where_clause, info)
}

pub(crate) fn impl_enum_typed(data: &ReflectEnum, where_clause: &WhereClause) -> TokenStream {
    let meta = &data.meta;
    let op_reflect = &meta.op_reflect;
    let info_ = path::info_(op_reflect);
    let box_ = path::box_(op_reflect);
    let reflect_ = path::reflect_(op_reflect);

    let names = data.variants.iter().map(|variant| &variant.name);
    let build = data.variants.iter().enumerate().map(|(index, variant)| {
        let ident = variant.ident;
        quote! {
            #index => ::core::option::Option::Some(#box_::new(Self::#ident) as #box_<dyn #reflect_>),
        }
    });
    let type_level = type_level(meta);

    let info = quote! {
        #info_::TypeInfo::Enum(
            #info_::EnumInfo::new::<Self>(
                &[#(#names),*],
                |index| match index {
                    #(#build)*
                    _ => ::core::option::Option::None,
                },
            )
            #type_level
        )
    };

    impl_typed(meta, where_clause, info)
}
