mod attributes;

pub(crate) use attributes::{FieldAttributes, FieldDefault, TypeAttributes, VariantAttributes};

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Member, Type};
use syn::{WhereClause, WherePredicate};

// -----------------------------------------------------------------------------
// ReflectMeta

/// Data shared by every kind of derived type.
pub(crate) struct ReflectMeta<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    /// Resolved path of the `op_reflect` crate.
    pub op_reflect: syn::Path,
}

impl ReflectMeta<'_> {
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    /// Builds the where clause of a generated impl.
    ///
    /// Non-generic types need no extra predicates. For generic types each
    /// type parameter must be `Send + Sync + 'static`, and `predicates`
    /// are appended.
    pub fn where_clause(&self, predicates: Vec<WherePredicate>) -> WhereClause {
        let mut clause = self.generics.where_clause.clone().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });

        if self.is_generic() {
            for param in self.generics.type_params() {
                let ident = &param.ident;
                clause.predicates.push(syn::parse_quote! {
                    #ident: ::core::marker::Send + ::core::marker::Sync + 'static
                });
            }
            clause.predicates.extend(predicates);
        }

        clause
    }

    /// The deriving type with its generic arguments, e.g. `Foo<T>`.
    pub fn self_ty(&self) -> TokenStream {
        let ident = self.ident;
        let (_, ty_generics, _) = self.generics.split_for_impl();
        quote! { #ident #ty_generics }
    }

    /// Returns the `Constructor` expression registered in the type info.
    pub fn constructor(&self) -> TokenStream {
        let construct_ = crate::path::construct_(&self.op_reflect);
        if self.attrs.no_instantiate.is_some() {
            quote! { #construct_::Constructor::None }
        } else if self.attrs.default.is_some() {
            quote! { #construct_::Constructor::Default(#construct_::default::<Self>) }
        } else {
            quote! { #construct_::Constructor::Blank(#construct_::blank::<Self>) }
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// A struct field that takes part in reflection.
pub(crate) struct ReflectField<'a> {
    pub member: Member,
    /// Rust name, the index for tuple fields.
    pub name: String,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

/// A field marked with `#[reflect(ignore)]`.
pub(crate) struct IgnoredField<'a> {
    pub member: Member,
    pub ty: &'a Type,
}

pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<ReflectField<'a>>,
    pub ignored: Vec<IgnoredField<'a>>,
}

impl ReflectStruct<'_> {
    /// Index of the `#[reflect(base)]` field among the reflected fields.
    pub fn base_index(&self) -> Option<usize> {
        self.fields.iter().position(|field| field.attrs.base.is_some())
    }

    /// Predicates shared by all impls generated for a generic struct.
    pub fn where_clause(&self) -> WhereClause {
        let op_reflect = &self.meta.op_reflect;
        let reflect_ = crate::path::reflect_(op_reflect);
        let info_ = crate::path::info_(op_reflect);
        let construct_ = crate::path::construct_(op_reflect);

        let blank = self.meta.attrs.default.is_none() && self.meta.attrs.no_instantiate.is_none();
        let mut predicates: Vec<WherePredicate> = Vec::new();

        for field in &self.fields {
            let ty = field.ty;
            predicates.push(if blank {
                syn::parse_quote! { #ty: #reflect_ + #info_::Typed + #construct_::Instantiate }
            } else {
                syn::parse_quote! { #ty: #reflect_ + #info_::Typed }
            });
            if let Some(explicit) = &field.attrs.explicit_type {
                predicates.push(syn::parse_quote! { #explicit: #info_::Typed });
            }
            if let Some(FieldDefault::Trait) = field.attrs.default {
                predicates.push(syn::parse_quote! { #ty: ::core::default::Default });
            }
        }

        if blank {
            for field in &self.ignored {
                let ty = field.ty;
                predicates.push(syn::parse_quote! { #ty: ::core::default::Default });
            }
        } else if self.meta.attrs.default.is_some() {
            let self_ty = self.meta.self_ty();
            predicates.push(syn::parse_quote! { #self_ty: ::core::default::Default });
        }

        self.meta.where_clause(predicates)
    }
}

// -----------------------------------------------------------------------------
// ReflectEnum

pub(crate) struct ReflectVariant<'a> {
    pub ident: &'a Ident,
    /// Name used in documents.
    pub name: String,
}

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<ReflectVariant<'a>>,
}

impl ReflectEnum<'_> {
    pub fn where_clause(&self) -> WhereClause {
        let mut predicates: Vec<WherePredicate> = Vec::new();
        if self.meta.attrs.default.is_some() {
            let self_ty = self.meta.self_ty();
            predicates.push(syn::parse_quote! { #self_ty: ::core::default::Default });
        }
        self.meta.where_clause(predicates)
    }
}

// -----------------------------------------------------------------------------
// ReflectDerive

pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let mut params = input.generics.params.iter();
        if let Some(param) = params.find(|param| !matches!(param, GenericParam::Type(_))) {
            return Err(syn::Error::new(
                param.span(),
                "reflected types may only have type parameters",
            ));
        }

        let meta = ReflectMeta {
            ident: &input.ident,
            generics: &input.generics,
            attrs: TypeAttributes::parse(&input.attrs)?,
            op_reflect: crate::path::op_reflect(),
        };

        match &input.data {
            Data::Struct(data) => Self::parse_struct(meta, &data.fields).map(Self::Struct),
            Data::Enum(data) => {
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "reflected enums need at least one variant",
                    ));
                }

                let mut variants = Vec::with_capacity(data.variants.len());
                for variant in &data.variants {
                    if !matches!(variant.fields, Fields::Unit) {
                        return Err(syn::Error::new(
                            variant.span(),
                            "only enums without variant fields can be reflected",
                        ));
                    }
                    let attrs = VariantAttributes::parse(&variant.attrs)?;
                    variants.push(ReflectVariant {
                        ident: &variant.ident,
                        name: attrs
                            .rename
                            .map_or_else(|| variant.ident.to_string(), |lit| lit.value()),
                    });
                }

                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(_) => Err(syn::Error::new(
                input.ident.span(),
                "unions cannot be reflected",
            )),
        }
    }

    fn parse_struct(meta: ReflectMeta<'a>, fields: &'a Fields) -> syn::Result<ReflectStruct<'a>> {
        let mut reflected = Vec::new();
        let mut ignored = Vec::new();
        let mut base = None;

        for (index, field) in fields.iter().enumerate() {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(syn::Index::from(index)),
            };
            let attrs = FieldAttributes::parse(&field.attrs)?;

            if attrs.ignore.is_some() {
                ignored.push(IgnoredField { member, ty: &field.ty });
                continue;
            }

            if let Some(span) = attrs.base {
                if base.replace(span).is_some() {
                    return Err(syn::Error::new(span, "a struct has at most one base field"));
                }
            }

            let name = match &field.ident {
                Some(ident) => ident.to_string(),
                None => index.to_string(),
            };
            reflected.push(ReflectField { member, name, ty: &field.ty, attrs });
        }

        Ok(ReflectStruct { meta, fields: reflected, ignored })
    }
}
