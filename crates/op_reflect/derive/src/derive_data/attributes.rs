use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, LitBool, LitStr, Path, Token, Type};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Runs `parse` on each nested item of every `#[reflect(...)]` attribute.
fn parse_reflect_attrs(
    attrs: &[Attribute],
    mut parse: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME))
        .try_for_each(|attr| attr.parse_nested_meta(&mut parse))
}

fn duplicated(meta: &ParseNestedMeta) -> syn::Error {
    meta.error("duplicated reflect attribute")
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Container attributes, `#[reflect(...)]` on the struct or enum itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `implements(dyn A, dyn B)`
    pub interfaces: Vec<Type>,
    /// `transformer = H`
    pub transformer: Option<Type>,
    /// `inheritable`, only meaningful together with `transformer`.
    pub inheritable: bool,
    /// `default`, blank instances come from `Default`.
    pub default: Option<Span>,
    /// `instantiate = false`
    pub no_instantiate: Option<Span>,
    /// `type_path = "..."`
    pub type_path: Option<LitStr>,
    /// `auto_register`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |meta| {
            if meta.path.is_ident("implements") {
                let content;
                syn::parenthesized!(content in meta.input);
                let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                this.interfaces.extend(types);
            } else if meta.path.is_ident("transformer") {
                if this.transformer.is_some() {
                    return Err(duplicated(&meta));
                }
                this.transformer = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("inheritable") {
                this.inheritable = true;
            } else if meta.path.is_ident("default") {
                this.default = Some(meta.path.span());
            } else if meta.path.is_ident("instantiate") {
                let value: LitBool = meta.value()?.parse()?;
                this.no_instantiate = (!value.value).then(|| value.span());
            } else if meta.path.is_ident("type_path") {
                this.type_path = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("auto_register") {
                this.auto_register = Some(meta.path.span());
            } else {
                return Err(meta.error("unsupported reflect attribute on a type"));
            }
            Ok(())
        })?;

        if let (Some(span), Some(_)) = (this.default, this.no_instantiate) {
            return Err(syn::Error::new(
                span,
                "`default` and `instantiate = false` cannot be combined",
            ));
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Where a missing field's value comes from.
pub(crate) enum FieldDefault {
    /// `default`, uses the field type's `Default`.
    Trait,
    /// `default = path`, calls `path()`.
    Path(Path),
}

/// Field attributes, `#[reflect(...)]` on a struct field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub base: Option<Span>,
    pub ignore: Option<Span>,
    pub rename: Option<LitStr>,
    pub explicit_type: Option<Type>,
    pub transformer: Option<Type>,
    pub inheritable: bool,
    pub default: Option<FieldDefault>,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |meta| {
            if meta.path.is_ident("base") {
                this.base = Some(meta.path.span());
            } else if meta.path.is_ident("ignore") {
                this.ignore = Some(meta.path.span());
            } else if meta.path.is_ident("rename") {
                if this.rename.is_some() {
                    return Err(duplicated(&meta));
                }
                this.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("explicit_type") {
                this.explicit_type = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("transformer") {
                if this.transformer.is_some() {
                    return Err(duplicated(&meta));
                }
                this.transformer = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("inheritable") {
                this.inheritable = true;
            } else if meta.path.is_ident("default") {
                this.default = Some(if meta.input.peek(Token![=]) {
                    FieldDefault::Path(meta.value()?.parse()?)
                } else {
                    FieldDefault::Trait
                });
            } else {
                return Err(meta.error("unsupported reflect attribute on a field"));
            }
            Ok(())
        })?;

        if let Some(span) = this.ignore {
            let annotated = this.base.is_some()
                || this.rename.is_some()
                || this.explicit_type.is_some()
                || this.transformer.is_some()
                || this.default.is_some();
            if annotated {
                return Err(syn::Error::new(
                    span,
                    "an ignored field cannot carry other reflect attributes",
                ));
            }
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// Variant attributes, only `rename` is accepted.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |meta| {
            if meta.path.is_ident("rename") {
                this.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported reflect attribute on a variant"))
            }
        })?;

        Ok(this)
    }
}
