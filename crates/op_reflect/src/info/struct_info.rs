use alloc::boxed::Box;

use crate::Reflect;
use crate::construct::Constructor;
use crate::info::{Type, TypeInfo, Typed};
use crate::transform::TransformerDecl;

// -----------------------------------------------------------------------------
// NamedField

/// Supplies a field's value when a document has no entry for it.
pub type DefaultFn = fn() -> Box<dyn Reflect>;

/// A container for compile-time named field info.
///
/// Besides name and type, a field carries the marshalling annotations
/// written on it with `#[reflect(...)]`.
///
/// # Examples
///
/// ```
/// use op_reflect::info::{NamedField, Typed};
///
/// let field = NamedField::new::<u32>("count").with_rename("n");
/// assert_eq!(field.name(), "count");
/// assert_eq!(field.external_name(), "n");
/// assert!(field.type_info().type_is::<u32>());
/// ```
#[derive(Debug, Clone)]
pub struct NamedField {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    rename: Option<&'static str>,
    explicit: Option<fn() -> &'static TypeInfo>,
    transformer: Option<TransformerDecl>,
    default: Option<DefaultFn>,
}

impl NamedField {
    /// Create a new [`NamedField`] of type `T`.
    #[inline]
    pub fn new<T: Typed + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            rename: None,
            explicit: None,
            transformer: None,
            default: None,
        }
    }

    /// Sets the name used in documents.
    #[inline]
    pub fn with_rename(mut self, rename: &'static str) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Sets the type used instead of the declared one, e.g. the concrete
    /// type behind a `Box<dyn Reflect>` field.
    #[inline]
    pub fn with_explicit<T: Typed + ?Sized>(mut self) -> Self {
        self.explicit = Some(T::type_info);
        self
    }

    /// Attaches a field-level conversion hook.
    #[inline]
    pub fn with_transformer(mut self, transformer: TransformerDecl) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Sets the supplier used when a document has no entry for this field.
    #[inline]
    pub fn with_default(mut self, default: DefaultFn) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the field name as declared in Rust.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the name used in documents.
    #[inline]
    pub fn external_name(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }

    /// Returns the declared type's [`TypeInfo`].
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    /// Returns the explicit type override, if any.
    #[inline]
    pub fn explicit_type_info(&self) -> Option<&'static TypeInfo> {
        self.explicit.map(|f| f())
    }

    /// Returns the field-level conversion hook, if any.
    #[inline]
    pub const fn transformer(&self) -> Option<&TransformerDecl> {
        self.transformer.as_ref()
    }

    /// Returns the default supplier, if any.
    #[inline]
    pub const fn default_fn(&self) -> Option<DefaultFn> {
        self.default
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for compile-time named struct info.
///
/// # Examples
///
/// ```
/// use op_reflect::derive::Reflect;
/// use op_reflect::info::Typed;
///
/// #[derive(Reflect)]
/// struct Animal {
///     name: String,
/// }
///
/// #[derive(Reflect)]
/// struct Dog {
///     #[reflect(base)]
///     animal: Animal,
///     #[reflect(rename = "good")]
///     is_good: bool,
/// }
///
/// let info = Dog::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.base_index(), Some(0));
/// assert!(Dog::type_info().base().unwrap().type_is::<Animal>());
/// assert_eq!(info.field("is_good").unwrap().external_name(), "good");
/// ```
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    base: Option<usize>,
    interfaces: Box<[Type]>,
    transformer: Option<TransformerDecl>,
    constructor: Constructor,
}

impl StructInfo {
    /// Create a new [`StructInfo`].
    ///
    /// Fields are listed in declaration order, ignored fields excluded.
    pub fn new<T: Typed>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
            base: None,
            interfaces: Box::new([]),
            transformer: None,
            constructor: Constructor::None,
        }
    }

    /// Replaces the readable type path.
    #[inline]
    pub fn with_type_path(mut self, path: &'static str) -> Self {
        self.ty = self.ty.with_path(path);
        self
    }

    /// Marks the field at `index` as the base.
    ///
    /// The base field's own fields are marshalled first, as if declared on
    /// this struct, and its hooks are inherited according to their flags.
    #[inline]
    pub fn with_base(mut self, index: usize) -> Self {
        self.base = Some(index);
        self
    }

    /// Sets the implemented interfaces.
    #[inline]
    pub fn with_interfaces(mut self, interfaces: &[Type]) -> Self {
        self.interfaces = interfaces.into();
        self
    }

    /// Sets the type-level conversion hook.
    #[inline]
    pub fn with_transformer(mut self, transformer: TransformerDecl) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Sets how blank instances are created.
    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the number of reflected fields.
    #[inline]
    pub const fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field at `index`.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    /// Returns the field with the Rust name `name`.
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the index of the field with the Rust name `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// Iterates over the fields in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, NamedField> {
        self.fields.iter()
    }

    /// Returns the index of the base field.
    #[inline]
    pub const fn base_index(&self) -> Option<usize> {
        self.base
    }

    /// Returns the base field.
    #[inline]
    pub fn base_field(&self) -> Option<&NamedField> {
        self.base.and_then(|index| self.fields.get(index))
    }

    /// Returns the implemented interfaces.
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// Returns the type-level conversion hook.
    #[inline]
    pub const fn transformer(&self) -> Option<&TransformerDecl> {
        self.transformer.as_ref()
    }

    /// Returns how blank instances are created.
    #[inline]
    pub const fn constructor(&self) -> Constructor {
        self.constructor
    }
}
