use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, Typed};
use crate::transform::TransformerDecl;

/// Builds the variant at an index, `None` if out of range.
pub type VariantFn = fn(usize) -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// EnumInfo

/// A container for compile-time enum info.
///
/// Only fieldless enums are reflected. A variant is marshalled either by
/// name or by its ordinal, depending on the engine configuration.
///
/// # Examples
///
/// ```
/// use op_reflect::derive::Reflect;
/// use op_reflect::info::Typed;
///
/// #[derive(Reflect)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// let info = Level::type_info().as_enum().unwrap();
/// assert_eq!(info.variant_names(), &["Low", "High"]);
/// assert_eq!(info.index_of("High"), Some(1));
/// assert!(info.build_variant(1).is_some());
/// assert!(info.build_variant(2).is_none());
/// ```
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[&'static str]>,
    build: VariantFn,
    interfaces: Box<[Type]>,
    transformer: Option<TransformerDecl>,
}

impl EnumInfo {
    /// Create a new [`EnumInfo`].
    pub fn new<T: Typed>(variants: &[&'static str], build: VariantFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
            build,
            interfaces: Box::new([]),
            transformer: None,
        }
    }

    /// Replaces the readable type path.
    #[inline]
    pub fn with_type_path(mut self, path: &'static str) -> Self {
        self.ty = self.ty.with_path(path);
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

    /// Returns the underlying [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the variant names in declaration order.
    #[inline]
    pub fn variant_names(&self) -> &[&'static str] {
        &self.variants
    }

    /// Returns the number of variants.
    #[inline]
    pub const fn variant_len(&self) -> usize {
        self.variants.len()
    }

    /// Returns the ordinal of the variant named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| *variant == name)
    }

    /// Returns the name of the variant at `index`.
    #[inline]
    pub fn name_at(&self, index: usize) -> Option<&'static str> {
        self.variants.get(index).copied()
    }

    /// Builds the variant at `index`.
    #[inline]
    pub fn build_variant(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.build)(index)
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
}
