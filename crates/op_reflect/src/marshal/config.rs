use alloc::sync::Arc;

use crate::capture::TypeCaptureCache;
use crate::marshal::Opacker;
use crate::transform::{CreateTransformer, Transformer};

// -----------------------------------------------------------------------------
// Options

/// What to do when a value is reached again while it is still being written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Fail with [`MarshalError::RecursiveDependency`].
    ///
    /// [`MarshalError::RecursiveDependency`]: crate::MarshalError::RecursiveDependency
    #[default]
    Fail,
    /// Write `Null` for the repeated reference.
    Null,
}

/// How enum variants are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepr {
    /// The variant name, as text.
    #[default]
    Name,
    /// The variant index, as an unsigned integer.
    Ordinal,
}

/// Engine options, fixed when the [`Opacker`] is built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpackerConfig {
    cycle_policy: CyclePolicy,
    enum_repr: EnumRepr,
    wrap_list_element_type: bool,
    wrap_map_element_type: bool,
}

impl OpackerConfig {
    #[inline]
    pub const fn cycle_policy(&self) -> CyclePolicy {
        self.cycle_policy
    }

    #[inline]
    pub const fn enum_repr(&self) -> EnumRepr {
        self.enum_repr
    }

    /// Whether list elements are written with their runtime type.
    #[inline]
    pub const fn wrap_list_element_type(&self) -> bool {
        self.wrap_list_element_type
    }

    /// Whether map keys and values are written with their runtime type.
    #[inline]
    pub const fn wrap_map_element_type(&self) -> bool {
        self.wrap_map_element_type
    }
}

// -----------------------------------------------------------------------------
// OpackerBuilder

/// Builds an [`Opacker`].
///
/// Engines built without an explicit [`cache`](OpackerBuilder::cache) get a
/// fresh [`TypeCaptureCache::new`].
///
/// ```
/// use std::sync::Arc;
/// use op_reflect::{Opacker, TypeCaptureCache};
/// use op_reflect::marshal::{CyclePolicy, EnumRepr};
///
/// let cache = Arc::new(TypeCaptureCache::new());
/// let opacker = Opacker::builder()
///     .cache(cache.clone())
///     .cycle_policy(CyclePolicy::Null)
///     .enum_repr(EnumRepr::Ordinal)
///     .build();
///
/// assert!(Arc::ptr_eq(opacker.cache(), &cache));
/// assert_eq!(opacker.config().enum_repr(), EnumRepr::Ordinal);
/// ```
#[derive(Debug, Default)]
pub struct OpackerBuilder {
    config: OpackerConfig,
    cache: Option<Arc<TypeCaptureCache>>,
}

impl OpackerBuilder {
    /// Create a builder with default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.config.cycle_policy = policy;
        self
    }

    #[inline]
    pub fn enum_repr(mut self, repr: EnumRepr) -> Self {
        self.config.enum_repr = repr;
        self
    }

    #[inline]
    pub fn wrap_list_element_type(mut self, enabled: bool) -> Self {
        self.config.wrap_list_element_type = enabled;
        self
    }

    #[inline]
    pub fn wrap_map_element_type(mut self, enabled: bool) -> Self {
        self.config.wrap_map_element_type = enabled;
        self
    }

    /// Shares `cache` with other engines.
    #[inline]
    pub fn cache(mut self, cache: Arc<TypeCaptureCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers the hook `H` against `T` in the cache.
    ///
    /// See [`TypeCaptureCache::register_transformer`].
    pub fn register_transformer<T, H>(mut self, inheritable: bool) -> Self
    where
        T: ?Sized + 'static,
        H: Transformer + CreateTransformer,
    {
        self.cache
            .get_or_insert_with(|| Arc::new(TypeCaptureCache::new()))
            .register_transformer::<T, H>(inheritable);
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Opacker {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(TypeCaptureCache::new()));
        Opacker::with_cache(cache, self.config)
    }
}
