use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use op_utils::TypeIdMap;
use op_utils::hash::HashMap;
use op_value::{ArrayValue, ObjectValue, Value};

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types, by [`TypeId`] and by type path.
///
/// # Example
///
/// ```
/// use op_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let info = registry.get_with_type_path("alloc::string::String").unwrap();
/// assert!(info.type_is::<String>());
/// ```
pub struct TypeRegistry {
    by_id: TypeIdMap<&'static TypeInfo>,
    by_path: HashMap<&'static str, &'static TypeInfo>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            by_id: TypeIdMap::new(),
            by_path: HashMap::with_hasher(op_utils::hash::FixedHashState),
        }
    }

    /// Create a type registry with every leaf type registered.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i64` `isize`
    /// - `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `String`
    /// - `Value` `ObjectValue` `ArrayValue`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<alloc::string::String>();
        registry.register::<Value>();
        registry.register::<ObjectValue>();
        registry.register::<ArrayValue>();
        registry
    }

    /// Registers `T` and every type its [`TypeInfo`] mentions: fields,
    /// elements, keys, values and pointees.
    ///
    /// ```
    /// use op_reflect::{derive::Reflect, registry::TypeRegistry};
    /// use core::any::TypeId;
    ///
    /// #[derive(Reflect)]
    /// struct Foo {
    ///     name: Option<String>,
    ///     values: Vec<i32>,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<Foo>();
    ///
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// assert!(registry.contains(TypeId::of::<Option<String>>()));
    /// assert!(registry.contains(TypeId::of::<i32>()));
    /// ```
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers `info` and every type it mentions.
    ///
    /// Returns `false` if `info` was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if !self.insert(info) {
            return false;
        }

        let mut pending: Vec<&'static TypeInfo> = Vec::new();
        push_dependencies(info, &mut pending);
        while let Some(info) = pending.pop() {
            if self.insert(info) {
                push_dependencies(info, &mut pending);
            }
        }
        true
    }

    fn insert(&mut self, info: &'static TypeInfo) -> bool {
        if self.by_id.contains(&info.type_id()) {
            return false;
        }
        self.by_id.insert(info.type_id(), info);
        self.by_path.insert(info.type_path(), info);
        true
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// Returns `false` if the `auto_register` feature is disabled, in which
    /// case nothing happens.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use op_reflect::{derive::Reflect, registry::TypeRegistry};
    /// use core::any::TypeId;
    ///
    /// #[derive(Reflect)]
    /// #[reflect(auto_register)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// ```
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Returns `true` if the type is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_id.contains(&type_id)
    }

    /// Returns the [`TypeInfo`] of a registered type.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.by_id.get(&type_id).copied()
    }

    /// Returns the [`TypeInfo`] of the registered type with path `type_path`.
    #[inline]
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.by_path.get(type_path).copied()
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Iterates over the registered types in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.by_id.values().copied()
    }
}

fn push_dependencies(info: &'static TypeInfo, pending: &mut Vec<&'static TypeInfo>) {
    match info {
        TypeInfo::Struct(info) => {
            for field in info.iter() {
                pending.push(field.type_info());
                pending.extend(field.explicit_type_info());
            }
        }
        TypeInfo::Array(info) => pending.push(info.item_info()),
        TypeInfo::List(info) => pending.push(info.item_info()),
        TypeInfo::Map(info) => {
            pending.push(info.key_info());
            pending.push(info.value_info());
        }
        TypeInfo::Optional(info) => pending.push(info.inner_info()),
        TypeInfo::Pointer(info) => pending.push(info.pointee_info()),
        TypeInfo::Leaf(_) | TypeInfo::Opaque(_) | TypeInfo::Enum(_) | TypeInfo::Dynamic(_) => {}
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_path.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared [`TypeRegistry`], as owned by a [`TypeCaptureCache`].
///
/// [`TypeCaptureCache`]: crate::TypeCaptureCache
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use core::any::TypeId;

    use op_value::Value;

    use super::TypeRegistry;
    use crate::derive::Reflect;
    use crate::info::Typed;

    #[derive(Reflect)]
    struct Inner {
        items: VecDeque<u16>,
    }

    #[derive(Reflect)]
    struct Outer {
        #[reflect(base)]
        inner: Inner,
        label: Option<String>,
    }

    #[test]
    fn leaves_are_preregistered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<u8>()));
        assert!(registry.get_with_type_path("f64").is_some());
        assert!(registry.get_with_type_path(Value::type_info().type_path()).is_some());
        assert!(!registry.contains(TypeId::of::<Outer>()));
    }

    #[test]
    fn register_walks_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Outer>();
        assert!(registry.contains(TypeId::of::<Inner>()));
        assert!(registry.contains(TypeId::of::<VecDeque<u16>>()));
        assert!(registry.contains(TypeId::of::<u16>()));
        assert!(registry.contains(TypeId::of::<Option<String>>()));

        let len = registry.len();
        assert!(!registry.register_info(Outer::type_info()));
        assert_eq!(registry.len(), len);

        let path = Outer::type_info().type_path();
        assert!(registry.get_with_type_path(path).unwrap().type_is::<Outer>());
    }
}
