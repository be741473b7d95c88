use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;
use core::time::Duration;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock};

use log::{debug, trace};
use op_utils::TypeIdMap;

use crate::capture::{Accessor, FieldDescriptor, TypeDescriptor};
use crate::info::{StructInfo, TypeInfo};
use crate::marshal::MarshalError;
use crate::ops::{List, Map};
use crate::registry::TypeRegistryArc;
use crate::transform::{self, Registrations, TransformerDecl, TransformerRef};
use crate::transform::{CreateTransformer, Transformer};
use crate::transform::{DurationTransformer, ListTransformer, MapTransformer, PathTransformer};

// -----------------------------------------------------------------------------
// TypeCaptureCache

/// Captures and caches one [`TypeDescriptor`] per type.
///
/// The cache is safe to share between threads. A descriptor is computed at
/// most once: lookups take a read lock, a miss takes the capture lock, looks
/// again and only then computes and publishes.
///
/// Registering or unregistering a hook drops every published descriptor,
/// since a hook registered on a base type or an interface changes the chain
/// of every derived type. Descriptors already handed out stay valid.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use op_reflect::{TypeCaptureCache, derive::Reflect, info::Typed};
///
/// #[derive(Reflect)]
/// struct Point { x: i32, y: i32 }
///
/// let cache = TypeCaptureCache::new();
/// let first = cache.get_or_capture(Point::type_info()).unwrap();
/// let second = cache.get_or_capture(Point::type_info()).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.fields()[1].name(), "y");
/// ```
pub struct TypeCaptureCache {
    published: RwLock<TypeIdMap<Arc<TypeDescriptor>>>,
    capture: Mutex<CaptureState>,
    registry: TypeRegistryArc,
}

#[derive(Default)]
struct CaptureState {
    registrations: Registrations,
    instances: TypeIdMap<TransformerRef>,
}

impl Default for TypeCaptureCache {
    /// See [`TypeCaptureCache::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCaptureCache {
    /// Creates a cache without any registered hook.
    pub fn empty() -> Self {
        let registry = TypeRegistryArc::default();
        registry.write().auto_register();

        Self {
            published: RwLock::new(TypeIdMap::new()),
            capture: Mutex::new(CaptureState::default()),
            registry,
        }
    }

    /// Creates a cache with the predefined hooks registered:
    ///
    /// - [`ListTransformer`] on `dyn List`, inheritable;
    /// - [`MapTransformer`] on `dyn Map`, inheritable;
    /// - [`DurationTransformer`] on [`Duration`];
    /// - [`PathTransformer`] on [`PathBuf`].
    pub fn new() -> Self {
        let cache = Self::empty();
        cache.register_transformer::<dyn List, ListTransformer>(true);
        cache.register_transformer::<dyn Map, MapTransformer>(true);
        cache.register_transformer::<Duration, DurationTransformer>(false);
        cache.register_transformer::<PathBuf, PathTransformer>(false);
        cache
    }

    /// Returns the registry every captured type is indexed in.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Returns the number of published descriptors.
    pub fn len(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no descriptor is published.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every published descriptor. Registrations are kept.
    pub fn clear(&self) {
        let _state = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        self.invalidate();
    }

    fn invalidate(&self) {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lookup(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// Returns the descriptor of `info`, capturing it on first use.
    ///
    /// Fails if a hook cannot be created, in which case nothing is
    /// published.
    pub fn get_or_capture(
        &self,
        info: &'static TypeInfo,
    ) -> Result<Arc<TypeDescriptor>, MarshalError> {
        if let Some(descriptor) = self.lookup(info.type_id()) {
            return Ok(descriptor);
        }

        let mut state = self.capture.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(descriptor) = self.lookup(info.type_id()) {
            return Ok(descriptor);
        }

        let mut created = TypeIdMap::new();
        let descriptor = Arc::new(capture(info, &state, &mut created)?);

        for (type_id, instance) in created.iter() {
            state.instances.insert(*type_id, instance.clone());
        }
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.type_id(), descriptor.clone());
        self.registry.write().register_info(info);

        debug!(
            "captured `{}`: {} fields, {} transformers",
            info.type_path(),
            descriptor.fields.len(),
            descriptor.transformers.len(),
        );

        Ok(descriptor)
    }

    /// Registers the hook `H` against `T`, a type or a `dyn Trait`.
    ///
    /// Returns `false` if `H` was already registered against `T`, in which
    /// case only the inheritable flag is updated.
    ///
    /// ```
    /// use op_reflect::{TypeCaptureCache, derive::Reflect, info::Typed};
    /// use op_reflect::transform::PathTransformer;
    ///
    /// #[derive(Reflect)]
    /// struct Point { x: i32 }
    ///
    /// let cache = TypeCaptureCache::empty();
    /// assert!(cache.register_transformer::<Point, PathTransformer>(false));
    /// let chain = cache.get_or_capture(Point::type_info()).unwrap();
    /// assert_eq!(chain.transformers().len(), 1);
    ///
    /// assert!(cache.unregister_transformer::<Point, PathTransformer>());
    /// let chain = cache.get_or_capture(Point::type_info()).unwrap();
    /// assert!(chain.transformers().is_empty());
    /// ```
    pub fn register_transformer<T, H>(&self, inheritable: bool) -> bool
    where
        T: ?Sized + 'static,
        H: Transformer + CreateTransformer,
    {
        let decl = TransformerDecl::new::<H>(inheritable);
        let mut state = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        let added = state.registrations.register(TypeId::of::<T>(), decl);
        self.invalidate();

        debug!(
            "registered `{}` on `{}` (inheritable: {inheritable})",
            type_name::<H>(),
            type_name::<T>(),
        );
        added
    }

    /// Removes the hook `H` from `T`.
    ///
    /// Returns `false` if it was not registered.
    pub fn unregister_transformer<T, H>(&self) -> bool
    where
        T: ?Sized + 'static,
        H: 'static,
    {
        let mut state = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = state
            .registrations
            .unregister(TypeId::of::<T>(), TypeId::of::<H>());
        if removed {
            self.invalidate();
            debug!(
                "unregistered `{}` from `{}`",
                type_name::<H>(),
                type_name::<T>(),
            );
        }
        removed
    }
}

impl fmt::Debug for TypeCaptureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCaptureCache")
            .field("published", &self.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Capture

fn capture(
    info: &'static TypeInfo,
    state: &CaptureState,
    created: &mut TypeIdMap<TransformerRef>,
) -> Result<TypeDescriptor, MarshalError> {
    let mut fields = Vec::new();
    if let TypeInfo::Struct(struct_info) = info {
        let mut path = Vec::new();
        collect_fields(struct_info, &mut path, state, created, &mut fields)?;
    }

    let chain = transform::resolve(info, &state.registrations);
    let mut transformers = Vec::with_capacity(chain.len());
    for decl in &chain {
        trace!("`{}` resolves `{}`", info.type_path(), decl.ty());
        transformers.push(instance(decl, state, created)?);
    }

    Ok(TypeDescriptor {
        info,
        fields: fields.into_boxed_slice(),
        transformers: transformers.into_boxed_slice(),
    })
}

fn collect_fields(
    info: &'static StructInfo,
    path: &mut Vec<usize>,
    state: &CaptureState,
    created: &mut TypeIdMap<TransformerRef>,
    fields: &mut Vec<FieldDescriptor>,
) -> Result<(), MarshalError> {
    let base = info
        .base_index()
        .and_then(|index| Some((index, info.field_at(index)?.type_info().as_struct().ok()?)));

    if let Some((index, base_info)) = base {
        path.push(index);
        collect_fields(base_info, path, state, created, fields)?;
        path.pop();
    }

    for (index, field) in info.iter().enumerate() {
        if base.is_some_and(|(base_index, _)| base_index == index) {
            continue;
        }

        let transformer = match field.transformer() {
            Some(decl) => {
                trace!("field `{}` resolves `{}`", field.name(), decl.ty());
                Some(instance(decl, state, created)?)
            }
            None => None,
        };

        path.push(index);
        fields.push(FieldDescriptor {
            accessor: Accessor::new(path),
            name: field.external_name(),
            field_name: field.name(),
            declared: field.type_info(),
            explicit: field.explicit_type_info(),
            transformer,
            default: field.default_fn(),
        });
        path.pop();
    }

    Ok(())
}

fn instance(
    decl: &TransformerDecl,
    state: &CaptureState,
    created: &mut TypeIdMap<TransformerRef>,
) -> Result<TransformerRef, MarshalError> {
    let type_id = decl.ty().id();
    if let Some(instance) = state.instances.get(&type_id).or_else(|| created.get(&type_id)) {
        return Ok(instance.clone());
    }

    let instance = decl
        .create()
        .map_err(|reason| MarshalError::HookInstantiation {
            transformer: decl.ty().path(),
            reason,
        })?;
    created.insert(type_id, instance.clone());
    Ok(instance)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::thread;

    use op_value::Value;

    use super::TypeCaptureCache;
    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::{TypeInfo, Typed};
    use crate::marshal::{MarshalError, Opacker};
    use crate::transform::{CreateTransformer, Transformer};

    #[derive(Reflect)]
    struct Parent {
        id: u32,
        name: String,
    }

    #[derive(Reflect)]
    struct Child {
        #[reflect(base)]
        parent: Parent,
        #[reflect(rename = "n")]
        count: u8,
        #[reflect(ignore)]
        scratch: u8,
        #[reflect(explicit_type = String)]
        payload: Box<dyn Reflect>,
    }

    struct Broken;

    impl CreateTransformer for Broken {
        fn create() -> Result<Self, String> {
            Err("no backend".into())
        }
    }

    impl Transformer for Broken {
        fn serialize(
            &self,
            _: &mut Opacker,
            _: &'static TypeInfo,
            _: &dyn Reflect,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(None)
        }

        fn deserialize(
            &self,
            _: &mut Opacker,
            _: &'static TypeInfo,
            _: &Value,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(None)
        }
    }

    #[derive(Reflect)]
    struct Guarded {
        #[reflect(transformer = Broken)]
        value: u8,
    }

    #[test]
    fn fields_flatten_the_base_chain() {
        let cache = TypeCaptureCache::new();
        let descriptor = cache.get_or_capture(Child::type_info()).unwrap();

        let names: Vec<_> = descriptor.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["id", "name", "n", "payload"]);

        let paths: Vec<_> = descriptor
            .fields()
            .iter()
            .map(|f| f.accessor().path().to_vec())
            .collect();
        assert_eq!(paths, [vec![0, 0], vec![0, 1], vec![1], vec![2]]);

        let payload = descriptor.field("payload").unwrap();
        assert!(payload.goal().type_is::<String>());
        assert!(payload.declared().type_is::<Box<dyn Reflect>>());
    }

    #[test]
    fn concurrent_capture_is_shared() {
        let cache = Arc::new(TypeCaptureCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.get_or_capture(Child::type_info()).unwrap())
            })
            .collect();

        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for descriptor in &descriptors {
            assert!(Arc::ptr_eq(descriptor, &descriptors[0]));
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.registry().read().contains(core::any::TypeId::of::<Child>()));
    }

    #[test]
    fn hook_failure_publishes_nothing() {
        let cache = TypeCaptureCache::new();
        let error = cache.get_or_capture(Guarded::type_info()).unwrap_err();
        assert!(matches!(
            error,
            MarshalError::HookInstantiation { reason, .. } if reason == "no backend"
        ));
        assert!(cache.is_empty());
        assert!(cache.get_or_capture(Guarded::type_info()).is_err());
    }

    #[test]
    fn registration_invalidates() {
        let cache = TypeCaptureCache::empty();
        let before = cache.get_or_capture(Parent::type_info()).unwrap();
        assert!(before.transformers().is_empty());

        cache.register_transformer::<Parent, crate::transform::PathTransformer>(false);
        assert!(cache.is_empty());
        let during = cache.get_or_capture(Parent::type_info()).unwrap();
        assert_eq!(during.transformers().len(), 1);

        assert!(cache.unregister_transformer::<Parent, crate::transform::PathTransformer>());
        let after = cache.get_or_capture(Parent::type_info()).unwrap();
        assert!(!Arc::ptr_eq(&during, &after));
        assert!(after.transformers().is_empty());
    }

    #[test]
    fn collections_get_predefined_hooks() {
        let cache = TypeCaptureCache::new();
        let list = cache
            .get_or_capture(<alloc::collections::VecDeque<u8>>::type_info())
            .unwrap();
        assert!(list.transformers()[0].ty().is::<crate::transform::ListTransformer>());

        let empty = TypeCaptureCache::empty();
        let list = empty
            .get_or_capture(<alloc::collections::VecDeque<u8>>::type_info())
            .unwrap();
        assert!(list.transformers().is_empty());
    }
}
