use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use op_utils::IdentitySet;
use op_value::Value;

use crate::Reflect;
use crate::capture::TypeCaptureCache;
use crate::info::{TypeInfo, Typed};
use crate::marshal::de::DeFrame;
use crate::marshal::ser::SerFrame;
use crate::marshal::{DeserializeError, MarshalError, OpackerBuilder, OpackerConfig};
use crate::marshal::{SerializeError, TypeTrail};
use crate::registry::TypeRegistryArc;

// -----------------------------------------------------------------------------
// Opacker

/// The marshalling engine.
///
/// An engine converts object graphs into [`Value`] documents and back. It
/// keeps its work stacks between calls, so a single engine should be reused
/// for many values. Engines are cheap to create from a shared
/// [`TypeCaptureCache`], one per thread.
///
/// Neither direction recurses on the call stack for nested structs and
/// arrays, only hooks and locks enter the engine again.
///
/// # Examples
///
/// ```
/// use op_reflect::{Opacker, derive::Reflect};
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Grid {
///     cells: Vec<[u8; 3]>,
///     scale: Option<f32>,
/// }
///
/// let grid = Grid { cells: vec![[1, 2, 3], [4, 5, 6]], scale: None };
///
/// let mut opacker = Opacker::new();
/// let value = opacker.serialize(&grid).unwrap();
/// assert!(value.as_object().unwrap().get_str("scale").unwrap().is_null());
///
/// assert_eq!(opacker.deserialize::<Grid>(&value).unwrap(), grid);
/// ```
pub struct Opacker {
    pub(super) cache: Arc<TypeCaptureCache>,
    pub(super) config: OpackerConfig,
    pub(super) visiting: IdentitySet,
    pub(super) trail: TypeTrail,
    pub(super) fault: Option<TypeTrail>,
    pub(super) ser_stack: Vec<SerFrame<'static>>,
    pub(super) de_stack: Vec<DeFrame<'static>>,
}

impl Default for Opacker {
    /// See [`Opacker::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Opacker {
    /// Create an engine with default options and a new cache.
    #[inline]
    pub fn new() -> Self {
        OpackerBuilder::new().build()
    }

    /// Create an [`OpackerBuilder`].
    #[inline]
    pub fn builder() -> OpackerBuilder {
        OpackerBuilder::new()
    }

    pub(super) fn with_cache(cache: Arc<TypeCaptureCache>, config: OpackerConfig) -> Self {
        Self {
            cache,
            config,
            visiting: IdentitySet::new(),
            trail: TypeTrail::new(),
            fault: None,
            ser_stack: Vec::new(),
            de_stack: Vec::new(),
        }
    }

    /// Returns the options this engine was built with.
    #[inline]
    pub fn config(&self) -> &OpackerConfig {
        &self.config
    }

    /// Returns the descriptor cache.
    #[inline]
    pub fn cache(&self) -> &Arc<TypeCaptureCache> {
        &self.cache
    }

    /// Returns the registry used to resolve type tags.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        self.cache.registry()
    }

    /// Converts `value` into a document.
    pub fn serialize(&mut self, value: &dyn Reflect) -> Result<Value, SerializeError> {
        self.reset();
        self.prepare_serialize(value).map_err(|error| SerializeError {
            error,
            trail: self.fault.take().unwrap_or_default(),
        })
    }

    /// Converts a document into a `T`.
    pub fn deserialize<T: Reflect + Typed>(&mut self, value: &Value) -> Result<T, DeserializeError> {
        let built = self.deserialize_dyn(T::type_info(), value)?;
        built.take_as::<T>().map_err(|built| DeserializeError {
            error: MarshalError::StructuralMismatch {
                type_path: T::type_info().type_path(),
                reason: format!("built `{}` instead", (*built).reflect_type_info().type_path()),
            },
            trail: TypeTrail::new(),
        })
    }

    /// Converts a document into an instance of the type described by `goal`.
    pub fn deserialize_dyn(
        &mut self,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Box<dyn Reflect>, DeserializeError> {
        self.reset();
        self.prepare_deserialize(goal, value)
            .map_err(|error| DeserializeError {
                error,
                trail: self.fault.take().unwrap_or_default(),
            })
    }

    fn reset(&mut self) {
        self.visiting.clear();
        self.trail.truncate(0);
        self.fault = None;
    }

    /// Keeps the trail of the innermost fault.
    pub(super) fn record_fault(&mut self) {
        if self.fault.is_none() {
            self.fault = Some(self.trail.clone());
        }
    }
}

impl fmt::Debug for Opacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opacker")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::time::Duration;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::thread;

    use op_value::{ArrayValue, NativeKind, ObjectValue, Value};

    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::TypeInfo;
    use crate::marshal::{CyclePolicy, EnumRepr, MarshalError, Opacker};
    use crate::transform::Transformer;

    #[derive(Reflect, Debug, PartialEq, Clone)]
    struct Item {
        name: String,
        tags: Vec<String>,
    }

    #[derive(Reflect, Debug, PartialEq, Clone, Copy)]
    enum Level {
        Low,
        High,
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Setting {
        level: Level,
        items: [Option<Box<Item>>; 2],
    }

    fn item(name: &str) -> Item {
        Item {
            name: name.into(),
            tags: vec![String::from("x"), String::from("y")],
        }
    }

    #[test]
    fn structs_become_objects() {
        let mut opacker = Opacker::new();
        let value = opacker.serialize(&item("a")).unwrap();

        let tags: ArrayValue = ["x", "y"].into_iter().collect();
        let expected: ObjectValue = [("name", Value::from("a")), ("tags", Value::Array(tags))]
            .into_iter()
            .collect();
        assert_eq!(value, Value::Object(expected));
        assert_eq!(opacker.deserialize::<Item>(&value).unwrap(), item("a"));
    }

    #[test]
    fn scalars_round_trip() {
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&-3_i8).unwrap();
        assert_eq!(value, Value::Int(-3));
        assert_eq!(opacker.deserialize::<i8>(&value).unwrap(), -3);

        let value = opacker.serialize(&u64::MAX).unwrap();
        assert_eq!(opacker.deserialize::<u64>(&value).unwrap(), u64::MAX);

        let value = opacker.serialize(&'q').unwrap();
        assert_eq!(opacker.deserialize::<char>(&value).unwrap(), 'q');

        let value = opacker.serialize(&()).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn nested_arrays_keep_native_storage() {
        let mut opacker = Opacker::new();
        let grid = vec![vec![1_i32, 2], vec![3, 4, 5]];

        let value = opacker.serialize(&grid).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.native_kind(), None);
        let first = rows.get(0).unwrap();
        assert_eq!(first.as_array().unwrap().native_kind(), Some(NativeKind::I32));

        assert_eq!(opacker.deserialize::<Vec<Vec<i32>>>(&value).unwrap(), grid);

        let cube = [[[1_u8, 2], [3, 4]], [[5, 6], [7, 8]]];
        let value = opacker.serialize(&cube).unwrap();
        assert_eq!(opacker.deserialize::<[[[u8; 2]; 2]; 2]>(&value).unwrap(), cube);
    }

    #[test]
    fn arrays_accept_every_element_storage() {
        let mut opacker = Opacker::new();

        let boxed: ArrayValue = [1_u16, 2, 3].into_iter().collect();
        let value = Value::Array(boxed);
        assert_eq!(opacker.deserialize::<Vec<u16>>(&value).unwrap(), [1, 2, 3]);

        let bytes = Value::Bytes(vec![9, 8]);
        assert_eq!(opacker.deserialize::<Vec<u8>>(&bytes).unwrap(), [9, 8]);
        assert_eq!(opacker.deserialize::<[u8; 2]>(&bytes).unwrap(), [9, 8]);

        let error = opacker.deserialize::<[u8; 3]>(&bytes).unwrap_err();
        assert!(matches!(error.error, MarshalError::StructuralMismatch { .. }));
    }

    #[test]
    fn enums_follow_the_configured_repr() {
        let setting = Setting {
            level: Level::High,
            items: [None, Some(Box::new(item("b")))],
        };

        let mut by_name = Opacker::new();
        let value = by_name.serialize(&setting).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_str("level"), Some(&Value::from("High")));
        assert_eq!(by_name.deserialize::<Setting>(&value).unwrap(), setting);

        let mut by_ordinal = Opacker::builder().enum_repr(EnumRepr::Ordinal).build();
        let value = by_ordinal.serialize(&setting).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_str("level"), Some(&Value::UInt(1)));
        assert_eq!(by_ordinal.deserialize::<Setting>(&value).unwrap(), setting);

        let error = by_name.deserialize::<Level>(&Value::from("Medium")).unwrap_err();
        assert!(matches!(error.error, MarshalError::StructuralMismatch { .. }));
    }

    #[derive(Reflect)]
    struct Node {
        id: u32,
        next: Option<Arc<Mutex<Node>>>,
    }

    fn looped() -> Arc<Mutex<Node>> {
        let node = Arc::new(Mutex::new(Node { id: 1, next: None }));
        node.lock().unwrap().next = Some(node.clone());
        node
    }

    #[test]
    fn cycles_fail_by_default() {
        let node = looped();
        let mut opacker = Opacker::new();

        let error = opacker.serialize(&node).unwrap_err();
        assert!(matches!(error.error, MarshalError::RecursiveDependency { .. }));
        if cfg!(all(debug_assertions, feature = "debug")) {
            assert!(error.trail.paths().iter().any(|path| path.ends_with("Node")));
        }

        // The engine is usable again, and the lock was released.
        node.lock().unwrap().next = None;
        assert!(opacker.serialize(&node).is_ok());
    }

    #[test]
    fn cycles_can_be_written_as_null() {
        let node = looped();
        let mut opacker = Opacker::builder().cycle_policy(CyclePolicy::Null).build();

        let value = opacker.serialize(&node).unwrap();
        let expected: ObjectValue = [("id", Value::UInt(1)), ("next", Value::Null)]
            .into_iter()
            .collect();
        assert_eq!(value, Value::Object(expected));

        node.lock().unwrap().next = None;
    }

    #[test]
    fn mutual_references_are_cycles() {
        let first = Arc::new(Mutex::new(Node { id: 1, next: None }));
        let second = Arc::new(Mutex::new(Node {
            id: 2,
            next: Some(first.clone()),
        }));
        first.lock().unwrap().next = Some(second.clone());

        let error = Opacker::new().serialize(&first).unwrap_err();
        assert!(matches!(error.error, MarshalError::RecursiveDependency { .. }));

        let mut lenient = Opacker::builder().cycle_policy(CyclePolicy::Null).build();
        let value = lenient.serialize(&first).unwrap();
        let inner: ObjectValue = [("id", Value::UInt(2)), ("next", Value::Null)]
            .into_iter()
            .collect();
        let expected: ObjectValue = [("id", Value::UInt(1)), ("next", Value::Object(inner))]
            .into_iter()
            .collect();
        assert_eq!(value, Value::Object(expected));

        first.lock().unwrap().next = None;
    }

    #[test]
    fn shared_references_are_not_cycles() {
        let shared = Arc::new(item("s"));
        let pair = vec![shared.clone(), shared];

        let mut opacker = Opacker::new();
        let value = opacker.serialize(&pair).unwrap();
        let back: Vec<Arc<Item>> = opacker.deserialize(&value).unwrap();
        assert_eq!(*back[1], item("s"));
    }

    fn three() -> u8 {
        3
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Options {
        name: String,
        #[reflect(default = three)]
        retries: u8,
        nickname: Option<String>,
    }

    #[test]
    fn missing_fields_use_defaults_then_none() {
        let mut opacker = Opacker::new();

        let partial: ObjectValue = [("name", "a")].into_iter().collect();
        let options: Options = opacker.deserialize(&Value::Object(partial)).unwrap();
        assert_eq!(
            options,
            Options {
                name: "a".into(),
                retries: 3,
                nickname: None,
            },
        );

        let error = opacker
            .deserialize::<Options>(&Value::Object(ObjectValue::new()))
            .unwrap_err();
        assert!(matches!(error.error, MarshalError::StructuralMismatch { .. }));
    }

    #[derive(Default)]
    struct Shout;

    impl Transformer for Shout {
        fn serialize(
            &self,
            _engine: &mut Opacker,
            _declared: &'static TypeInfo,
            value: &dyn Reflect,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(value
                .downcast_ref::<String>()
                .map(|text| Box::new(Value::Text(text.to_uppercase())) as Box<dyn Reflect>))
        }

        fn deserialize(
            &self,
            _engine: &mut Opacker,
            _goal: &'static TypeInfo,
            value: &Value,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(value
                .as_str()
                .map(|text| Box::new(text.to_lowercase()) as Box<dyn Reflect>))
        }
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Label {
        #[reflect(transformer = Shout)]
        loud: String,
        quiet: String,
    }

    #[test]
    fn field_hooks_apply_to_their_field_only() {
        let label = Label {
            loud: "hey".into(),
            quiet: "hey".into(),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&label).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_str("loud"), Some(&Value::from("HEY")));
        assert_eq!(object.get_str("quiet"), Some(&Value::from("hey")));

        assert_eq!(opacker.deserialize::<Label>(&value).unwrap(), label);
    }

    #[derive(Default)]
    struct Untouched;

    impl Transformer for Untouched {
        fn serialize(
            &self,
            _engine: &mut Opacker,
            _declared: &'static TypeInfo,
            _value: &dyn Reflect,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(None)
        }

        fn deserialize(
            &self,
            _engine: &mut Opacker,
            _goal: &'static TypeInfo,
            _value: &Value,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(None)
        }
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Schedule {
        #[reflect(transformer = Untouched)]
        slots: VecDeque<u32>,
        #[reflect(transformer = Untouched)]
        every: Duration,
    }

    #[test]
    fn declining_field_hooks_fall_back_to_type_hooks() {
        let schedule = Schedule {
            slots: VecDeque::from([9, 12, 17]),
            every: Duration::new(60, 5),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&schedule).unwrap();
        let object = value.as_object().unwrap();
        let slots: ArrayValue = [9_u32, 12, 17].into_iter().collect();
        assert_eq!(object.get_str("slots"), Some(&Value::Array(slots)));
        let every = object.get_str("every").and_then(Value::as_object).unwrap();
        assert_eq!(every.get_str("secs"), Some(&Value::UInt(60)));

        assert_eq!(opacker.deserialize::<Schedule>(&value).unwrap(), schedule);
    }

    /// Writes any value as `"redacted"`, and reads that back as a blank
    /// instance.
    #[derive(Default)]
    struct Redact;

    impl Transformer for Redact {
        fn serialize(
            &self,
            _engine: &mut Opacker,
            _declared: &'static TypeInfo,
            _value: &dyn Reflect,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            Ok(Some(Box::new(Value::from("redacted"))))
        }

        fn deserialize(
            &self,
            _engine: &mut Opacker,
            goal: &'static TypeInfo,
            value: &Value,
        ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
            if value.as_str() != Some("redacted") {
                return Ok(None);
            }
            crate::construct::instantiate(goal).map(Some)
        }
    }

    #[derive(Reflect, Debug, PartialEq)]
    #[reflect(transformer = Redact, inheritable)]
    struct Secret {
        key: String,
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Account {
        #[reflect(base)]
        secret: Secret,
        owner: String,
    }

    #[derive(Reflect, Debug, PartialEq)]
    #[reflect(transformer = Redact)]
    struct Note {
        text: String,
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Memo {
        #[reflect(base)]
        note: Note,
        author: String,
    }

    #[test]
    fn inheritable_hooks_reach_derived_types() {
        let account = Account {
            secret: Secret { key: "k".into() },
            owner: "ann".into(),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&account).unwrap();
        assert_eq!(value, Value::from("redacted"));

        let blank = Account {
            secret: Secret { key: String::new() },
            owner: String::new(),
        };
        assert_eq!(opacker.deserialize::<Account>(&value).unwrap(), blank);
    }

    #[test]
    fn other_hooks_stay_on_the_declaring_type() {
        let memo = Memo {
            note: Note { text: "t".into() },
            author: "bo".into(),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&memo).unwrap();
        let expected: ObjectValue = [("text", "t"), ("author", "bo")].into_iter().collect();
        assert_eq!(value, Value::Object(expected));
        assert_eq!(opacker.deserialize::<Memo>(&value).unwrap(), memo);

        let value = opacker.serialize(&memo.note).unwrap();
        assert_eq!(value, Value::from("redacted"));
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Index {
        words: HashSet<String>,
        counts: HashMap<String, u32>,
    }

    #[test]
    fn hashed_collections_round_trip() {
        let index = Index {
            words: HashSet::from([String::from("a"), String::from("b")]),
            counts: HashMap::from([(String::from("a"), 2), (String::from("b"), 5)]),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&index).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_str("words").and_then(Value::as_array).map(ArrayValue::len), Some(2));
        let counts = object.get_str("counts").and_then(Value::as_object).unwrap();
        assert_eq!(counts.get_str("b"), Some(&Value::UInt(5)));

        assert_eq!(opacker.deserialize::<Index>(&value).unwrap(), index);
    }

    #[test]
    fn wrapped_map_entries_keep_their_runtime_type() {
        let mut opacker = Opacker::builder().wrap_map_element_type(true).build();
        let mut bag: HashMap<String, Box<dyn Reflect>> = HashMap::new();
        bag.insert("count".into(), Box::new(7_u32));
        bag.insert("name".into(), Box::new(String::from("x")));

        let value = opacker.serialize(&bag).unwrap();
        for (key, entry) in value.as_object().unwrap().iter() {
            assert!(key.as_object().unwrap().get_str("type").is_some());
            assert!(entry.as_object().unwrap().get_str("type").is_some());
        }

        let back: HashMap<String, Box<dyn Reflect>> = opacker.deserialize(&value).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!((*back["count"]).downcast_ref::<u32>(), Some(&7));
        assert_eq!((*back["name"]).downcast_ref::<String>().map(String::as_str), Some("x"));
    }

    #[derive(Reflect, Default)]
    struct Tree {
        children: VecDeque<Tree>,
    }

    impl Tree {
        fn chain(depth: usize) -> Self {
            let mut tree = Tree::default();
            for _ in 0..depth {
                tree = Tree {
                    children: VecDeque::from([tree]),
                };
            }
            tree
        }

        fn depth(&self) -> usize {
            let mut depth = 0;
            let mut tree = self;
            while let Some(child) = tree.children.front() {
                depth += 1;
                tree = child;
            }
            depth
        }

        /// Drops the chain one level at a time.
        fn dismantle(mut self) {
            while let Some(child) = self.children.pop_front() {
                self = child;
            }
        }
    }

    /// Drops a document one container at a time.
    fn dismantle_document(value: Value) {
        let mut pending = vec![value];
        while let Some(value) = pending.pop() {
            match value {
                Value::Array(array) => pending.extend(array.into_values()),
                Value::Object(mut object) => {
                    let keys: Vec<Value> = object.keys().cloned().collect();
                    for key in keys {
                        pending.extend(object.remove(&key));
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn deep_lists_do_not_grow_the_call_stack() {
        const DEPTH: usize = 20_000;

        let depth = thread::Builder::new()
            .stack_size(4 << 20)
            .spawn(|| {
                let tree = Tree::chain(DEPTH);
                let mut opacker = Opacker::new();
                let value = opacker.serialize(&tree).unwrap();
                tree.dismantle();

                let back: Tree = opacker.deserialize(&value).unwrap();
                dismantle_document(value);
                let depth = back.depth();
                back.dismantle();
                depth
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(depth, DEPTH);
    }

    #[derive(Reflect)]
    struct Envelope {
        #[reflect(explicit_type = String)]
        body: Box<dyn Reflect>,
    }

    #[test]
    fn dynamic_fields_need_a_concrete_type() {
        let envelope = Envelope {
            body: Box::new(String::from("hi")),
        };
        let mut opacker = Opacker::new();

        let value = opacker.serialize(&envelope).unwrap();
        let back: Envelope = opacker.deserialize(&value).unwrap();
        assert_eq!((*back.body).downcast_ref::<String>().map(String::as_str), Some("hi"));

        let error = opacker
            .deserialize::<Box<dyn Reflect>>(&Value::from("hi"))
            .unwrap_err();
        assert!(matches!(error.error, MarshalError::Instantiation { .. }));
    }

    #[test]
    fn opaque_types_without_hooks_are_rejected() {
        let mut opacker = Opacker::builder()
            .cache(Arc::new(crate::TypeCaptureCache::empty()))
            .build();
        let error = opacker.serialize(&Duration::ZERO).unwrap_err();
        assert!(matches!(error.error, MarshalError::TypeNotAdmitted { .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn documents_survive_a_json_codec() {
        let mut opacker = Opacker::new();
        let setting = Setting {
            level: Level::Low,
            items: [Some(Box::new(item("c"))), None],
        };

        let value = opacker.serialize(&setting).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(opacker.deserialize::<Setting>(&decoded).unwrap(), setting);
    }
}
