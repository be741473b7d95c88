//! Deserialization: [`Value`] to object graph.
//!
//! Mirrors serialization: structs, arrays, lists, maps and wrappers that need
//! their inner value first are expanded through frames. A struct frame owns its
//! instance and assigns each finished child to the matching field.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use op_utils::stack;
use op_value::{ArrayValue, ObjectValue, Value};
use typed_arena::Arena;

use crate::Reflect;
use crate::capture::TypeDescriptor;
use crate::construct;
use crate::info::{ArrayInfo, ListInfo, MapInfo, TypeInfo};
use crate::marshal::{EnumRepr, MarshalError, Opacker, untag};
use crate::transform::TransformerRef;

// -----------------------------------------------------------------------------
// Frames

pub(crate) enum DeFrame<'v> {
    Struct(StructFrame<'v>),
    Array(ArrayFrame<'v>),
    List(ListFrame<'v>),
    Map(MapFrame<'v>),
    Wrap(WrapFrame<'v>),
}

pub(crate) struct StructFrame<'v> {
    descriptor: Arc<TypeDescriptor>,
    target: Box<dyn Reflect>,
    source: &'v ObjectValue,
    next: usize,
    pending: usize,
}

pub(crate) struct ArrayFrame<'v> {
    info: &'static TypeInfo,
    array: &'static ArrayInfo,
    source: &'v ArrayValue,
    next: usize,
    items: Vec<Box<dyn Reflect>>,
}

pub(crate) struct ListFrame<'v> {
    info: &'static TypeInfo,
    list: &'static ListInfo,
    source: &'v ArrayValue,
    wrap: bool,
    next: usize,
    items: Vec<Box<dyn Reflect>>,
}

/// Reads the key of an entry, then its value.
pub(crate) struct MapFrame<'v> {
    info: &'static TypeInfo,
    map: &'static MapInfo,
    source: Box<dyn Iterator<Item = (&'v Value, &'v Value)> + Send + 'v>,
    wrap: bool,
    /// The value of the current entry, until it is handed out.
    value: Option<&'v Value>,
    /// The finished key of the current entry.
    key: Option<Box<dyn Reflect>>,
    entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
}

/// An `Option` or a pointer, waiting for its inner value.
pub(crate) struct WrapFrame<'v> {
    info: &'static TypeInfo,
    inner: &'static TypeInfo,
    source: Option<&'v Value>,
    value: Option<Box<dyn Reflect>>,
}

/// A value a frame wants deserialized next.
struct Child<'v> {
    goal: &'static TypeInfo,
    value: &'v Value,
    hook: Option<TransformerRef>,
    /// The value may be `{"type": path, "value": value}`.
    tagged: bool,
}

impl<'v> Child<'v> {
    #[inline]
    fn element(goal: &'static TypeInfo, value: &'v Value, tagged: bool) -> Self {
        Self {
            goal,
            value,
            hook: None,
            tagged,
        }
    }
}

enum Step {
    Done(Box<dyn Reflect>),
    Pushed,
}

fn mismatch(goal: &'static TypeInfo, reason: impl Into<String>) -> MarshalError {
    MarshalError::StructuralMismatch {
        type_path: goal.type_path(),
        reason: reason.into(),
    }
}

fn check_len(goal: &'static TypeInfo, array: &ArrayInfo, len: usize) -> Result<(), MarshalError> {
    match array.fixed_len() {
        Some(fixed) if fixed != len => Err(mismatch(
            goal,
            format!("expected {fixed} elements, found {len}"),
        )),
        _ => Ok(()),
    }
}

fn found(goal: &'static TypeInfo, value: &Value) -> MarshalError {
    mismatch(goal, format!("found {}", value.kind()))
}

impl StructFrame<'_> {
    fn assign(&mut self, index: usize, value: Box<dyn Reflect>) -> Result<(), MarshalError> {
        let owner = self.descriptor.info();
        let Some(field) = self.descriptor.fields().get(index) else {
            return Err(mismatch(owner, "field index out of range"));
        };
        let slot = field.get_mut(owner, &mut *self.target)?;
        slot.set(value).map_err(|rejected| MarshalError::FieldAccess {
            type_path: owner.type_path(),
            field: field.field_name(),
            reason: format!(
                "cannot assign `{}`",
                (*rejected).reflect_type_info().type_path(),
            ),
        })
    }

    /// Fills a field the document has no entry for.
    ///
    /// Uses the field's default supplier, then `None` for optional fields.
    /// Any other field is required.
    fn fill_missing(&mut self, index: usize) -> Result<(), MarshalError> {
        let owner = self.descriptor.info();
        let Some(field) = self.descriptor.fields().get(index) else {
            return Err(mismatch(owner, "field index out of range"));
        };

        let value = match (field.default_fn(), field.declared()) {
            (Some(default), _) => default(),
            (None, TypeInfo::Optional(optional)) => optional.none(),
            _ => return Err(mismatch(owner, format!("missing field `{}`", field.name()))),
        };
        self.assign(index, value)
    }
}

impl<'v> DeFrame<'v> {
    fn next_child(&mut self, values: &'v Arena<Value>) -> Result<Option<Child<'v>>, MarshalError> {
        match self {
            Self::Struct(frame) => {
                while let Some(field) = frame.descriptor.fields().get(frame.next) {
                    let index = frame.next;
                    frame.next += 1;

                    let source = frame.source;
                    if let Some(value) = source.get_str(field.name()) {
                        frame.pending = index;
                        return Ok(Some(Child {
                            goal: field.goal(),
                            value,
                            hook: field.transformer().cloned(),
                            tagged: false,
                        }));
                    }
                    frame.fill_missing(index)?;
                }
                Ok(None)
            }
            Self::Array(frame) => {
                let source = frame.source;
                let value = match source.get(frame.next) {
                    Some(Cow::Borrowed(value)) => value,
                    Some(Cow::Owned(value)) => &*values.alloc(value),
                    None => return Ok(None),
                };
                frame.next += 1;
                Ok(Some(Child::element(frame.array.item_info(), value, false)))
            }
            Self::List(frame) => {
                let source = frame.source;
                let value = match source.get(frame.next) {
                    Some(Cow::Borrowed(value)) => value,
                    Some(Cow::Owned(value)) => &*values.alloc(value),
                    None => return Ok(None),
                };
                frame.next += 1;
                Ok(Some(Child::element(frame.list.item_info(), value, frame.wrap)))
            }
            Self::Map(frame) => {
                if let Some(value) = frame.value.take() {
                    return Ok(Some(Child::element(frame.map.value_info(), value, frame.wrap)));
                }
                let Some((key, value)) = frame.source.next() else {
                    return Ok(None);
                };
                frame.value = Some(value);
                Ok(Some(Child::element(frame.map.key_info(), key, frame.wrap)))
            }
            Self::Wrap(frame) => Ok(frame
                .source
                .take()
                .map(|value| Child::element(frame.inner, value, false))),
        }
    }

    fn accept(&mut self, value: Box<dyn Reflect>) -> Result<(), MarshalError> {
        match self {
            Self::Struct(frame) => frame.assign(frame.pending, value),
            Self::Array(frame) => {
                frame.items.push(value);
                Ok(())
            }
            Self::List(frame) => {
                frame.items.push(value);
                Ok(())
            }
            Self::Map(frame) => {
                match frame.key.take() {
                    Some(key) => frame.entries.push((key, value)),
                    None => frame.key = Some(value),
                }
                Ok(())
            }
            Self::Wrap(frame) => {
                frame.value = Some(value);
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<Box<dyn Reflect>, MarshalError> {
        match self {
            Self::Struct(frame) => Ok(frame.target),
            Self::Array(frame) => frame
                .array
                .from_items(frame.items)
                .ok_or_else(|| mismatch(frame.info, "the elements do not fit")),
            Self::List(frame) => frame
                .list
                .from_items(frame.items)
                .ok_or_else(|| mismatch(frame.info, "the elements do not fit")),
            Self::Map(frame) => frame
                .map
                .from_entries(frame.entries)
                .ok_or_else(|| mismatch(frame.info, "the entries do not fit")),
            Self::Wrap(frame) => {
                let Some(value) = frame.value else {
                    return Err(mismatch(frame.info, "missing inner value"));
                };
                let wrapped = match frame.info {
                    TypeInfo::Optional(optional) => optional.some(value),
                    TypeInfo::Pointer(pointer) => pointer.wrap(value),
                    _ => None,
                };
                wrapped.ok_or_else(|| mismatch(frame.info, "the inner value does not fit"))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Engine

impl Opacker {
    /// Converts a document into an instance of `goal`, from inside a hook.
    ///
    /// See [`prepare_serialize`](Opacker::prepare_serialize).
    pub fn prepare_deserialize(
        &mut self,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Box<dyn Reflect>, MarshalError> {
        let values = Arena::new();
        let mut frames = stack::recycle(mem::take(&mut self.de_stack));
        let depth = self.trail.len();

        let result = self.run_deserialize(goal, value, &values, &mut frames);
        if result.is_err() {
            self.record_fault();
            frames.clear();
            self.trail.truncate(depth);
        }

        self.de_stack = stack::recycle(frames);
        result
    }

    fn run_deserialize<'v>(
        &mut self,
        goal: &'static TypeInfo,
        root: &'v Value,
        values: &'v Arena<Value>,
        frames: &mut Vec<DeFrame<'v>>,
    ) -> Result<Box<dyn Reflect>, MarshalError> {
        if let Step::Done(built) = self.deserialize_child(goal, root, None, values, frames)? {
            return Ok(built);
        }

        while let Some(top) = frames.last_mut() {
            let built = match top.next_child(values)? {
                Some(mut child) => {
                    if child.tagged
                        && let Some((goal, inner)) = untag(self, child.value)?
                    {
                        child.goal = goal;
                        child.value = inner;
                    }
                    match self.deserialize_child(child.goal, child.value, child.hook, values, frames)? {
                        Step::Done(built) => built,
                        Step::Pushed => continue,
                    }
                }
                None => {
                    let Some(frame) = frames.pop() else { break };
                    self.trail.pop();
                    frame.finish()?
                }
            };

            match frames.last_mut() {
                Some(parent) => parent.accept(built)?,
                None => return Ok(built),
            }
        }

        // The root frame always returns from the loop.
        Err(mismatch(goal, "nothing was built"))
    }

    /// Deserializes a child, through its field hook if there is one.
    ///
    /// A field hook that returns a [`Value`] replaces the document, which is
    /// then read structurally without type-level hooks. Any other output is
    /// the finished child. If the hook declines, the type-level hooks run.
    fn deserialize_child<'v>(
        &mut self,
        goal: &'static TypeInfo,
        value: &'v Value,
        hook: Option<TransformerRef>,
        values: &'v Arena<Value>,
        frames: &mut Vec<DeFrame<'v>>,
    ) -> Result<Step, MarshalError> {
        let Some(hook) = hook else {
            return self.dispatch_deserialize(goal, value, values, frames);
        };
        let Some(built) = hook.get().deserialize(self, goal, value)? else {
            return self.dispatch_deserialize(goal, value, values, frames);
        };
        match built.take::<Value>() {
            Ok(replaced) => {
                let value = &*values.alloc(replaced);
                self.expand_deserialize(goal, value, None, values, frames)
            }
            Err(built) => Ok(Step::Done(built)),
        }
    }

    /// Runs the type-level hooks of `goal` in reverse order, then reads the
    /// result by kind.
    fn dispatch_deserialize<'v>(
        &mut self,
        mut goal: &'static TypeInfo,
        mut value: &'v Value,
        values: &'v Arena<Value>,
        frames: &mut Vec<DeFrame<'v>>,
    ) -> Result<Step, MarshalError> {
        loop {
            match goal {
                TypeInfo::Leaf(leaf) => {
                    return leaf
                        .from_value(value)
                        .map(Step::Done)
                        .ok_or_else(|| found(goal, value));
                }
                TypeInfo::Dynamic(_) => match untag(self, value)? {
                    Some((concrete, inner)) => {
                        goal = concrete;
                        value = inner;
                    }
                    None => {
                        return Err(MarshalError::Instantiation {
                            type_path: goal.type_path(),
                            reason: "the document carries no type tag".into(),
                        });
                    }
                },
                _ => break,
            }
        }

        let descriptor = self.cache.get_or_capture(goal)?;
        for hook in descriptor.transformers().iter().rev() {
            let Some(built) = hook.get().deserialize(self, goal, value)? else {
                continue;
            };
            match built.take::<Value>() {
                Ok(replaced) => value = &*values.alloc(replaced),
                Err(built) if (*built).ty_id() == goal.type_id() => return Ok(Step::Done(built)),
                Err(built) => {
                    return Err(MarshalError::Transform {
                        transformer: hook.ty().path(),
                        reason: format!(
                            "built `{}` for `{}`",
                            (*built).reflect_type_info().type_path(),
                            goal.type_path(),
                        ),
                    });
                }
            }
        }

        self.expand_deserialize(goal, value, Some(descriptor), values, frames)
    }

    /// Reads `value` as `goal` by its kind, without hooks.
    fn expand_deserialize<'v>(
        &mut self,
        goal: &'static TypeInfo,
        value: &'v Value,
        descriptor: Option<Arc<TypeDescriptor>>,
        values: &'v Arena<Value>,
        frames: &mut Vec<DeFrame<'v>>,
    ) -> Result<Step, MarshalError> {
        match goal {
            TypeInfo::Leaf(leaf) => leaf
                .from_value(value)
                .map(Step::Done)
                .ok_or_else(|| found(goal, value)),
            TypeInfo::Opaque(_) => Err(MarshalError::TypeNotAdmitted {
                type_path: goal.type_path(),
            }),
            TypeInfo::List(list) => {
                if !self.admits_elements(goal, descriptor)? {
                    return Err(MarshalError::TypeNotAdmitted {
                        type_path: goal.type_path(),
                    });
                }
                let Value::Array(source) = value else {
                    return Err(found(goal, value));
                };

                self.trail.push(goal);
                frames.push(DeFrame::List(ListFrame {
                    info: goal,
                    list,
                    source,
                    wrap: self.config.wrap_list_element_type(),
                    next: 0,
                    items: Vec::with_capacity(source.len()),
                }));
                Ok(Step::Pushed)
            }
            TypeInfo::Map(map) => {
                if !self.admits_elements(goal, descriptor)? {
                    return Err(MarshalError::TypeNotAdmitted {
                        type_path: goal.type_path(),
                    });
                }
                let Value::Object(source) = value else {
                    return Err(found(goal, value));
                };

                self.trail.push(goal);
                frames.push(DeFrame::Map(MapFrame {
                    info: goal,
                    map,
                    source: Box::new(source.iter()),
                    wrap: self.config.wrap_map_element_type(),
                    value: None,
                    key: None,
                    entries: Vec::with_capacity(source.len()),
                }));
                Ok(Step::Pushed)
            }
            TypeInfo::Dynamic(_) => self.dispatch_deserialize(goal, value, values, frames),
            TypeInfo::Enum(info) => {
                let index = match (self.config.enum_repr(), value) {
                    (EnumRepr::Name, Value::Text(name)) => info.index_of(name),
                    (EnumRepr::Ordinal, value) => {
                        value.as_u64().and_then(|index| usize::try_from(index).ok())
                    }
                    _ => None,
                };
                index
                    .and_then(|index| info.build_variant(index))
                    .map(Step::Done)
                    .ok_or_else(|| mismatch(goal, format!("unknown variant {value}")))
            }
            TypeInfo::Optional(optional) => {
                if value.is_null() {
                    return Ok(Step::Done(optional.none()));
                }
                self.push_wrap(goal, optional.inner_info(), value, frames)
            }
            TypeInfo::Pointer(pointer) => {
                self.push_wrap(goal, pointer.pointee_info(), value, frames)
            }
            TypeInfo::Array(array) => {
                let source = match value {
                    Value::Array(source) => source,
                    Value::Bytes(bytes) if array.item_info().type_is::<u8>() => {
                        check_len(goal, array, bytes.len())?;
                        return array
                            .from_native(&ArrayValue::from(bytes.clone()))
                            .map(Step::Done)
                            .ok_or_else(|| mismatch(goal, "the bytes do not fit"));
                    }
                    _ => return Err(found(goal, value)),
                };
                check_len(goal, array, source.len())?;
                if source.native_kind().is_some()
                    && let Some(built) = array.from_native(source)
                {
                    return Ok(Step::Done(built));
                }

                self.trail.push(goal);
                frames.push(DeFrame::Array(ArrayFrame {
                    info: goal,
                    array,
                    source,
                    next: 0,
                    items: Vec::with_capacity(source.len()),
                }));
                Ok(Step::Pushed)
            }
            TypeInfo::Struct(_) => {
                let Value::Object(source) = value else {
                    return Err(found(goal, value));
                };
                let descriptor = match descriptor {
                    Some(descriptor) => descriptor,
                    None => self.cache.get_or_capture(goal)?,
                };
                let target = construct::instantiate(goal)?;

                self.trail.push(goal);
                frames.push(DeFrame::Struct(StructFrame {
                    descriptor,
                    target,
                    source,
                    next: 0,
                    pending: 0,
                }));
                Ok(Step::Pushed)
            }
        }
    }

    /// Returns `true` if the hooks of a list or map type let it be read
    /// element by element.
    fn admits_elements(
        &self,
        goal: &'static TypeInfo,
        descriptor: Option<Arc<TypeDescriptor>>,
    ) -> Result<bool, MarshalError> {
        let descriptor = match descriptor {
            Some(descriptor) => descriptor,
            None => self.cache.get_or_capture(goal)?,
        };
        Ok(descriptor.walks_elements())
    }

    fn push_wrap<'v>(
        &mut self,
        info: &'static TypeInfo,
        inner: &'static TypeInfo,
        value: &'v Value,
        frames: &mut Vec<DeFrame<'v>>,
    ) -> Result<Step, MarshalError> {
        self.trail.push(info);
        frames.push(DeFrame::Wrap(WrapFrame {
            info,
            inner,
            source: Some(value),
            value: None,
        }));
        Ok(Step::Pushed)
    }
}
