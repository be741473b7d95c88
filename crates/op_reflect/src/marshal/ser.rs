//! Serialization: object graph to [`Value`].
//!
//! Structs, arrays, lists and maps are expanded through an explicit stack of
//! frames. A frame hands out one child at a time, and receives the child's
//! finished value before the next one is handed out. Everything else is
//! finished without a frame.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;
use core::ptr;

use log::warn;
use op_utils::{Identity, stack};
use op_value::{ArrayValue, ObjectValue, Value};
use typed_arena::Arena;

use crate::Reflect;
use crate::capture::TypeDescriptor;
use crate::info::TypeInfo;
use crate::marshal::{CyclePolicy, EnumRepr, MarshalError, Opacker, tag};
use crate::ops::{Array, ReflectRef};
use crate::transform::TransformerRef;

// -----------------------------------------------------------------------------
// Frames

pub(crate) enum SerFrame<'a> {
    Struct(StructFrame<'a>),
    Array(ArrayFrame<'a>),
    List(ListFrame<'a>),
    Map(MapFrame<'a>),
}

pub(crate) struct StructFrame<'a> {
    source: &'a dyn Reflect,
    descriptor: Arc<TypeDescriptor>,
    identity: Identity,
    next: usize,
    pending: &'static str,
    object: ObjectValue,
}

pub(crate) struct ArrayFrame<'a> {
    source: &'a dyn Array,
    item: &'static TypeInfo,
    identity: Identity,
    next: usize,
    array: ArrayValue,
}

pub(crate) struct ListFrame<'a> {
    elements: Box<dyn Iterator<Item = &'a dyn Reflect> + Send + 'a>,
    identity: Identity,
    wrap: bool,
    pending: Option<&'a dyn Reflect>,
    array: ArrayValue,
}

/// Hands out the key of an entry, then its value.
pub(crate) struct MapFrame<'a> {
    entries: Box<dyn Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)> + Send + 'a>,
    identity: Identity,
    wrap: bool,
    pending: Option<&'a dyn Reflect>,
    /// The value of the current entry, until it is handed out.
    value: Option<&'a dyn Reflect>,
    /// The finished key of the current entry.
    key: Option<Value>,
    object: ObjectValue,
}

/// A value a frame wants serialized next.
struct Child<'a> {
    value: &'a dyn Reflect,
    declared: &'static TypeInfo,
    hook: Option<TransformerRef>,
}

enum Step {
    Done(Value),
    Pushed,
}

impl<'a> SerFrame<'a> {
    #[inline]
    fn identity(&self) -> Identity {
        match self {
            Self::Struct(frame) => frame.identity,
            Self::Array(frame) => frame.identity,
            Self::List(frame) => frame.identity,
            Self::Map(frame) => frame.identity,
        }
    }

    /// Returns the child being written, if its value must be tagged.
    #[inline]
    fn tagged_child(&self) -> Option<&'a dyn Reflect> {
        match self {
            Self::List(frame) if frame.wrap => frame.pending,
            Self::Map(frame) if frame.wrap => frame.pending,
            _ => None,
        }
    }

    fn next_child(&mut self) -> Result<Option<Child<'a>>, MarshalError> {
        match self {
            Self::Struct(frame) => {
                let Some(field) = frame.descriptor.fields().get(frame.next) else {
                    return Ok(None);
                };
                frame.next += 1;
                frame.pending = field.name();
                Ok(Some(Child {
                    value: field.get(frame.descriptor.info(), frame.source)?,
                    declared: field.declared(),
                    hook: field.transformer().cloned(),
                }))
            }
            Self::Array(frame) => {
                let Some(value) = frame.source.get(frame.next) else {
                    return Ok(None);
                };
                frame.next += 1;
                Ok(Some(Child {
                    value,
                    declared: frame.item,
                    hook: None,
                }))
            }
            Self::List(frame) => {
                frame.pending = frame.elements.next();
                Ok(frame.pending.map(Child::element))
            }
            Self::Map(frame) => {
                if let Some(value) = frame.value.take() {
                    frame.pending = Some(value);
                } else {
                    let Some((key, value)) = frame.entries.next() else {
                        frame.pending = None;
                        return Ok(None);
                    };
                    frame.value = Some(value);
                    frame.pending = Some(key);
                }
                Ok(frame.pending.map(Child::element))
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Self::Struct(frame) => {
                frame.object.put(frame.pending, value);
            }
            Self::Array(frame) => frame.array.push(value),
            Self::List(frame) => frame.array.push(value),
            Self::Map(frame) => match frame.key.take() {
                Some(key) => {
                    frame.object.put(key, value);
                }
                None => frame.key = Some(value),
            },
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Struct(frame) => Value::Object(frame.object),
            Self::Array(frame) => Value::Array(frame.array),
            Self::List(frame) => Value::Array(frame.array),
            Self::Map(frame) => Value::Object(frame.object),
        }
    }
}

impl<'a> Child<'a> {
    /// An element of a list or map, which has no field hook.
    #[inline]
    fn element(value: &'a dyn Reflect) -> Self {
        Self {
            value,
            declared: value.reflect_type_info(),
            hook: None,
        }
    }
}

#[inline]
fn identity_of(value: &dyn Reflect) -> Identity {
    Identity::from_raw(ptr::from_ref(value).cast::<()>() as usize, value.ty_id())
}

// -----------------------------------------------------------------------------
// Engine

impl Opacker {
    /// Converts `value` into a document, from inside a hook.
    ///
    /// Unlike [`serialize`](Opacker::serialize), the traversal state of the
    /// enclosing call is kept, so cycles through the hook are still detected.
    pub fn prepare_serialize(&mut self, value: &dyn Reflect) -> Result<Value, MarshalError> {
        let arena = Arena::new();
        let mut frames = stack::recycle(mem::take(&mut self.ser_stack));
        let depth = self.trail.len();

        let result = self.run_serialize(value, &arena, &mut frames);
        if result.is_err() {
            self.record_fault();
            for frame in frames.drain(..) {
                self.visiting.leave(frame.identity());
            }
            self.trail.truncate(depth);
        }

        self.ser_stack = stack::recycle(frames);
        result
    }

    fn run_serialize<'a>(
        &mut self,
        root: &'a dyn Reflect,
        arena: &'a Arena<Box<dyn Reflect>>,
        frames: &mut Vec<SerFrame<'a>>,
    ) -> Result<Value, MarshalError> {
        let declared = root.reflect_type_info();
        if let Step::Done(value) = self.serialize_child(root, declared, None, arena, frames)? {
            return Ok(value);
        }

        while let Some(top) = frames.last_mut() {
            let value = match top.next_child()? {
                Some(child) => {
                    match self.serialize_child(child.value, child.declared, child.hook, arena, frames)? {
                        Step::Done(value) => value,
                        Step::Pushed => continue,
                    }
                }
                None => {
                    let Some(frame) = frames.pop() else { break };
                    self.visiting.leave(frame.identity());
                    self.trail.pop();
                    frame.finish()
                }
            };

            match frames.last_mut() {
                Some(parent) => match parent.tagged_child() {
                    Some(source) => parent.accept(tag(self, source, value)),
                    None => parent.accept(value),
                },
                None => return Ok(value),
            }
        }

        // The root frame always returns from the loop.
        Ok(Value::Null)
    }

    /// Serializes a child, through its field hook if there is one.
    ///
    /// A field hook runs before the type-level hooks: its output goes through
    /// the full dispatch, and if it declines, so does the field value.
    fn serialize_child<'a>(
        &mut self,
        value: &'a dyn Reflect,
        declared: &'static TypeInfo,
        hook: Option<TransformerRef>,
        arena: &'a Arena<Box<dyn Reflect>>,
        frames: &mut Vec<SerFrame<'a>>,
    ) -> Result<Step, MarshalError> {
        let Some(hook) = hook else {
            return self.dispatch(value, arena, frames);
        };
        match hook.get().serialize(self, declared, value)? {
            Some(replaced) => self.dispatch(&**arena.alloc(replaced), arena, frames),
            None => self.dispatch(value, arena, frames),
        }
    }

    /// Runs the type-level hooks of `value`, then expands the result.
    fn dispatch<'a>(
        &mut self,
        mut value: &'a dyn Reflect,
        arena: &'a Arena<Box<dyn Reflect>>,
        frames: &mut Vec<SerFrame<'a>>,
    ) -> Result<Step, MarshalError> {
        'dispatch: loop {
            match value.reflect_ref() {
                ReflectRef::Leaf(leaf) => return Ok(Step::Done(leaf.to_value())),
                ReflectRef::Array(array) => {
                    if let Some(native) = array.to_native() {
                        return Ok(Step::Done(Value::Array(native)));
                    }
                }
                _ => {}
            }

            let info = value.reflect_type_info();
            let descriptor = self.cache.get_or_capture(info)?;
            for hook in descriptor.transformers() {
                if let Some(replaced) = hook.get().serialize(self, info, value)? {
                    value = &**arena.alloc(replaced);
                    if value.ty_id() != info.type_id() {
                        continue 'dispatch;
                    }
                }
            }
            return self.expand(value, descriptor, arena, frames);
        }
    }

    /// Writes `value` by its kind, after its hooks ran.
    fn expand<'a>(
        &mut self,
        value: &'a dyn Reflect,
        descriptor: Arc<TypeDescriptor>,
        arena: &'a Arena<Box<dyn Reflect>>,
        frames: &mut Vec<SerFrame<'a>>,
    ) -> Result<Step, MarshalError> {
        let info = value.reflect_type_info();
        match value.reflect_ref() {
            ReflectRef::Leaf(leaf) => Ok(Step::Done(leaf.to_value())),
            ReflectRef::Opaque(_) => Err(MarshalError::TypeNotAdmitted {
                type_path: info.type_path(),
            }),
            ReflectRef::Optional(None) => Ok(Step::Done(Value::Null)),
            ReflectRef::Optional(Some(inner)) | ReflectRef::Dynamic(inner) => {
                self.dispatch(inner, arena, frames)
            }
            ReflectRef::Pointer(pointer) => match pointer.pointee() {
                Some(pointee) => self.dispatch(pointee, arena, frames),
                None => self.serialize_locked(value).map(Step::Done),
            },
            ReflectRef::Enum(variant) => Ok(Step::Done(match self.config.enum_repr() {
                EnumRepr::Name => Value::from(variant.variant_name()),
                EnumRepr::Ordinal => Value::from(variant.variant_index()),
            })),
            ReflectRef::Struct(_) => {
                let Some(identity) = self.enter(value)? else {
                    return Ok(Step::Done(Value::Null));
                };
                self.trail.push(info);
                frames.push(SerFrame::Struct(StructFrame {
                    source: value,
                    object: ObjectValue::with_capacity(descriptor.fields().len()),
                    descriptor,
                    identity,
                    next: 0,
                    pending: "",
                }));
                Ok(Step::Pushed)
            }
            ReflectRef::List(list) => {
                if !descriptor.walks_elements() {
                    return Err(MarshalError::TypeNotAdmitted {
                        type_path: info.type_path(),
                    });
                }
                let Some(identity) = self.enter(value)? else {
                    return Ok(Step::Done(Value::Null));
                };
                self.trail.push(info);
                frames.push(SerFrame::List(ListFrame {
                    elements: list.iter(),
                    identity,
                    wrap: self.config.wrap_list_element_type(),
                    pending: None,
                    array: ArrayValue::with_capacity(list.len()),
                }));
                Ok(Step::Pushed)
            }
            ReflectRef::Map(map) => {
                if !descriptor.walks_elements() {
                    return Err(MarshalError::TypeNotAdmitted {
                        type_path: info.type_path(),
                    });
                }
                let Some(identity) = self.enter(value)? else {
                    return Ok(Step::Done(Value::Null));
                };
                self.trail.push(info);
                frames.push(SerFrame::Map(MapFrame {
                    entries: map.iter(),
                    identity,
                    wrap: self.config.wrap_map_element_type(),
                    pending: None,
                    value: None,
                    key: None,
                    object: ObjectValue::with_capacity(map.len()),
                }));
                Ok(Step::Pushed)
            }
            ReflectRef::Array(array) => {
                let Some(identity) = self.enter(value)? else {
                    return Ok(Step::Done(Value::Null));
                };
                let item = match info {
                    TypeInfo::Array(array_info) => array_info.item_info(),
                    _ => info,
                };
                self.trail.push(info);
                frames.push(SerFrame::Array(ArrayFrame {
                    source: array,
                    item,
                    identity,
                    next: 0,
                    array: ArrayValue::with_capacity(array.len()),
                }));
                Ok(Step::Pushed)
            }
        }
    }

    /// Writes the pointee of a lock, holding the lock meanwhile.
    ///
    /// The lock itself takes part in cycle detection, so a graph that leads
    /// back to a held lock is reported instead of deadlocking. A guard cannot
    /// outlive `with_pointee`, so each nested lock takes one call level.
    fn serialize_locked(&mut self, value: &dyn Reflect) -> Result<Value, MarshalError> {
        let ReflectRef::Pointer(pointer) = value.reflect_ref() else {
            return Err(MarshalError::TypeNotAdmitted {
                type_path: value.reflect_type_info().type_path(),
            });
        };
        let Some(identity) = self.enter(value)? else {
            return Ok(Value::Null);
        };

        self.trail.push(value.reflect_type_info());
        let mut result = Ok(Value::Null);
        pointer.with_pointee(&mut |pointee| result = self.prepare_serialize(pointee));
        self.trail.pop();
        self.visiting.leave(identity);
        result
    }

    /// Marks `value` as being written.
    ///
    /// Returns `None` if it already is and the policy writes `Null`.
    fn enter(&mut self, value: &dyn Reflect) -> Result<Option<Identity>, MarshalError> {
        let identity = identity_of(value);
        if self.visiting.enter(identity) {
            return Ok(Some(identity));
        }

        let type_path = value.reflect_type_info().type_path();
        match self.config.cycle_policy() {
            CyclePolicy::Fail => Err(MarshalError::RecursiveDependency { type_path }),
            CyclePolicy::Null => {
                warn!("cycle through `{type_path}` written as null");
                Ok(None)
            }
        }
    }
}
