use op_value::{ObjectValue, Value};

use crate::Reflect;
use crate::info::TypeInfo;
use crate::marshal::{MarshalError, Opacker};
use crate::ops::ReflectRef;

const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";

/// Returns the value behind any number of `Box<dyn Reflect>`.
fn concrete(mut value: &dyn Reflect) -> &dyn Reflect {
    while let ReflectRef::Dynamic(inner) = value.reflect_ref() {
        value = inner;
    }
    value
}

/// Writes `value` as `{"type": path, "value": value}`, with the runtime type
/// of `source`.
///
/// The type is registered so that [`untag`] finds it again.
pub(crate) fn tag(engine: &Opacker, source: &dyn Reflect, value: Value) -> Value {
    let info = concrete(source).reflect_type_info();
    let registry = engine.registry();
    if !registry.read().contains(info.type_id()) {
        registry.write().register_info(info);
    }

    let mut object = ObjectValue::with_capacity(2);
    object.put(TYPE_KEY, info.type_path());
    object.put(VALUE_KEY, value);
    Value::Object(object)
}

/// Splits a value written by [`tag`], `None` if it has another shape.
pub(crate) fn untag<'v>(
    engine: &Opacker,
    value: &'v Value,
) -> Result<Option<(&'static TypeInfo, &'v Value)>, MarshalError> {
    let Some(object) = value.as_object().filter(|object| object.len() == 2) else {
        return Ok(None);
    };
    let (Some(path), Some(inner)) = (
        object.get_str(TYPE_KEY).and_then(Value::as_str),
        object.get_str(VALUE_KEY),
    ) else {
        return Ok(None);
    };

    match engine.registry().read().get_with_type_path(path) {
        Some(info) => Ok(Some((info, inner))),
        None => Err(MarshalError::UnknownType {
            type_path: path.into(),
        }),
    }
}
