//! Hooks shipped with the crate.
//!
//! [`ListTransformer`], [`MapTransformer`], [`DurationTransformer`] and
//! [`PathTransformer`] are registered by [`TypeCaptureCache::new`].
//! [`Base64Transformer`] is opt-in, usually per field:
//!
//! ```
//! use op_reflect::{Opacker, derive::Reflect};
//! use op_reflect::transform::Base64Transformer;
//! use op_value::Value;
//!
//! #[derive(Reflect, Debug, PartialEq)]
//! struct Blob {
//!     #[reflect(transformer = Base64Transformer)]
//!     data: Vec<u8>,
//! }
//!
//! let mut opacker = Opacker::new();
//! let blob = Blob { data: vec![1, 2, 3] };
//! let value = opacker.serialize(&blob).unwrap();
//! assert_eq!(value.as_object().unwrap().get_str("data"), Some(&Value::from("AQID")));
//! assert_eq!(opacker.deserialize::<Blob>(&value).unwrap(), blob);
//! ```
//!
//! [`TypeCaptureCache::new`]: crate::TypeCaptureCache::new

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::type_name;
use core::time::Duration;
use std::path::PathBuf;

use base64::{Engine, prelude::BASE64_STANDARD};
use op_value::{ObjectValue, Value};

use crate::Reflect;
use crate::info::TypeInfo;
use crate::marshal::{MarshalError, Opacker};
use crate::transform::Transformer;

fn mismatch(goal: &'static TypeInfo, value: &Value) -> MarshalError {
    MarshalError::StructuralMismatch {
        type_path: goal.type_path(),
        reason: format!("found {}", value.kind()),
    }
}

fn failed<H>(reason: impl ToString) -> MarshalError {
    MarshalError::Transform {
        transformer: type_name::<H>(),
        reason: reason.to_string(),
    }
}

// -----------------------------------------------------------------------------
// ListTransformer

/// Admits lists, which the engine then writes as arrays, element by element.
///
/// The hook converts nothing itself. Unregistering it makes lists opaque.
///
/// With [`wrap_list_element_type`] enabled every element is written as
/// `{"type": path, "value": element}`, so that `Box<dyn Reflect>` elements
/// read back as their original type.
///
/// [`wrap_list_element_type`]: crate::OpackerBuilder::wrap_list_element_type
#[derive(Debug, Default, Clone, Copy)]
pub struct ListTransformer;

impl Transformer for ListTransformer {
    #[inline]
    fn serialize(
        &self,
        _engine: &mut Opacker,
        _declared: &'static TypeInfo,
        _value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        Ok(None)
    }

    #[inline]
    fn deserialize(
        &self,
        _engine: &mut Opacker,
        _goal: &'static TypeInfo,
        _value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// MapTransformer

/// Admits maps, which the engine then writes as objects with keys included
/// as full values.
///
/// [`wrap_map_element_type`] tags keys and values like
/// [`ListTransformer`] tags list elements.
///
/// [`wrap_map_element_type`]: crate::OpackerBuilder::wrap_map_element_type
#[derive(Debug, Default, Clone, Copy)]
pub struct MapTransformer;

impl Transformer for MapTransformer {
    #[inline]
    fn serialize(
        &self,
        _engine: &mut Opacker,
        _declared: &'static TypeInfo,
        _value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        Ok(None)
    }

    #[inline]
    fn deserialize(
        &self,
        _engine: &mut Opacker,
        _goal: &'static TypeInfo,
        _value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// Base64Transformer

/// Writes `Vec<u8>` as standard base64 text.
///
/// Reading also accepts the byte forms the engine understands natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Transformer;

impl Transformer for Base64Transformer {
    fn serialize(
        &self,
        _engine: &mut Opacker,
        _declared: &'static TypeInfo,
        value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        Ok(value
            .downcast_ref::<Vec<u8>>()
            .map(|bytes| Box::new(Value::Text(BASE64_STANDARD.encode(bytes))) as Box<dyn Reflect>))
    }

    fn deserialize(
        &self,
        _engine: &mut Opacker,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        if !goal.type_is::<Vec<u8>>() {
            return Ok(None);
        }
        let Some(text) = value.as_str() else {
            return Ok(None);
        };
        let bytes = BASE64_STANDARD.decode(text).map_err(failed::<Self>)?;
        Ok(Some(Box::new(bytes)))
    }
}

// -----------------------------------------------------------------------------
// DurationTransformer

/// Writes [`Duration`] as `{"secs": u64, "nanos": u32}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DurationTransformer;

impl Transformer for DurationTransformer {
    fn serialize(
        &self,
        _engine: &mut Opacker,
        _declared: &'static TypeInfo,
        value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        let Some(duration) = value.downcast_ref::<Duration>() else {
            return Ok(None);
        };

        let mut object = ObjectValue::with_capacity(2);
        object.put("secs", duration.as_secs());
        object.put("nanos", duration.subsec_nanos());
        Ok(Some(Box::new(Value::Object(object))))
    }

    fn deserialize(
        &self,
        _engine: &mut Opacker,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        if !goal.type_is::<Duration>() {
            return Ok(None);
        }
        let Value::Object(object) = value else {
            return Err(mismatch(goal, value));
        };

        let secs = object.get_str("secs").and_then(Value::as_u64);
        let nanos = object
            .get_str("nanos")
            .and_then(Value::as_u64)
            .and_then(|nanos| u32::try_from(nanos).ok())
            .filter(|nanos| *nanos < 1_000_000_000);
        match (secs, nanos) {
            (Some(secs), Some(nanos)) => Ok(Some(Box::new(Duration::new(secs, nanos)))),
            _ => Err(failed::<Self>("expected `secs` and `nanos` in range")),
        }
    }
}

// -----------------------------------------------------------------------------
// PathTransformer

/// Writes [`PathBuf`] as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathTransformer;

impl Transformer for PathTransformer {
    fn serialize(
        &self,
        _engine: &mut Opacker,
        _declared: &'static TypeInfo,
        value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        let Some(path) = value.downcast_ref::<PathBuf>() else {
            return Ok(None);
        };
        match path.to_str() {
            Some(text) => Ok(Some(Box::new(Value::from(text)))),
            None => Err(failed::<Self>("the path is not valid UTF-8")),
        }
    }

    fn deserialize(
        &self,
        _engine: &mut Opacker,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
        if !goal.type_is::<PathBuf>() {
            return Ok(None);
        }
        match value.as_str() {
            Some(text) => Ok(Some(Box::new(PathBuf::from(text)))),
            None => Err(mismatch(goal, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeMap, VecDeque};
    use alloc::string::String;
    use core::time::Duration;
    use std::path::PathBuf;

    use op_value::{ObjectValue, Value};

    use crate::{Opacker, Reflect};

    #[test]
    fn durations_and_paths_round_trip() {
        let mut opacker = Opacker::new();

        let duration = Duration::new(3, 500);
        let value = opacker.serialize(&duration).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_str("secs"), Some(&Value::UInt(3)));
        assert_eq!(object.get_str("nanos"), Some(&Value::UInt(500)));
        assert_eq!(opacker.deserialize::<Duration>(&value).unwrap(), duration);

        let path = PathBuf::from("/tmp/a.txt");
        let value = opacker.serialize(&path).unwrap();
        assert_eq!(value, Value::from("/tmp/a.txt"));
        assert_eq!(opacker.deserialize::<PathBuf>(&value).unwrap(), path);
    }

    #[test]
    fn out_of_range_nanos_are_rejected() {
        let mut opacker = Opacker::new();
        let object: ObjectValue = [("secs", 1_u64), ("nanos", 2_000_000_000)].into_iter().collect();
        assert!(opacker.deserialize::<Duration>(&Value::Object(object)).is_err());
    }

    #[test]
    fn maps_use_full_values_as_keys() {
        let mut opacker = Opacker::new();
        let map = BTreeMap::from([(1_u32, String::from("one")), (2, String::from("two"))]);

        let value = opacker.serialize(&map).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get(&Value::UInt(2)), Some(&Value::from("two")));

        let back: BTreeMap<u32, String> = opacker.deserialize(&value).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn wrapped_elements_keep_their_runtime_type() {
        let mut opacker = Opacker::builder().wrap_list_element_type(true).build();
        let shapes: VecDeque<Box<dyn Reflect>> =
            VecDeque::from([Box::new(1.5_f64) as Box<dyn Reflect>, Box::new(String::from("a"))]);

        let value = opacker.serialize(&shapes).unwrap();
        let first = value.as_array().unwrap().get(0).unwrap().into_owned();
        assert_eq!(
            first.as_object().unwrap().get_str("type"),
            Some(&Value::from("f64")),
        );

        let back: VecDeque<Box<dyn Reflect>> = opacker.deserialize(&value).unwrap();
        assert_eq!((*back[0]).downcast_ref::<f64>(), Some(&1.5));
        assert_eq!((*back[1]).downcast_ref::<String>().map(String::as_str), Some("a"));
    }
}
