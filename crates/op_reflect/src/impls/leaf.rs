use alloc::string::String;

use op_value::{ArrayValue, ObjectValue, Value};

use crate::construct::Instantiate;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{LeafInfo, TypeInfo, Typed};
use crate::ops::Leaf;
use crate::reflection::impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// Reflect & Typed

macro_rules! impl_leaf_reflect {
    ($($ty:ty),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Leaf(LeafInfo::new::<$ty>()))
            }
        }

        impl crate::Reflect for $ty {
            impl_reflect_cast_fn!(Leaf);
        }
    )*};
}

impl_leaf_reflect!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    f32,
    f64,
    String,
    Value,
    ObjectValue,
    ArrayValue,
);

// -----------------------------------------------------------------------------
// Numbers

/// Converts an integral float, `None` if it has a fraction.
#[inline]
fn integral(value: f64) -> Option<i128> {
    let truncated = value as i128;
    (truncated as f64 == value).then_some(truncated)
}

macro_rules! impl_integer_leaf {
    ($($ty:ty),*) => {$(
        impl Leaf for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    Value::Int(v) => <$ty>::try_from(v).ok(),
                    Value::UInt(v) => <$ty>::try_from(v).ok(),
                    Value::Float(v) => <$ty>::try_from(integral(v)?).ok(),
                    _ => None,
                }
            }
        }

        impl Instantiate for $ty {
            #[inline]
            fn instantiate() -> Self {
                0
            }
        }
    )*};
}

impl_integer_leaf!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Leaf for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Float(v) => Some(v),
            Value::Int(v) => Some(v as f64),
            Value::UInt(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl Leaf for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl Instantiate for f64 {
    #[inline]
    fn instantiate() -> Self {
        0.0
    }
}

impl Instantiate for f32 {
    #[inline]
    fn instantiate() -> Self {
        0.0
    }
}

// -----------------------------------------------------------------------------
// Others

impl Leaf for () {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Null
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.is_null().then_some(())
    }
}

impl Leaf for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl Leaf for char {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(*v),
            Value::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Leaf for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl Leaf for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Leaf for ObjectValue {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl Leaf for ArrayValue {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

macro_rules! impl_instantiate {
    ($($ty:ty => $blank:expr),* $(,)?) => {$(
        impl Instantiate for $ty {
            #[inline]
            fn instantiate() -> Self {
                $blank
            }
        }
    )*};
}

impl_instantiate!(
    () => (),
    bool => false,
    char => '\0',
    String => String::new(),
    Value => Value::Null,
    ObjectValue => ObjectValue::new(),
    ArrayValue => ArrayValue::new(),
);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use op_value::Value;

    use crate::ops::Leaf;

    #[test]
    fn integers_accept_every_numeric_kind_in_range() {
        assert_eq!(u16::from_value(&Value::Int(300)), Some(300));
        assert_eq!(i8::from_value(&Value::UInt(127)), Some(127));
        assert_eq!(i8::from_value(&Value::UInt(128)), None);
        assert_eq!(u64::from_value(&Value::Float(4.0)), Some(4));
        assert_eq!(u64::from_value(&Value::Float(-4.0)), None);
        assert_eq!(i64::from_value(&Value::Text(String::from("4"))), None);
    }

    #[test]
    fn sizes_map_to_the_signed_and_unsigned_kinds() {
        assert_eq!(7_usize.to_value(), Value::UInt(7));
        assert_eq!((-7_isize).to_value(), Value::Int(-7));
    }

    #[test]
    fn chars_accept_single_character_text() {
        assert_eq!(char::from_value(&Value::from("é")), Some('é'));
        assert_eq!(char::from_value(&Value::from("ab")), None);
        assert_eq!(char::from_value(&Value::from("")), None);
    }
}
