use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::{ArrayValue, ObjectValue};

// -----------------------------------------------------------------------------
// ValueKind

/// The variant of a [`Value`] without its payload.
///
/// Mostly used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Text,
    Bytes,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool => f.pad("bool"),
            Self::Int => f.pad("int"),
            Self::UInt => f.pad("uint"),
            Self::Float => f.pad("float"),
            Self::Char => f.pad("char"),
            Self::Text => f.pad("text"),
            Self::Bytes => f.pad("bytes"),
            Self::Array => f.pad("array"),
            Self::Object => f.pad("object"),
        }
    }
}

// -----------------------------------------------------------------------------
// Value

/// A node of the document model.
///
/// Signed integers are stored as [`Value::Int`], unsigned ones as
/// [`Value::UInt`]. Floats compare and hash by bit pattern, so `NaN == NaN`
/// and a `Value` can be used as an [`ObjectValue`] key.
///
/// `clone` is deep: every node is owned by exactly one parent.
///
/// # Examples
///
/// ```
/// use op_value::{Value, ValueKind};
///
/// let value = Value::from(-3_i8);
/// assert_eq!(value, Value::Int(-3));
/// assert_eq!(value.kind(), ValueKind::Int);
/// assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    Bytes(Vec<u8>),
    Array(ArrayValue),
    Object(ObjectValue),
}

macro_rules! impl_as_method {
    ($name:ident : $variant:ident => $ty:ty) => {
        /// Returns the payload if the value is of this variant.
        #[inline]
        pub const fn $name(&self) -> Option<&$ty> {
            match self {
                Self::$variant(value) => Some(value),
                _ => None,
            }
        }
    };
}

impl Value {
    impl_as_method!(as_bool: Bool => bool);
    impl_as_method!(as_char: Char => char);
    impl_as_method!(as_bytes: Bytes => Vec<u8>);
    impl_as_method!(as_array: Array => ArrayValue);
    impl_as_method!(as_object: Object => ObjectValue);

    /// Returns the variant of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::UInt(_) => ValueKind::UInt,
            Self::Float(_) => ValueKind::Float,
            Self::Char(_) => ValueKind::Char,
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for the two containers.
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Returns the text payload.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `u64`, if it is an integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(v) => u64::try_from(v).ok(),
            Self::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, converting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f64),
            Self::UInt(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Takes the value out, leaving [`Value::Null`] in its place.
    #[inline]
    pub fn take(&mut self) -> Value {
        core::mem::take(self)
    }
}

// -----------------------------------------------------------------------------
// Equality & Hash

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::UInt(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Char(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::Array(v) => v.hash(state),
            Self::Object(v) => v.hash(state),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversion

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64);
impl_from!(UInt: u8, u16, u32, u64);
impl_from!(Float: f32, f64);
impl_from!(Char: char);
impl_from!(Text: String, &str);
impl_from!(Bytes: Vec<u8>, &[u8]);
impl_from!(Array: ArrayValue);
impl_from!(Object: ObjectValue);

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<isize> for Value {
    #[inline]
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

// -----------------------------------------------------------------------------
// Display

/// A compact, JSON-like rendering for logs and test output.
///
/// This is not a codec: bytes, chars and non-text keys are shown loosely.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Char(v) => write!(f, "'{v}'"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "b{v:?}"),
            Self::Array(v) => fmt::Display::fmt(v, f),
            Self::Object(v) => fmt::Display::fmt(v, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use crate::{ArrayValue, ObjectValue, Value};

    #[test]
    fn numeric_accessors() {
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::Int(40).as_u64(), Some(40));
        assert_eq!(Value::UInt(2).as_f64(), Some(2.0));
        assert_eq!(Value::Text("1".into()).as_i64(), None);
    }

    #[test]
    fn equality_is_variant_strict() {
        assert_ne!(Value::Int(1), Value::UInt(1));
        assert_ne!(Value::Null, Value::Bool(false));
        assert_eq!(Value::from(vec![1_u8, 2]), Value::Bytes(vec![1, 2]));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn clone_is_deep() {
        let mut inner = ArrayValue::new();
        inner.push(1_i32);
        let mut object = ObjectValue::new();
        object.put("inner", inner);

        let original = Value::from(object);
        let mut copy = original.clone();
        if let Value::Object(object) = &mut copy {
            object.put("inner", Value::Null);
        }

        assert_ne!(original, copy);
        let inner = original.as_object().and_then(|o| o.get_str("inner"));
        assert!(matches!(inner, Some(Value::Array(a)) if a.len() == 1));
    }

    #[test]
    fn display() {
        let mut tags = ArrayValue::new();
        tags.push("x");
        let mut object = ObjectValue::new();
        object.put("name", "a");
        object.put("tags", tags);
        object.put("n", 1.5_f64);

        assert_eq!(
            Value::from(object).to_string(),
            r#"{"name": "a", "tags": ["x"], "n": 1.5}"#
        );
    }
}
