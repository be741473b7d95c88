use op_value::Value;

use crate::Reflect;

/// A type converted to and from a [`Value`] without further structure.
///
/// Numbers convert between each other when the value fits:
///
/// ```
/// use op_reflect::ops::Leaf;
/// use op_value::Value;
///
/// assert_eq!(u8::from_value(&Value::Int(7)), Some(7));
/// assert_eq!(u8::from_value(&Value::Int(-1)), None);
/// assert_eq!(f32::from_value(&Value::UInt(2)), Some(2.0));
/// assert_eq!(i32::from_value(&Value::Float(3.0)), Some(3));
/// assert_eq!(i32::from_value(&Value::Float(3.5)), None);
/// assert_eq!(char::from_value(&Value::from("x")), Some('x'));
/// ```
pub trait Leaf: Reflect {
    /// Converts `self` to a document value.
    fn to_value(&self) -> Value;

    /// Converts a document value to `Self`, `None` if it does not fit.
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}
