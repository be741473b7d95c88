use alloc::string::String;
use core::any::Any;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};

use indexmap::{Equivalent, IndexMap};
use op_utils::hash::FixedHashState;

use crate::{Value, ValueError, admit};

// -----------------------------------------------------------------------------
// ObjectValue

/// A mapping from document values to document values.
///
/// Entries keep their insertion order, which makes rendered output
/// deterministic. Equality and hashing ignore that order.
///
/// # Examples
///
/// ```
/// use op_value::{ObjectValue, Value};
///
/// let mut a = ObjectValue::new();
/// a.put("x", 1_i32);
/// a.put("y", 2_i32);
///
/// let mut b = ObjectValue::new();
/// b.put("y", 2_i32);
/// b.put("x", 1_i32);
///
/// assert_eq!(a, b);
/// assert_eq!(a.keys().next(), Some(&Value::from("x")));
/// ```
#[derive(Clone, Default)]
pub struct ObjectValue {
    entries: IndexMap<Value, Value, FixedHashState>,
}

impl ObjectValue {
    /// Creates an empty object.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(FixedHashState),
        }
    }

    /// Creates an empty object with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the object has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry, returning the previous value for that key.
    ///
    /// A replaced entry keeps its original position.
    #[inline]
    pub fn put(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Inserts an entry of any key and value types, checking that both
    /// kinds are admitted.
    ///
    /// Nothing is inserted on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use op_value::{ObjectValue, ValueError};
    ///
    /// let mut object = ObjectValue::new();
    /// assert!(object.try_put("a", 1_u64).is_ok());
    /// assert_eq!(
    ///     object.try_put("b", [0_u8; 2]),
    ///     Err(ValueError::TypeNotAdmitted { type_name: "[u8; 2]" }),
    /// );
    /// assert_eq!(object.len(), 1);
    /// ```
    pub fn try_put<K: Any, V: Any>(&mut self, key: K, value: V) -> Result<Option<Value>, ValueError> {
        let key = admit(key)?;
        let value = admit(value)?;
        Ok(self.entries.insert(key, value))
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value stored under the text key `key`.
    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&TextKey(key))
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if the object has an entry for `key`.
    #[inline]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the entry for `key`, keeping the order of the others.
    #[inline]
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Iterates over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.keys()
    }

    /// Iterates over the values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.values()
    }
}

// Looks up a `Value::Text` key without allocating a `String`.
struct TextKey<'a>(&'a str);

impl Hash for TextKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(&Value::Text(String::new())).hash(state);
        self.0.hash(state);
    }
}

impl Equivalent<Value> for TextKey<'_> {
    #[inline]
    fn equivalent(&self, key: &Value) -> bool {
        key.as_str() == Some(self.0)
    }
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl Eq for ObjectValue {}

impl Hash for ObjectValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .iter()
            .map(|entry| FixedHashState.hash_one(entry))
            .fold(0_u64, u64::wrapping_add);
        self.len().hash(state);
        combined.hash(state);
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for ObjectValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.put(key, value);
        }
        object
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use core::hash::BuildHasher;

    use op_utils::hash::FixedHashState;

    use super::ObjectValue;
    use crate::{ArrayValue, Value, ValueError};

    #[test]
    fn admitted_kinds_are_accepted() {
        let mut object = ObjectValue::new();
        assert!(object.try_put(Value::Null, ()).is_ok());
        assert!(object.try_put(true, 1_i8).is_ok());
        assert!(object.try_put(2_u32, 3.5_f32).is_ok());
        assert!(object.try_put(String::from("t"), vec![1_u8]).is_ok());
        assert!(object.try_put("v", Value::Int(1)).is_ok());
        assert!(object.try_put("o", ObjectValue::new()).is_ok());
        assert!(object.try_put("a", ArrayValue::new()).is_ok());
        assert_eq!(object.len(), 7);
    }

    #[test]
    fn rejected_kinds_leave_object_untouched() {
        let mut object = ObjectValue::new();
        let err = object.try_put(vec![1_i64], 1_i32).unwrap_err();
        assert!(matches!(err, ValueError::TypeNotAdmitted { .. }));

        let err = object.try_put("k", Some(1_i32)).unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeNotAdmitted {
                type_name: "core::option::Option<i32>"
            }
        );
        assert!(object.is_empty());
    }

    #[test]
    fn non_text_keys() {
        let mut object = ObjectValue::new();
        object.put(1_i32, "one");
        object.put(Value::Null, "nothing");

        assert_eq!(object.get(&Value::Int(1)), Some(&Value::from("one")));
        assert_eq!(object.get_str("1"), None);
        assert_eq!(object.remove(&Value::Null), Some(Value::from("nothing")));
    }

    #[test]
    fn hash_ignores_order() {
        let a: ObjectValue = [("x", 1_i32), ("y", 2)].into_iter().collect();
        let b: ObjectValue = [("y", 2_i32), ("x", 1)].into_iter().collect();
        assert_eq!(FixedHashState.hash_one(&a), FixedHashState.hash_one(&b));
    }
}
