use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::{Value, ValueError, admit};

// -----------------------------------------------------------------------------
// NativeKind

/// The element kind of a natively stored [`ArrayValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
}

// -----------------------------------------------------------------------------
// Storage

#[derive(Clone)]
enum Storage {
    Boxed(Vec<Value>),
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Char(Vec<char>),
}

// Expands `$body` once per storage variant, binding the inner vector to `$v`.
macro_rules! each_storage {
    ($storage:expr, $v:ident => $body:expr) => {
        match $storage {
            Storage::Boxed($v) => $body,
            Storage::Bool($v) => $body,
            Storage::I8($v) => $body,
            Storage::I16($v) => $body,
            Storage::I32($v) => $body,
            Storage::I64($v) => $body,
            Storage::U8($v) => $body,
            Storage::U16($v) => $body,
            Storage::U32($v) => $body,
            Storage::U64($v) => $body,
            Storage::F32($v) => $body,
            Storage::F64($v) => $body,
            Storage::Char($v) => $body,
        }
    };
}

// Expands `$body` once per native variant, `$other` for boxed storage.
macro_rules! each_native {
    ($storage:expr, $v:ident => $body:expr, $other:pat => $fallback:expr) => {
        match $storage {
            Storage::Bool($v) => $body,
            Storage::I8($v) => $body,
            Storage::I16($v) => $body,
            Storage::I32($v) => $body,
            Storage::I64($v) => $body,
            Storage::U8($v) => $body,
            Storage::U16($v) => $body,
            Storage::U32($v) => $body,
            Storage::U64($v) => $body,
            Storage::F32($v) => $body,
            Storage::F64($v) => $body,
            Storage::Char($v) => $body,
            $other => $fallback,
        }
    };
}

// -----------------------------------------------------------------------------
// ArrayValue

/// An ordered sequence of document values.
///
/// Flat arrays of scalars can be stored natively (`Vec<i32>`, `Vec<f64>`, ...)
/// instead of one boxed [`Value`] per element. The storage is invisible to
/// equality: a native `[1_i32, 2]` equals a boxed `[Int(1), Int(2)]`.
/// Pushing a value of another kind into a native array converts it to
/// boxed storage first.
///
/// # Examples
///
/// ```
/// use op_value::{ArrayValue, NativeKind, Value};
///
/// let mut native = ArrayValue::from(vec![1_i32, 2]);
/// assert_eq!(native.native_kind(), Some(NativeKind::I32));
///
/// let mut boxed = ArrayValue::with_capacity(2);
/// boxed.push(Value::Int(1));
/// boxed.push(Value::Int(2));
/// assert_eq!(native, boxed);
///
/// native.push("three");
/// assert_eq!(native.native_kind(), None);
/// assert_eq!(native.len(), 3);
/// ```
#[derive(Clone)]
pub struct ArrayValue {
    storage: Storage,
}

impl ArrayValue {
    /// Creates an empty array with boxed storage.
    #[inline]
    pub const fn new() -> Self {
        Self {
            storage: Storage::Boxed(Vec::new()),
        }
    }

    /// Creates an empty array with room for `capacity` elements.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Boxed(Vec::with_capacity(capacity)),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        each_storage!(&self.storage, v => v.len())
    }

    /// Returns `true` if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element kind if the array is stored natively.
    pub fn native_kind(&self) -> Option<NativeKind> {
        Some(match &self.storage {
            Storage::Boxed(_) => return None,
            Storage::Bool(_) => NativeKind::Bool,
            Storage::I8(_) => NativeKind::I8,
            Storage::I16(_) => NativeKind::I16,
            Storage::I32(_) => NativeKind::I32,
            Storage::I64(_) => NativeKind::I64,
            Storage::U8(_) => NativeKind::U8,
            Storage::U16(_) => NativeKind::U16,
            Storage::U32(_) => NativeKind::U32,
            Storage::U64(_) => NativeKind::U64,
            Storage::F32(_) => NativeKind::F32,
            Storage::F64(_) => NativeKind::F64,
            Storage::Char(_) => NativeKind::Char,
        })
    }

    /// Returns the element at `index`.
    ///
    /// Boxed elements are borrowed, native ones are converted on the fly.
    pub fn get(&self, index: usize) -> Option<Cow<'_, Value>> {
        each_native!(
            &self.storage,
            v => v.get(index).map(|x| Cow::Owned(Value::from(*x))),
            Storage::Boxed(v) => v.get(index).map(Cow::Borrowed)
        )
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Native storage is converted to boxed storage first.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.make_boxed();
        match &mut self.storage {
            Storage::Boxed(values) => values.get_mut(index),
            _ => None,
        }
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        let value = value.into();
        if let Err(value) = self.push_native(value) {
            self.make_boxed();
            if let Storage::Boxed(values) = &mut self.storage {
                values.push(value);
            }
        }
    }

    /// Appends a value of any type, checking that its kind is admitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use op_value::{ArrayValue, ValueError};
    ///
    /// let mut array = ArrayValue::new();
    /// assert!(array.try_push(5_u8).is_ok());
    /// assert!(array.try_push(String::from("x")).is_ok());
    /// assert!(matches!(
    ///     array.try_push(vec![1.0_f32]),
    ///     Err(ValueError::TypeNotAdmitted { .. })
    /// ));
    /// assert_eq!(array.len(), 2);
    /// ```
    pub fn try_push<T: Any>(&mut self, value: T) -> Result<(), ValueError> {
        self.push(admit(value)?);
        Ok(())
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// Returns `None` and leaves the array untouched if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.get_mut(index)?;
        Some(core::mem::replace(slot, value.into()))
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<Value> {
        each_native!(
            &mut self.storage,
            v => v.pop().map(Value::from),
            Storage::Boxed(v) => v.pop()
        )
    }

    /// Iterates over the elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = Cow<'_, Value>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Consumes the array, returning every element as a boxed [`Value`].
    pub fn into_values(self) -> Vec<Value> {
        each_native!(
            self.storage,
            v => v.into_iter().map(Value::from).collect(),
            Storage::Boxed(v) => v
        )
    }

    /// Copies a slice of native scalars into a natively stored array.
    ///
    /// Returns `None` if `T` is not one of the [`NativeKind`]s.
    ///
    /// # Examples
    ///
    /// ```
    /// use op_value::{ArrayValue, NativeKind};
    ///
    /// let array = ArrayValue::from_native_slice(&[1.0_f64, 2.5]).unwrap();
    /// assert_eq!(array.native_kind(), Some(NativeKind::F64));
    /// assert!(ArrayValue::from_native_slice(&[String::new()]).is_none());
    /// ```
    pub fn from_native_slice<T: Any>(items: &[T]) -> Option<Self> {
        macro_rules! try_native {
            ($($ty:ty => $variant:ident),*) => {
                $(
                    if TypeId::of::<T>() == TypeId::of::<$ty>() {
                        let items: Vec<$ty> = items
                            .iter()
                            .filter_map(|x| (x as &dyn Any).downcast_ref::<$ty>().copied())
                            .collect();
                        return Some(Self { storage: Storage::$variant(items) });
                    }
                )*
            };
        }

        try_native!(
            bool => Bool, char => Char,
            i8 => I8, i16 => I16, i32 => I32, i64 => I64,
            u8 => U8, u16 => U16, u32 => U32, u64 => U64,
            f32 => F32, f64 => F64
        );
        None
    }

    /// Copies the elements out as a `Vec<T>`, if the array is stored natively
    /// with exactly `T` as element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use op_value::ArrayValue;
    ///
    /// let array = ArrayValue::from(vec![3_u16, 4]);
    /// assert_eq!(array.to_native_vec::<u16>(), Some(vec![3, 4]));
    /// assert_eq!(array.to_native_vec::<u32>(), None);
    /// ```
    pub fn to_native_vec<T: Any>(&self) -> Option<Vec<T>> {
        let boxed: Box<dyn Any> = each_native!(
            &self.storage,
            v => {
                if TypeId::of::<T>() != element_type_id(v) {
                    return None;
                }
                Box::new(v.clone())
            },
            Storage::Boxed(_) => return None
        );
        boxed.downcast::<Vec<T>>().ok().map(|items| *items)
    }

    fn make_boxed(&mut self) {
        if !matches!(self.storage, Storage::Boxed(_)) {
            let old = core::mem::replace(&mut self.storage, Storage::Boxed(Vec::new()));
            self.storage = Storage::Boxed(Self { storage: old }.into_values());
        }
    }

    fn push_native(&mut self, value: Value) -> Result<(), Value> {
        match (&mut self.storage, value) {
            (Storage::Bool(v), Value::Bool(x)) => v.push(x),
            (Storage::Char(v), Value::Char(x)) => v.push(x),
            (Storage::I64(v), Value::Int(x)) => v.push(x),
            (Storage::U64(v), Value::UInt(x)) => v.push(x),
            (Storage::F64(v), Value::Float(x)) => v.push(x),
            (Storage::I8(v), Value::Int(x)) => push_narrowed(v, x).map_err(Value::Int)?,
            (Storage::I16(v), Value::Int(x)) => push_narrowed(v, x).map_err(Value::Int)?,
            (Storage::I32(v), Value::Int(x)) => push_narrowed(v, x).map_err(Value::Int)?,
            (Storage::U8(v), Value::UInt(x)) => push_narrowed(v, x).map_err(Value::UInt)?,
            (Storage::U16(v), Value::UInt(x)) => push_narrowed(v, x).map_err(Value::UInt)?,
            (Storage::U32(v), Value::UInt(x)) => push_narrowed(v, x).map_err(Value::UInt)?,
            (Storage::F32(v), Value::Float(x)) if f64::from(x as f32).to_bits() == x.to_bits() => {
                v.push(x as f32);
            }
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

/// Pushes `x` if it converts to `T` without loss, hands it back otherwise.
fn push_narrowed<S: Copy, T: TryFrom<S>>(items: &mut Vec<T>, x: S) -> Result<(), S> {
    let narrowed = T::try_from(x).map_err(|_| x)?;
    items.push(narrowed);
    Ok(())
}

fn element_type_id<T: Any>(_: &Vec<T>) -> TypeId {
    TypeId::of::<T>()
}

impl Default for ArrayValue {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Conversion

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<Vec<$ty>> for ArrayValue {
                #[inline]
                fn from(items: Vec<$ty>) -> Self {
                    Self { storage: Storage::$variant(items) }
                }
            }
        )*
    };
}

impl_from_native!(
    bool => Bool, char => Char,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64
);

impl From<Vec<Value>> for ArrayValue {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self {
            storage: Storage::Boxed(items),
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for ArrayValue {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            storage: Storage::Boxed(iter.into_iter().map(Into::into).collect()),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for ArrayValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for ArrayValue {}

impl Hash for ArrayValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(&*item, f)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{ArrayValue, NativeKind};
    use crate::Value;

    #[test]
    fn native_push_keeps_storage() {
        let mut array = ArrayValue::from(vec![1_i8]);
        array.push(2_i8);
        assert_eq!(array.native_kind(), Some(NativeKind::I8));

        array.push(300_i32);
        assert_eq!(array.native_kind(), None);
        assert_eq!(array.get(2).as_deref(), Some(&Value::Int(300)));
    }

    #[test]
    fn narrow_storage_takes_values_in_range() {
        let mut array = ArrayValue::from(vec![0_u8]);
        array.push(255_u64);
        assert_eq!(array.native_kind(), Some(NativeKind::U8));
        assert_eq!(array.get(1).as_deref(), Some(&Value::UInt(255)));

        array.push(256_u64);
        assert_eq!(array.native_kind(), None);
        assert_eq!(array.get(2).as_deref(), Some(&Value::UInt(256)));
        assert_eq!(array.get(1).as_deref(), Some(&Value::UInt(255)));

        let mut signed = ArrayValue::from(vec![0_i16]);
        signed.push(-32_768_i64);
        assert_eq!(signed.native_kind(), Some(NativeKind::I16));
        signed.push(-32_769_i64);
        assert_eq!(signed.native_kind(), None);
    }

    #[test]
    fn set_and_pop() {
        let mut array = ArrayValue::from(vec![true, false]);
        assert_eq!(array.set(0, "x"), Some(Value::Bool(true)));
        assert_eq!(array.set(9, "y"), None);
        assert_eq!(array.pop(), Some(Value::Bool(false)));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn equality_ignores_storage() {
        let native = ArrayValue::from(vec![1.5_f32]);
        let boxed: ArrayValue = [Value::Float(1.5)].into_iter().collect();
        assert_eq!(native, boxed);

        let other: ArrayValue = [Value::Float(2.5)].into_iter().collect();
        assert_ne!(native, other);
    }

    #[test]
    fn order_matters() {
        let a: ArrayValue = ["x", "y"].into_iter().collect();
        let b: ArrayValue = ["y", "x"].into_iter().collect();
        assert_ne!(a, b);
    }
}
