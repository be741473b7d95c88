use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, type_name};

use crate::{ArrayValue, ObjectValue, Value, ValueError};

/// Converts a value of any type into a [`Value`], if its kind is admitted.
///
/// Admitted kinds are `()`, `bool`, every integer primitive, `f32`, `f64`,
/// `char`, `String`, `&'static str`, `Vec<u8>` (as bytes), [`Value`],
/// [`ObjectValue`] and [`ArrayValue`].
///
/// # Examples
///
/// ```
/// use op_value::{admit, Value};
///
/// assert_eq!(admit(7_u16), Ok(Value::UInt(7)));
/// assert_eq!(admit(()), Ok(Value::Null));
/// assert!(admit(vec![1_i32]).is_err());
/// ```
pub fn admit<T: Any>(value: T) -> Result<Value, ValueError> {
    admit_boxed(Box::new(value), type_name::<T>())
}

macro_rules! try_admit {
    ($boxed:ident; $($ty:ty),* $(,)?) => {
        $(
            let $boxed = match $boxed.downcast::<$ty>() {
                Ok(value) => return Ok(Value::from(*value)),
                Err(other) => other,
            };
        )*
    };
}

fn admit_boxed(boxed: Box<dyn Any>, type_name: &'static str) -> Result<Value, ValueError> {
    try_admit!(boxed;
        Value, ObjectValue, ArrayValue, String, &'static str, Vec<u8>,
        (), bool, char, f32, f64,
        i8, i16, i32, i64, isize,
        u8, u16, u32, u64, usize,
    );
    drop(boxed);
    Err(ValueError::TypeNotAdmitted { type_name })
}
