use alloc::boxed::Box;
use alloc::string::String;

use op_value::Value;

use crate::Reflect;
use crate::info::TypeInfo;
use crate::marshal::{MarshalError, Opacker};

// -----------------------------------------------------------------------------
// Transformer

/// A bidirectional conversion applied while marshalling.
///
/// Both directions return `Ok(None)` to let the value pass unchanged.
///
/// - [`serialize`] may return any reflected value, the engine continues with
///   the new value's own type. Returning a [`Value`] writes it as is.
/// - [`deserialize`] may return a finished object of the goal type, which
///   ends the pipeline, or a [`Value`] replacing the document value for the
///   remaining hooks and the structural walk.
///
/// Hooks may re-enter the engine through [`Opacker::prepare_serialize`] and
/// [`Opacker::prepare_deserialize`].
///
/// # Examples
///
/// ```
/// use op_reflect::{Opacker, Reflect, derive::Reflect, info::TypeInfo};
/// use op_reflect::marshal::MarshalError;
/// use op_reflect::transform::Transformer;
/// use op_value::Value;
///
/// /// Writes a celsius reading as text, e.g. `"21.5C"`.
/// #[derive(Default)]
/// struct CelsiusText;
///
/// impl Transformer for CelsiusText {
///     fn serialize(
///         &self,
///         _: &mut Opacker,
///         _: &'static TypeInfo,
///         value: &dyn Reflect,
///     ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
///         let celsius = value.downcast_ref::<Celsius>().map(|c| c.degrees);
///         Ok(celsius.map(|c| Value::from(format!("{c}C")).into_boxed_reflect()))
///     }
///
///     fn deserialize(
///         &self,
///         _: &mut Opacker,
///         _: &'static TypeInfo,
///         value: &Value,
///     ) -> Result<Option<Box<dyn Reflect>>, MarshalError> {
///         let parsed = value
///             .as_str()
///             .and_then(|text| text.strip_suffix('C'))
///             .and_then(|text| text.parse::<f64>().ok());
///         Ok(parsed.map(|degrees| Celsius { degrees }.into_boxed_reflect()))
///     }
/// }
///
/// #[derive(Reflect, Debug, PartialEq)]
/// #[reflect(transformer = CelsiusText)]
/// struct Celsius {
///     degrees: f64,
/// }
///
/// let mut opacker = Opacker::builder().build();
/// let value = opacker.serialize(&Celsius { degrees: 21.5 }).unwrap();
/// assert_eq!(value, Value::from("21.5C"));
///
/// let back: Celsius = opacker.deserialize(&value).unwrap();
/// assert_eq!(back, Celsius { degrees: 21.5 });
/// ```
///
/// [`serialize`]: Transformer::serialize
/// [`deserialize`]: Transformer::deserialize
pub trait Transformer: Send + Sync + 'static {
    /// Converts `value`, declared as `declared`, before it is written.
    fn serialize(
        &self,
        engine: &mut Opacker,
        declared: &'static TypeInfo,
        value: &dyn Reflect,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError>;

    /// Converts the document value `value` read for the type `goal`.
    fn deserialize(
        &self,
        engine: &mut Opacker,
        goal: &'static TypeInfo,
        value: &Value,
    ) -> Result<Option<Box<dyn Reflect>>, MarshalError>;
}

// -----------------------------------------------------------------------------
// CreateTransformer

/// Creates the hook instance shared by one cache.
///
/// Implemented for every `Transformer + Default`. A hook that can fail to set
/// up implements it directly, the error is reported as
/// [`MarshalError::HookInstantiation`].
pub trait CreateTransformer: Sized {
    /// Creates the instance, or explains why it cannot be created.
    fn create() -> Result<Self, String>;
}

impl<T: Transformer + Default> CreateTransformer for T {
    #[inline]
    fn create() -> Result<Self, String> {
        Ok(T::default())
    }
}
