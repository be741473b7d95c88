use crate::Value;

/// The boundary between the document model and an external format.
///
/// A codec only ever sees [`Value`]s, never native objects.
///
/// With the `serde` feature, [`Value`] implements `Serialize` and
/// `Deserialize`, so a codec over a serde format is a thin adapter:
///
/// ```
/// use op_value::{Codec, Value};
///
/// struct Json;
///
/// impl Codec for Json {
///     type Output = String;
///     type Error = serde_json::Error;
///
///     fn encode(&self, value: &Value) -> Result<String, Self::Error> {
///         serde_json::to_string(value)
///     }
///
///     fn decode(&self, input: &String) -> Result<Value, Self::Error> {
///         serde_json::from_str(input)
///     }
/// }
///
/// let text = Json.encode(&Value::from(12_i32)).unwrap();
/// assert_eq!(text, "12");
/// assert_eq!(Json.decode(&text).unwrap(), Value::Int(12));
/// ```
pub trait Codec {
    /// The encoded form, e.g. `String` or `Vec<u8>`.
    type Output;

    /// The codec's own failure type.
    type Error;

    /// Renders a document into the external format.
    fn encode(&self, value: &Value) -> Result<Self::Output, Self::Error>;

    /// Parses the external format back into a document.
    fn decode(&self, input: &Self::Output) -> Result<Value, Self::Error>;
}
