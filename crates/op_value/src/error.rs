use thiserror::Error;

// -----------------------------------------------------------------------------
// ValueError

/// Errors raised by the document model itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// A value of a kind the document model does not admit was inserted.
    #[error("type `{type_name}` is not admitted by the document model")]
    TypeNotAdmitted { type_name: &'static str },
}
