use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use op_value::ValueError;
use thiserror::Error;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// MarshalError

/// A fault raised while capturing, serializing or deserializing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarshalError {
    #[error("type `{type_path}` cannot be written to a document")]
    TypeNotAdmitted { type_path: &'static str },

    #[error("conversion hook `{transformer}` cannot be created: {reason}")]
    HookInstantiation {
        transformer: &'static str,
        reason: String,
    },

    #[error("recursive dependency on `{type_path}`")]
    RecursiveDependency { type_path: &'static str },

    #[error("document does not match `{type_path}`: {reason}")]
    StructuralMismatch {
        type_path: &'static str,
        reason: String,
    },

    #[error("cannot access field `{field}` of `{type_path}`: {reason}")]
    FieldAccess {
        type_path: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("cannot instantiate `{type_path}`: {reason}")]
    Instantiation {
        type_path: &'static str,
        reason: String,
    },

    #[error("unknown type `{type_path}`")]
    UnknownType { type_path: String },

    #[error("conversion hook `{transformer}` failed: {reason}")]
    Transform {
        transformer: &'static str,
        reason: String,
    },
}

impl From<ValueError> for MarshalError {
    fn from(error: ValueError) -> Self {
        match error {
            ValueError::TypeNotAdmitted { type_name } => Self::TypeNotAdmitted {
                type_path: type_name,
            },
            other => Self::StructuralMismatch {
                type_path: "op_value::Value",
                reason: other.to_string(),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// TypeTrail

/// The types being marshalled when a fault occurred, outermost first.
///
/// Only recorded with the `debug` feature in debug builds, empty otherwise.
#[derive(Default, Clone)]
pub struct TypeTrail {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: Vec<&'static TypeInfo>,
}

impl TypeTrail {
    /// Create a new empty [`TypeTrail`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            #[cfg(all(debug_assertions, feature = "debug"))]
            stack: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, _info: &'static TypeInfo) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.push(_info);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.pop();
    }

    #[inline]
    pub(crate) fn truncate(&mut self, _len: usize) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.truncate(_len);
    }

    /// Returns the number of recorded types.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the recorded types, outermost first.
    #[inline]
    pub fn as_slice(&self) -> &[&'static TypeInfo] {
        #[cfg(all(debug_assertions, feature = "debug"))]
        return &self.stack;
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        return &[];
    }

    /// Returns the recorded type paths, outermost first.
    pub fn paths(&self) -> Vec<&'static str> {
        self.as_slice().iter().map(|info| info.type_path()).collect()
    }
}

impl fmt::Debug for TypeTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.as_slice().iter();

        if let Some(first) = iter.next() {
            write!(f, "`{}`", first.type_path())?;
        }

        for info in iter {
            write!(f, " -> `{}`", info.type_path())?;
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// SerializeError

/// The error returned by [`Opacker::serialize`](crate::Opacker::serialize).
#[derive(Debug, Error)]
#[error("serialization failed: {error}")]
pub struct SerializeError {
    pub error: MarshalError,
    pub trail: TypeTrail,
}

/// The error returned by [`Opacker::deserialize`](crate::Opacker::deserialize).
#[derive(Debug, Error)]
#[error("deserialization failed: {error}")]
pub struct DeserializeError {
    pub error: MarshalError,
    pub trail: TypeTrail,
}
