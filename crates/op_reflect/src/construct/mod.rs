//! Building target objects for deserialization.
//!
//! Deserialization needs an instance before it can write fields into it.
//! [`Instantiate`] creates one without running any user constructor: every
//! field holds its own blank value (`0`, `""`, `None`, empty collections, the
//! first enum variant) until the engine overwrites it.
//!
//! Types that must not be built blank opt into their [`Default`] impl with
//! `#[reflect(default)]`, and types that cannot be built at all with
//! `#[reflect(instantiate = false)]`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::TypeInfo;
use crate::marshal::MarshalError;

mod instantiate;

pub use instantiate::Instantiate;

// -----------------------------------------------------------------------------
// Constructor

/// Creates a boxed instance of one type.
pub type ConstructFn = fn() -> Box<dyn Reflect>;

/// How instances of a struct or opaque type are created.
#[derive(Debug, Clone, Copy)]
pub enum Constructor {
    /// Blank construction through [`Instantiate`].
    Blank(ConstructFn),
    /// The type's [`Default`] impl.
    Default(ConstructFn),
    /// The type cannot be instantiated.
    None,
}

impl Constructor {
    /// Returns the construct function, if any.
    #[inline]
    pub const fn get(self) -> Option<ConstructFn> {
        match self {
            Self::Blank(f) | Self::Default(f) => Some(f),
            Self::None => None,
        }
    }
}

/// Returns `T`'s blank instance as a [`ConstructFn`] target.
pub fn blank<T: Instantiate + Reflect>() -> Box<dyn Reflect> {
    Box::new(T::instantiate())
}

/// Returns `T::default()` as a [`ConstructFn`] target.
pub fn default<T: Default + Reflect>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

// -----------------------------------------------------------------------------
// instantiate

/// Creates an instance of the type described by `info`.
///
/// Structs and opaque types use their [`Constructor`], other kinds are built
/// structurally. `Box<dyn Reflect>` has no concrete type to build and fails,
/// like every type without a constructor.
///
/// # Examples
///
/// ```
/// use op_reflect::{construct, derive::Reflect, info::Typed};
///
/// #[derive(Reflect)]
/// struct Config {
///     name: String,
///     retries: [u8; 2],
///     parent: Option<Box<Config>>,
/// }
///
/// let blank = construct::instantiate(Config::type_info()).unwrap();
/// let config = blank.downcast_ref::<Config>().unwrap();
/// assert!(config.name.is_empty());
/// assert_eq!(config.retries, [0, 0]);
/// assert!(config.parent.is_none());
///
/// let dynamic = <Box<dyn op_reflect::Reflect>>::type_info();
/// assert!(construct::instantiate(dynamic).is_err());
/// ```
pub fn instantiate(info: &'static TypeInfo) -> Result<Box<dyn Reflect>, MarshalError> {
    let failed = |reason: &str| MarshalError::Instantiation {
        type_path: info.type_path(),
        reason: reason.into(),
    };

    match info {
        TypeInfo::Leaf(leaf) => Ok(leaf.blank()),
        TypeInfo::Struct(_) | TypeInfo::Opaque(_) => match info.constructor().get() {
            Some(construct) => Ok(construct()),
            None => Err(failed("the type has no constructor")),
        },
        TypeInfo::Enum(enum_info) => enum_info
            .build_variant(0)
            .ok_or_else(|| failed("the enum has no variants")),
        TypeInfo::Array(array) => match array.fixed_len() {
            Some(len) => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(instantiate(array.item_info())?);
                }
                array
                    .from_items(items)
                    .ok_or_else(|| failed("the elements have the wrong type"))
            }
            None => array
                .from_items(Vec::new())
                .ok_or_else(|| failed("empty arrays are not supported")),
        },
        TypeInfo::List(list) => list
            .from_items(Vec::new())
            .ok_or_else(|| failed("empty lists are not supported")),
        TypeInfo::Map(map) => map
            .from_entries(Vec::new())
            .ok_or_else(|| failed("empty maps are not supported")),
        TypeInfo::Optional(optional) => Ok(optional.none()),
        TypeInfo::Pointer(pointer) => {
            let pointee = instantiate(pointer.pointee_info())?;
            pointer
                .wrap(pointee)
                .ok_or_else(|| failed("the pointee has the wrong type"))
        }
        TypeInfo::Dynamic(_) => Err(failed("the concrete type is unknown")),
    }
}
