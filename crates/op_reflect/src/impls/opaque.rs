use core::time::Duration;
use std::path::PathBuf;

use crate::construct::{self, Constructor, Instantiate};
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, Typed};
use crate::reflection::impl_reflect_cast_fn;

// Neither type exposes its fields, documents are produced by the predefined
// hooks registered in `TypeCaptureCache::new`.
macro_rules! impl_opaque {
    ($($ty:ty => $blank:expr),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Opaque(
                        OpaqueInfo::new::<$ty>()
                            .with_constructor(Constructor::Default(construct::default::<$ty>)),
                    )
                })
            }
        }

        impl crate::Reflect for $ty {
            impl_reflect_cast_fn!(Opaque);
        }

        impl Instantiate for $ty {
            #[inline]
            fn instantiate() -> Self {
                $blank
            }
        }
    )*};
}

impl_opaque!(
    Duration => Duration::ZERO,
    PathBuf => PathBuf::new(),
);
