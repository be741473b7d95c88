use alloc::boxed::Box;
use alloc::sync::Arc;
use std::sync::{Mutex, PoisonError, RwLock};

use crate::Reflect;
use crate::construct::Instantiate;
use crate::impls::GenericTypeInfoCell;
use crate::info::{PointerInfo, TypeInfo, Typed};
use crate::ops::Pointer;
use crate::reflection::impl_reflect_cast_fn;

macro_rules! impl_reflect_for_pointer {
    ($ty:ident, locking: $locking:literal, new: $new:path) => {
        impl<T: Reflect + Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Pointer(PointerInfo::new::<Self, T>(
                        |pointee| {
                            let pointee = pointee.take_as::<T>().ok()?;
                            Some(Box::new($new(pointee)) as Box<dyn Reflect>)
                        },
                        $locking,
                    ))
                })
            }
        }

        impl<T: Reflect + Typed> Reflect for $ty<T> {
            impl_reflect_cast_fn!(Pointer);
        }

        impl<T: Instantiate> Instantiate for $ty<T> {
            #[inline]
            fn instantiate() -> Self {
                $new(T::instantiate())
            }
        }
    };
}

impl_reflect_for_pointer!(Box, locking: false, new: Box::new);
impl_reflect_for_pointer!(Arc, locking: false, new: Arc::new);
impl_reflect_for_pointer!(Mutex, locking: true, new: Mutex::new);
impl_reflect_for_pointer!(RwLock, locking: true, new: RwLock::new);

impl<T: Reflect + Typed> Pointer for Box<T> {
    #[inline]
    fn pointee(&self) -> Option<&dyn Reflect> {
        Some(&**self)
    }

    #[inline]
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Reflect)) {
        f(&**self);
    }
}

impl<T: Reflect + Typed> Pointer for Arc<T> {
    #[inline]
    fn pointee(&self) -> Option<&dyn Reflect> {
        Some(&**self)
    }

    #[inline]
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Reflect)) {
        f(&**self);
    }
}

impl<T: Reflect + Typed> Pointer for Mutex<T> {
    #[inline]
    fn pointee(&self) -> Option<&dyn Reflect> {
        None
    }

    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Reflect)) {
        let guard = self.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*guard);
    }
}

impl<T: Reflect + Typed> Pointer for RwLock<T> {
    #[inline]
    fn pointee(&self) -> Option<&dyn Reflect> {
        None
    }

    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Reflect)) {
        let guard = self.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard);
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use std::sync::Mutex;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{Pointer, ReflectRef};

    #[test]
    fn locks_are_entered_through_the_callback() {
        let info = <Mutex<u32>>::type_info().as_pointer().unwrap();
        assert!(info.is_locking());

        let lock = Mutex::new(7_u32);
        assert!(lock.pointee().is_none());

        let mut seen = None;
        lock.with_pointee(&mut |inner| seen = inner.downcast_ref::<u32>().copied());
        assert_eq!(seen, Some(7));
    }

    #[test]
    fn shared_pointers_expose_the_pointee() {
        let shared = Arc::new(3_i64);
        let ReflectRef::Pointer(pointer) = shared.reflect_ref() else {
            panic!("expected a pointer");
        };
        let pointee = pointer.pointee().unwrap();
        assert_eq!(pointee.downcast_ref::<i64>(), Some(&3));
    }
}
