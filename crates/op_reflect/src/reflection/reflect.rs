use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{ReflectKind, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait of the marshalling engine.
///
/// A reflected value knows its static [`TypeInfo`] and exposes its structure
/// through [`reflect_ref`] and [`reflect_mut`]. The engine walks object graphs
/// with nothing else.
///
/// It's strongly recommended to use [the derive macro for `Reflect`] rather
/// than implementing this trait manually.
///
/// # Type Identification
///
/// Note that [`Any::type_id`] on `Box<dyn Reflect>` returns the container's
/// type ID, not the inner value's. Use [`Reflect::ty_id`] instead:
///
/// ```
/// use op_reflect::Reflect;
/// use core::any::TypeId;
///
/// let x: Box<dyn Reflect> = 32_i32.into_boxed_reflect();
///
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// assert_eq!(x.downcast_ref::<i32>(), Some(&32));
/// ```
///
/// # Manual Implementation
///
/// ```
/// use op_reflect::{Reflect, impls::NonGenericTypeInfoCell};
/// use op_reflect::info::{OpaqueInfo, TypeInfo, Typed};
/// use op_reflect::ops::{ReflectMut, ReflectRef};
///
/// struct Handle(u32);
///
/// impl Typed for Handle {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// impl Reflect for Handle {
///     fn reflect_type_info(&self) -> &'static TypeInfo {
///         Self::type_info()
///     }
///     fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
///         *self = value.take::<Self>()?;
///         Ok(())
///     }
///     fn reflect_ref(&self) -> ReflectRef<'_> {
///         ReflectRef::Opaque(self)
///     }
///     fn reflect_mut(&mut self) -> ReflectMut<'_> {
///         ReflectMut::Opaque(self)
///     }
/// }
///
/// let handle: Box<dyn Reflect> = Box::new(Handle(7));
/// assert!(handle.reflect_type_info().as_opaque().is_ok());
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [the derive macro for `Reflect`]: crate::derive::Reflect
pub trait Reflect: Any + Send + Sync {
    /// Casts this type to a reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a mutable reflected value.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as a `Box<dyn Reflect>`.
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the static [`TypeInfo`] of the underlying type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Returns the [`ReflectKind`] of the underlying type.
    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        self.reflect_type_info().kind()
    }

    /// Replaces `self` with `value` if the types match, returning `value`
    /// back otherwise.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns an immutable structural view.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable structural view.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, moving it out of the box.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { *<Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Like [`take`](Self::take), but a `Box<dyn Reflect>` goal accepts any
    /// value by boxing it.
    ///
    /// ```
    /// use op_reflect::Reflect;
    ///
    /// let value = 1_u8.into_boxed_reflect();
    /// let boxed: Box<dyn Reflect> = value.take_as::<Box<dyn Reflect>>().unwrap();
    /// assert!(boxed.is::<u8>());
    /// ```
    pub fn take_as<T: Reflect + Typed>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if self.is::<T>() {
            return self.take::<T>();
        }
        if T::type_info().kind() == ReflectKind::Dynamic {
            let wrapped: Box<dyn Reflect> = Box::new(self);
            return wrapped.take::<T>();
        }
        Err(self)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_info().type_path())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
            <Self as $crate::info::Typed>::type_info()
        }

        fn set(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::alloc::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take_as::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
