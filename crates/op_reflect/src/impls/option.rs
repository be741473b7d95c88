use alloc::boxed::Box;

use crate::Reflect;
use crate::construct::Instantiate;
use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionalInfo, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(OptionalInfo::new::<Self, T>(
                |inner| {
                    let inner = inner.take_as::<T>().ok()?;
                    Some(Box::new(Some(inner)) as Box<dyn Reflect>)
                },
                || Box::new(None::<T>) as Box<dyn Reflect>,
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take_as::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|inner| inner as &dyn Reflect))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self.as_mut().map(|inner| inner as &mut dyn Reflect))
    }
}

impl<T> Instantiate for Option<T> {
    #[inline]
    fn instantiate() -> Self {
        None
    }
}
