use alloc::boxed::Box;

use crate::Reflect;
use crate::construct::Instantiate;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

/// A `Box<dyn Reflect>` field accepts a value of any type.
impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(&**self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(&mut **self)
    }
}

impl Instantiate for Box<dyn Reflect> {
    #[inline]
    fn instantiate() -> Self {
        Box::new(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn boxes_take_any_value() {
        let mut slot: Box<dyn Reflect> = Box::new(1_u8);
        assert_eq!(Reflect::reflect_kind(&slot), ReflectKind::Dynamic);

        slot.set(Box::new(String::from("x"))).unwrap();
        assert_eq!((*slot).downcast_ref::<String>().map(String::as_str), Some("x"));
        assert!(<Box<dyn Reflect>>::type_info().type_is::<Box<dyn Reflect>>());
    }
}
