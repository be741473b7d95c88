use alloc::boxed::Box;
use alloc::vec::Vec;

use op_value::ArrayValue;

use crate::Reflect;
use crate::construct::Instantiate;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ArrayInfo, TypeInfo, Typed};
use crate::ops::Array;
use crate::reflection::impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// Helpers

/// Collects finished elements into `C`, `None` if one has the wrong type.
pub(super) fn collect_items<T, C>(items: Vec<Box<dyn Reflect>>) -> Option<C>
where
    T: Reflect + Typed,
    C: FromIterator<T>,
{
    items
        .into_iter()
        .map(|item| item.take_as::<T>().ok())
        .collect()
}

fn boxed<T: Reflect>(value: Option<T>) -> Option<Box<dyn Reflect>> {
    value.map(|value| Box::new(value) as Box<dyn Reflect>)
}

// -----------------------------------------------------------------------------
// Vec<T>

impl<T: Reflect + Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(
                None,
                |items| boxed(collect_items::<T, Vec<T>>(items)),
                |array| boxed(array.to_native_vec::<T>()),
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Vec<T> {
    impl_reflect_cast_fn!(Array);
}

impl<T: Reflect + Typed> Array for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }

    #[inline]
    fn to_native(&self) -> Option<ArrayValue> {
        ArrayValue::from_native_slice(self)
    }
}

impl<T> Instantiate for Vec<T> {
    #[inline]
    fn instantiate() -> Self {
        Vec::new()
    }
}

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: Reflect + Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(
                None,
                |items| boxed(collect_items::<T, Box<[T]>>(items)),
                |array| boxed(array.to_native_vec::<T>().map(Vec::into_boxed_slice)),
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Box<[T]> {
    impl_reflect_cast_fn!(Array);
}

impl<T: Reflect + Typed> Array for Box<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }

    #[inline]
    fn to_native(&self) -> Option<ArrayValue> {
        ArrayValue::from_native_slice(self)
    }
}

impl<T> Instantiate for Box<[T]> {
    #[inline]
    fn instantiate() -> Self {
        Box::new([])
    }
}

// -----------------------------------------------------------------------------
// [T; N]

fn array_from_vec<T, const N: usize>(items: Option<Vec<T>>) -> Option<[T; N]> {
    items?.try_into().ok()
}

impl<T: Reflect + Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(
                Some(N),
                |items| boxed(array_from_vec::<T, N>(collect_items::<T, Vec<T>>(items))),
                |array| boxed(array_from_vec::<T, N>(array.to_native_vec::<T>())),
            ))
        })
    }
}

impl<T: Reflect + Typed, const N: usize> Reflect for [T; N] {
    impl_reflect_cast_fn!(Array);
}

impl<T: Reflect + Typed, const N: usize> Array for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }

    #[inline]
    fn to_native(&self) -> Option<ArrayValue> {
        ArrayValue::from_native_slice(self)
    }
}

impl<T: Instantiate, const N: usize> Instantiate for [T; N] {
    #[inline]
    fn instantiate() -> Self {
        core::array::from_fn(|_| T::instantiate())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use op_value::ArrayValue;

    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn fixed_arrays_check_their_length() {
        let info = <[u8; 2]>::type_info().as_array().unwrap();
        assert_eq!(info.fixed_len(), Some(2));

        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8), Box::new(2_u8)];
        let built = info.from_items(items).unwrap();
        assert_eq!(built.downcast_ref::<[u8; 2]>(), Some(&[1, 2]));

        let short = ArrayValue::from_native_slice(&[1_u8]).unwrap();
        assert!(info.from_native(&short).is_none());
    }

    #[test]
    fn wrong_element_types_are_rejected() {
        let info = <Vec<String>>::type_info().as_array().unwrap();
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8)];
        assert!(info.from_items(items).is_none());
    }
}
