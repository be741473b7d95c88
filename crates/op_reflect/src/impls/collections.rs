use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use super::array::collect_items;
use crate::Reflect;
use crate::construct::Instantiate;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, MapInfo, TypeInfo, Typed};
use crate::ops::{List, Map};
use crate::reflection::impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// Lists

macro_rules! impl_reflect_for_list {
    ($ty:ident<T $(, $s:ident)?> where $($bound:path),* ) => {
        impl<T, $($s)?> Typed for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(ListInfo::new::<Self, T>(|items| {
                        collect_items::<T, Self>(items)
                            .map(|list| Box::new(list) as Box<dyn Reflect>)
                    }))
                })
            }
        }

        impl<T, $($s)?> Reflect for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            impl_reflect_cast_fn!(List);
        }

        impl<T, $($s)?> List for $ty<T $(, $s)?>
        where
            T: Reflect + Typed $(+ $bound)*,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + Send + '_> {
                Box::new($ty::iter(self).map(|item| item as &dyn Reflect))
            }
        }

        impl<T, $($s)?> Instantiate for $ty<T $(, $s)?>
        where
            T: $($bound +)* ,
            $($s: BuildHasher + Default,)?
        {
            #[inline]
            fn instantiate() -> Self {
                Default::default()
            }
        }
    };
}

impl_reflect_for_list!(VecDeque<T> where);
impl_reflect_for_list!(LinkedList<T> where);
impl_reflect_for_list!(BTreeSet<T> where Ord);
impl_reflect_for_list!(HashSet<T, S> where Eq, Hash);

// -----------------------------------------------------------------------------
// Maps

fn collect_entries<K, V, C>(entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Option<C>
where
    K: Reflect + Typed,
    V: Reflect + Typed,
    C: FromIterator<(K, V)>,
{
    entries
        .into_iter()
        .map(|(key, value)| Some((key.take_as::<K>().ok()?, value.take_as::<V>().ok()?)))
        .collect()
}

macro_rules! impl_reflect_for_map {
    ($ty:ident<K, V $(, $s:ident)?> where $($bound:path),* ) => {
        impl<K, V, $($s)?> Typed for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)*,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(|entries| {
                        collect_entries::<K, V, Self>(entries)
                            .map(|map| Box::new(map) as Box<dyn Reflect>)
                    }))
                })
            }
        }

        impl<K, V, $($s)?> Reflect for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)*,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            impl_reflect_cast_fn!(Map);
        }

        impl<K, V, $($s)?> Map for $ty<K, V $(, $s)?>
        where
            K: Reflect + Typed $(+ $bound)*,
            V: Reflect + Typed,
            $($s: BuildHasher + Default + Send + Sync + 'static,)?
        {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + Send + '_> {
                Box::new(
                    $ty::iter(self).map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }
        }

        impl<K, V, $($s)?> Instantiate for $ty<K, V $(, $s)?>
        where
            K: $($bound +)* ,
            $($s: BuildHasher + Default,)?
        {
            #[inline]
            fn instantiate() -> Self {
                Default::default()
            }
        }
    };
}

impl_reflect_for_map!(BTreeMap<K, V> where Ord);
impl_reflect_for_map!(HashMap<K, V, S> where Eq, Hash);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::collections::HashSet;

    use crate::Reflect;
    use crate::info::{Type, Typed};
    use crate::ops::{List, Map};

    #[test]
    fn collections_expose_their_interfaces() {
        let list = <HashSet<u32>>::type_info().as_list().unwrap();
        assert_eq!(list.interfaces(), &[Type::of::<dyn List>()]);

        let map = <BTreeMap<String, u32>>::type_info().as_map().unwrap();
        assert_eq!(map.interfaces(), &[Type::of::<dyn Map>()]);
        assert!(map.key_info().type_is::<String>());
    }

    #[test]
    fn maps_rebuild_from_entries() {
        let info = <BTreeMap<String, u32>>::type_info().as_map().unwrap();
        let entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)> =
            vec![(Box::new(String::from("a")), Box::new(1_u32))];
        let built = info.from_entries(entries).unwrap();

        let map = built.downcast_ref::<BTreeMap<String, u32>>().unwrap();
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(Map::len(map), 1);
    }
}
