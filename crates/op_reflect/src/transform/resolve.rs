use alloc::vec::Vec;
use core::any::TypeId;

use op_utils::TypeIdMap;

use crate::info::TypeInfo;
use crate::transform::TransformerDecl;

// -----------------------------------------------------------------------------
// Registrations

/// Hooks registered against types and interfaces, outside their declarations.
///
/// The key is the `TypeId` of a concrete type or of a `dyn Trait`.
#[derive(Debug, Default, Clone)]
pub struct Registrations {
    table: TypeIdMap<Vec<TransformerDecl>>,
}

impl Registrations {
    /// Creates an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: TypeIdMap::new(),
        }
    }

    /// Registers `decl` against `target`.
    ///
    /// Returns `false` if the same hook type was already registered there,
    /// in which case only its inheritable flag is updated.
    pub fn register(&mut self, target: TypeId, decl: TransformerDecl) -> bool {
        let decls = self.table.get_or_insert(target, Vec::new);
        match decls.iter_mut().find(|old| old.ty() == decl.ty()) {
            Some(old) => {
                *old = decl;
                false
            }
            None => {
                decls.push(decl);
                true
            }
        }
    }

    /// Removes the hook type `hook` from `target`.
    ///
    /// Returns `false` if it was not registered there.
    pub fn unregister(&mut self, target: TypeId, hook: TypeId) -> bool {
        let Some(decls) = self.table.get_mut(&target) else {
            return false;
        };
        let len = decls.len();
        decls.retain(|decl| decl.ty().id() != hook);
        let removed = decls.len() != len;
        if decls.is_empty() {
            self.table.remove(&target);
        }
        removed
    }

    /// Returns the hooks registered against `target`, in registration order.
    #[inline]
    pub fn get(&self, target: TypeId) -> &[TransformerDecl] {
        self.table.get(&target).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// -----------------------------------------------------------------------------
// resolve

/// Resolves the ordered chain of type-level hooks of `info`.
///
/// The base type is resolved first, then each interface, then the type
/// itself. So ancestor hooks always come before the hooks of derived types.
///
/// For the type itself every hook applies. For its bases and interfaces only
/// inheritable hooks do:
///
/// - a registered hook is appended if `root || inheritable`, unless the same
///   hook type is already in the chain;
/// - the declared hook is appended if `root || inheritable`.
pub fn resolve(info: &'static TypeInfo, registrations: &Registrations) -> Vec<TransformerDecl> {
    let mut chain = Vec::new();
    collect(info, true, registrations, &mut chain);
    chain
}

fn collect(
    info: &'static TypeInfo,
    root: bool,
    registrations: &Registrations,
    chain: &mut Vec<TransformerDecl>,
) {
    if let Some(base) = info.base() {
        collect(base, false, registrations, chain);
    }

    for interface in info.interfaces() {
        push_registered(registrations.get(interface.id()), false, chain);
    }

    push_registered(registrations.get(info.type_id()), root, chain);

    if let Some(decl) = info.transformer()
        && (root || decl.is_inheritable())
    {
        chain.push(*decl);
    }
}

fn push_registered(decls: &[TransformerDecl], root: bool, chain: &mut Vec<TransformerDecl>) {
    for decl in decls {
        if (root || decl.is_inheritable()) && !chain.iter().any(|old| old.ty() == decl.ty()) {
            chain.push(*decl);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use op_value::Value;

    use super::{Registrations, resolve};
    use crate::derive::Reflect;
    use crate::info::{TypeInfo, Typed};
    use crate::marshal::{MarshalError, Opacker};
    use crate::transform::{Transformer, TransformerDecl};

    macro_rules! pass_through {
        ($($name:ident),*) => {$(
            #[derive(Default)]
            struct $name;

            impl Transformer for $name {
                fn serialize(
                    &self,
                    _: &mut Opacker,
                    _: &'static TypeInfo,
                    _: &dyn crate::Reflect,
                ) -> Result<Option<Box<dyn crate::Reflect>>, MarshalError> {
                    Ok(None)
                }

                fn deserialize(
                    &self,
                    _: &mut Opacker,
                    _: &'static TypeInfo,
                    _: &Value,
                ) -> Result<Option<Box<dyn crate::Reflect>>, MarshalError> {
                    Ok(None)
                }
            }
        )*};
    }

    pass_through!(HookA, HookB, HookC, HookM, HookR);

    trait Marker {}

    #[derive(Reflect)]
    #[reflect(transformer = HookA, inheritable)]
    struct A {
        a: u8,
    }

    #[derive(Reflect)]
    #[reflect(transformer = HookB, inheritable)]
    struct B {
        #[reflect(base)]
        base: A,
        b: u8,
    }

    #[derive(Reflect)]
    #[reflect(transformer = HookC, inheritable)]
    struct C {
        #[reflect(base)]
        base: B,
        c: u8,
    }

    #[derive(Reflect)]
    #[reflect(transformer = HookB)]
    struct Sealed {
        #[reflect(base)]
        base: A,
    }

    #[derive(Reflect)]
    struct D {
        #[reflect(base)]
        base: Sealed,
    }

    #[derive(Reflect)]
    #[reflect(implements(dyn Marker), transformer = HookC)]
    struct Marked {
        value: u8,
    }

    fn chain_of<T: Typed>(registrations: &Registrations) -> Vec<TypeId> {
        resolve(T::type_info(), registrations)
            .iter()
            .map(|decl| decl.ty().id())
            .collect()
    }

    fn ids<const N: usize>(ids: [TypeId; N]) -> Vec<TypeId> {
        ids.to_vec()
    }

    #[test]
    fn ancestors_first() {
        let registrations = Registrations::new();
        assert_eq!(
            chain_of::<C>(&registrations),
            ids([
                TypeId::of::<HookA>(),
                TypeId::of::<HookB>(),
                TypeId::of::<HookC>()
            ])
        );
        assert_eq!(
            chain_of::<B>(&registrations),
            ids([TypeId::of::<HookA>(), TypeId::of::<HookB>()])
        );
    }

    #[test]
    fn non_inheritable_stays_on_declaring_type() {
        let registrations = Registrations::new();
        assert_eq!(
            chain_of::<Sealed>(&registrations),
            ids([TypeId::of::<HookA>(), TypeId::of::<HookB>()])
        );
        assert_eq!(chain_of::<D>(&registrations), ids([TypeId::of::<HookA>()]));
    }

    #[test]
    fn registrations_follow_flags() {
        let mut registrations = Registrations::new();
        registrations.register(TypeId::of::<A>(), TransformerDecl::new::<HookR>(false));
        assert_eq!(
            chain_of::<A>(&registrations),
            ids([TypeId::of::<HookR>(), TypeId::of::<HookA>()])
        );
        assert_eq!(
            chain_of::<B>(&registrations),
            ids([TypeId::of::<HookA>(), TypeId::of::<HookB>()])
        );

        assert!(!registrations.register(TypeId::of::<A>(), TransformerDecl::new::<HookR>(true)));
        assert_eq!(
            chain_of::<B>(&registrations),
            ids([
                TypeId::of::<HookR>(),
                TypeId::of::<HookA>(),
                TypeId::of::<HookB>()
            ])
        );

        assert!(registrations.unregister(TypeId::of::<A>(), TypeId::of::<HookR>()));
        assert!(!registrations.unregister(TypeId::of::<A>(), TypeId::of::<HookR>()));
        assert!(registrations.is_empty());
    }

    #[test]
    fn registered_duplicates_are_suppressed() {
        let mut registrations = Registrations::new();
        registrations.register(TypeId::of::<C>(), TransformerDecl::new::<HookA>(true));
        assert_eq!(
            chain_of::<C>(&registrations),
            ids([
                TypeId::of::<HookA>(),
                TypeId::of::<HookB>(),
                TypeId::of::<HookC>()
            ])
        );
    }

    #[test]
    fn interfaces_contribute_inheritable_registrations() {
        let mut registrations = Registrations::new();
        registrations.register(TypeId::of::<dyn Marker>(), TransformerDecl::new::<HookM>(false));
        assert_eq!(chain_of::<Marked>(&registrations), ids([TypeId::of::<HookC>()]));

        registrations.register(TypeId::of::<dyn Marker>(), TransformerDecl::new::<HookM>(true));
        assert_eq!(
            chain_of::<Marked>(&registrations),
            ids([TypeId::of::<HookM>(), TypeId::of::<HookC>()])
        );
    }
}
