//! Items used by code generated from `op_reflect_derive`.

pub mod alloc_utils {
    pub use alloc::boxed::Box;
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::Typed;
    use crate::registry::TypeRegistry;

    /// A registration function collected by `inventory`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Implemented for every reflected type, used by generated code.
    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: Typed> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Runs every collected registration function.
    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
