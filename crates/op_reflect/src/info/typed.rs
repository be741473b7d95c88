use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Automatically implemented by [`#[derive(Reflect)]`](crate::derive::Reflect),
/// allowing access to type information without an instance of the type.
///
/// # Examples
///
/// ```
/// use op_reflect::{derive::Reflect, info::{Typed, TypeInfo}};
///
/// #[derive(Reflect)]
/// struct A { value: u8 }
///
/// let info: &'static TypeInfo = <A as Typed>::type_info();
/// assert!(info.type_is::<A>());
/// ```
///
/// # Manually Impl
///
/// It is not recommended to implement manually. [`NonGenericTypeInfoCell`]
/// and [`GenericTypeInfoCell`] store the info for the rest of the program:
///
/// ```
/// use op_reflect::impls::NonGenericTypeInfoCell;
/// use op_reflect::info::{OpaqueInfo, TypeInfo, Typed};
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
/// assert!(Handle::type_info().as_opaque().is_ok());
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: 'static {
    /// Returns the compile-time [info] for the underlying type.
    ///
    /// [info]: TypeInfo
    fn type_info() -> &'static TypeInfo;
}
