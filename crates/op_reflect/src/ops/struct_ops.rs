use crate::Reflect;

/// A reflected struct with named fields.
///
/// Field indices follow the order of
/// [`StructInfo`](crate::info::StructInfo): declaration order, with
/// `#[reflect(ignore)]` fields left out.
///
/// # Examples
///
/// ```
/// use op_reflect::{Reflect, derive::Reflect, ops::Struct};
///
/// #[derive(Reflect)]
/// struct Point { x: i32, y: i32 }
///
/// let mut point = Point { x: 1, y: 2 };
/// assert_eq!(point.field_len(), 2);
/// assert_eq!(point.field("y").unwrap().downcast_ref::<i32>(), Some(&2));
///
/// *point.field_at_mut(0).unwrap().downcast_mut::<i32>().unwrap() = 5;
/// assert_eq!(point.x, 5);
/// ```
pub trait Struct: Reflect {
    /// Returns the field at `index`.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the field at `index` mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns the number of reflected fields.
    fn field_len(&self) -> usize;

    /// Returns the field with the Rust name `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        let info = self.reflect_type_info().as_struct().ok()?;
        self.field_at(info.index_of(name)?)
    }
}
