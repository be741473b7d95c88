use crate::Reflect;

/// A reflected fieldless enum.
pub trait Enum: Reflect {
    /// Returns the index of the current variant, in declaration order.
    fn variant_index(&self) -> usize;

    /// Returns the name of the current variant.
    fn variant_name(&self) -> &'static str {
        self.reflect_type_info()
            .as_enum()
            .ok()
            .and_then(|info| info.name_at(self.variant_index()))
            .unwrap_or_default()
    }
}
