use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] and a readable path.
///
/// Only the `TypeId` takes part in equality and hashing. The path defaults
/// to [`core::any::type_name`] and can be overridden, e.g. through
/// `#[reflect(type_path = "...")]`.
///
/// Trait objects have a `Type` too, which is how interfaces are named:
///
/// ```
/// use op_reflect::info::Type;
/// use op_reflect::ops::List;
///
/// let list = Type::of::<dyn List>();
/// assert!(list.is::<dyn List>());
/// assert!(list.path().ends_with("List"));
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Create the `Type` of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    /// Replaces the readable path.
    #[inline]
    pub const fn with_path(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the readable path, e.g. `alloc::string::String`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the path without module prefixes, e.g. `Vec<String>`.
    ///
    /// ```
    /// use op_reflect::info::Type;
    ///
    /// assert_eq!(Type::of::<Vec<String>>().name(), "Vec<String>");
    /// assert_eq!(Type::of::<u8>().name(), "u8");
    /// ```
    pub fn name(&self) -> alloc::string::String {
        let mut name = alloc::string::String::with_capacity(self.path.len());
        let mut segment_start = 0;
        for (index, ch) in self.path.char_indices() {
            match ch {
                ':' => segment_start = index + 1,
                '<' | '>' | ',' | ' ' | '[' | ']' | ';' | '(' | ')' | '&' => {
                    name.push_str(&self.path[segment_start..index]);
                    name.push(ch);
                    segment_start = index + 1;
                }
                _ => {}
            }
        }
        name.push_str(&self.path[segment_start..]);
        name
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
