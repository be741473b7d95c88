use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::{DefaultFn, TypeInfo};
use crate::marshal::MarshalError;
use crate::ops::{ReflectMut, ReflectRef};
use crate::transform::{ListTransformer, MapTransformer, TransformerRef};

// -----------------------------------------------------------------------------
// Accessor

/// The path from a struct to one of its fields, through base fields.
///
/// `[0, 2]` is field `2` of the base stored in field `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    path: Box<[usize]>,
}

impl Accessor {
    /// Create an accessor from field indices, outermost first.
    #[inline]
    pub fn new(path: &[usize]) -> Self {
        Self { path: path.into() }
    }

    /// Returns the field indices, outermost first.
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Returns the field inside `root`.
    pub fn get<'a>(&self, root: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        let mut current = root;
        for &index in &self.path {
            current = match current.reflect_ref() {
                ReflectRef::Struct(value) => value.field_at(index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns the field inside `root` mutably.
    pub fn get_mut<'a>(&self, root: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        let mut current = root;
        for &index in &self.path {
            current = match current.reflect_mut() {
                ReflectMut::Struct(value) => value.field_at_mut(index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One marshalled field, with its annotations resolved.
pub struct FieldDescriptor {
    pub(crate) accessor: Accessor,
    pub(crate) name: &'static str,
    pub(crate) field_name: &'static str,
    pub(crate) declared: &'static TypeInfo,
    pub(crate) explicit: Option<&'static TypeInfo>,
    pub(crate) transformer: Option<TransformerRef>,
    pub(crate) default: Option<DefaultFn>,
}

impl FieldDescriptor {
    /// Returns the path to the field.
    #[inline]
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Returns the name used in documents.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field name as declared in Rust.
    #[inline]
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Returns the declared type.
    #[inline]
    pub fn declared(&self) -> &'static TypeInfo {
        self.declared
    }

    /// Returns the explicit type override.
    #[inline]
    pub fn explicit(&self) -> Option<&'static TypeInfo> {
        self.explicit
    }

    /// Returns the type documents are read as: the explicit type if there
    /// is one, else the declared type.
    #[inline]
    pub fn goal(&self) -> &'static TypeInfo {
        self.explicit.unwrap_or(self.declared)
    }

    /// Returns the field-level hook.
    #[inline]
    pub fn transformer(&self) -> Option<&TransformerRef> {
        self.transformer.as_ref()
    }

    /// Returns the supplier used for missing entries.
    #[inline]
    pub fn default_fn(&self) -> Option<DefaultFn> {
        self.default
    }

    /// Reads the field from its struct.
    pub fn get<'a>(
        &self,
        owner: &'static TypeInfo,
        root: &'a dyn Reflect,
    ) -> Result<&'a dyn Reflect, MarshalError> {
        self.accessor.get(root).ok_or_else(|| self.access_error(owner))
    }

    /// Reads the field from its struct mutably.
    pub fn get_mut<'a>(
        &self,
        owner: &'static TypeInfo,
        root: &'a mut dyn Reflect,
    ) -> Result<&'a mut dyn Reflect, MarshalError> {
        self.accessor
            .get_mut(root)
            .ok_or_else(|| self.access_error(owner))
    }

    fn access_error(&self, owner: &'static TypeInfo) -> MarshalError {
        MarshalError::FieldAccess {
            type_path: owner.type_path(),
            field: self.field_name,
            reason: "the field path does not resolve".into(),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("accessor", &self.accessor)
            .field("declared", &self.declared.type_path())
            .field("explicit", &self.explicit.map(TypeInfo::type_path))
            .field("transformer", &self.transformer)
            .field("default", &self.default.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The captured marshalling description of one type.
///
/// Fields come ancestors first, then in declaration order. Hooks come in
/// resolution order, see [`resolve`](crate::transform::resolve).
pub struct TypeDescriptor {
    pub(crate) info: &'static TypeInfo,
    pub(crate) fields: Box<[FieldDescriptor]>,
    pub(crate) transformers: Box<[TransformerRef]>,
}

impl TypeDescriptor {
    /// Returns the described type.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Returns the fields.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field with the document name `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the type-level hook chain.
    #[inline]
    pub fn transformers(&self) -> &[TransformerRef] {
        &self.transformers
    }

    /// Returns `true` if the chain holds [`ListTransformer`] or
    /// [`MapTransformer`], which let the engine write a collection element
    /// by element.
    pub fn walks_elements(&self) -> bool {
        self.transformers.iter().any(|hook| {
            let ty = hook.ty();
            ty.is::<ListTransformer>() || ty.is::<MapTransformer>()
        })
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.info.type_path())
            .field("fields", &self.fields)
            .field("transformers", &self.transformers)
            .finish()
    }
}
