use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::info::Type;
use crate::transform::{CreateTransformer, Transformer};

// -----------------------------------------------------------------------------
// TransformerDecl

/// A declared conversion hook: which hook type, and whether it is inherited.
///
/// Declarations are static data, the hook itself is only created when a
/// cache first resolves it.
///
/// ```
/// use op_reflect::transform::{Base64Transformer, TransformerDecl};
///
/// let decl = TransformerDecl::new::<Base64Transformer>(false);
/// assert!(decl.ty().is::<Base64Transformer>());
/// assert!(!decl.is_inheritable());
/// ```
#[derive(Clone, Copy)]
pub struct TransformerDecl {
    ty: Type,
    inheritable: bool,
    create: fn() -> Result<Arc<dyn Transformer>, String>,
}

impl TransformerDecl {
    /// Declares the hook `H`.
    #[inline]
    pub fn new<H: Transformer + CreateTransformer>(inheritable: bool) -> Self {
        Self {
            ty: Type::of::<H>(),
            inheritable,
            create: create_shared::<H>,
        }
    }

    /// Returns the hook type, which is also the hook's identity.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns `true` if the hook also applies to derived types.
    #[inline]
    pub const fn is_inheritable(&self) -> bool {
        self.inheritable
    }

    /// Creates a hook instance.
    #[inline]
    pub fn create(&self) -> Result<TransformerRef, String> {
        (self.create)().map(|inner| TransformerRef { ty: self.ty, inner })
    }
}

fn create_shared<H: Transformer + CreateTransformer>() -> Result<Arc<dyn Transformer>, String> {
    H::create().map(|hook| Arc::new(hook) as Arc<dyn Transformer>)
}

impl fmt::Debug for TransformerDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerDecl")
            .field("ty", &self.ty)
            .field("inheritable", &self.inheritable)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TransformerRef

/// A shared hook instance, as stored in type descriptors.
#[derive(Clone)]
pub struct TransformerRef {
    ty: Type,
    inner: Arc<dyn Transformer>,
}

impl TransformerRef {
    /// Returns the hook type.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the hook.
    #[inline]
    pub fn get(&self) -> &dyn Transformer {
        &*self.inner
    }

    /// Returns `true` if both refer to the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TransformerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransformerRef").field(&self.ty).finish()
    }
}
