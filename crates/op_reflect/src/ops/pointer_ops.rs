use crate::Reflect;

/// A transparent wrapper: `Box<T>`, `Arc<T>`, `Mutex<T>` and `RwLock<T>`.
pub trait Pointer: Reflect {
    /// Returns the pointee, `None` for locks, which must be entered through
    /// [`with_pointee`](Pointer::with_pointee).
    fn pointee(&self) -> Option<&dyn Reflect>;

    /// Runs `f` with the pointee, holding the lock if there is one.
    ///
    /// A poisoned lock is entered anyway.
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn Reflect));
}
