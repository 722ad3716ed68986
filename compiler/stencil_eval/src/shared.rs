//! Single-threaded shared cell used by symbols and scopes.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// `Rc<RefCell<T>>` behind a newtype so every shared cell is created through
/// [`LocalCell::new`].
///
/// Not thread-safe: evaluation of one template runs on a single thread.
#[repr(transparent)]
pub struct LocalCell<T>(Rc<RefCell<T>>);

impl<T> LocalCell<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalCell(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalCell<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalCell(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalCell").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalCell<T> {
    fn default() -> Self {
        LocalCell::new(T::default())
    }
}
