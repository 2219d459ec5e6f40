use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// Whole-container mutual exclusion for use across threads.
///
/// The containers in this crate do no locking of their own. `Shared` puts a
/// container behind a single mutex; clones share the same container.
///
/// # Type Parameters
///
/// * `C` - The wrapped container. Must be `Send` to cross threads
///
/// # Examples
///
/// ```rust
/// use identity_collections::{LruBuffer, Shared};
///
/// let buffer = Shared::new(LruBuffer::new(2).unwrap());
/// let evicted = buffer.with(|b| {
///     b.add("a")?;
///     b.add("b")?;
///     b.add("c")
/// });
/// assert_eq!(evicted, Ok(Some("a")));
/// ```
pub struct Shared<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Shared<C> {
    pub fn new(container: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(container)),
        }
    }

    /// Runs `f` with exclusive access to the container.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Locks the container until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, C> {
        self.inner.lock()
    }

    /// Returns the container if this is the last handle, or the handle
    /// itself otherwise.
    pub fn into_inner(self) -> Result<C, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<C> Clone for Shared<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Default> Default for Shared<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
