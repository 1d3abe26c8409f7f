use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// A process-wide resource opened on first use and shared afterwards.
///
/// `reset` drops the cached value so the next access reopens it, e.g. after
/// the underlying index has been rebuilt or between tests.
pub struct SharedHandle<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> SharedHandle<T> {
    pub const fn new() -> Self {
        Self { slot: parking_lot::const_mutex(None) }
    }

    /// Cached value, or the result of `init` stored for later callers. A
    /// failed `init` leaves the handle empty.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut slot = self.slot.lock();
        if let Some(value) = slot.as_ref() { return Ok(Arc::clone(value)); }
        let value = Arc::new(init()?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self) -> Option<Arc<T>> { self.slot.lock().clone() }

    pub fn is_initialized(&self) -> bool { self.slot.lock().is_some() }

    /// Returns whether a value was dropped. Clones already handed out stay valid.
    pub fn reset(&self) -> bool { self.slot.lock().take().is_some() }
}

impl<T> Default for SharedHandle<T> {
    fn default() -> Self { Self::new() }
}
