//! Thread ownership checks.
//!
//! Theme surfaces, the dispatcher queue, and the process-wide appearance
//! registry belong to the UI thread. Each records that thread in a
//! [`ThreadAffinity`] when it is created and checks writes against it.

use std::thread::ThreadId;

/// Records the thread a piece of state belongs to.
///
/// # Example
///
/// ```
/// use huebridge_core::ThreadAffinity;
///
/// let affinity = ThreadAffinity::current();
/// assert!(affinity.is_same_thread());
///
/// let elsewhere = std::thread::spawn(move || affinity.is_same_thread())
///     .join()
///     .unwrap();
/// assert!(!elsewhere);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: std::thread::current().id(),
        }
    }

    /// The owning thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.owner
    }

    /// Returns `true` when called on the owning thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Panic with `what` unless called on the owning thread.
    #[inline]
    pub fn assert_same_thread(&self, what: &str) {
        if !self.is_same_thread() {
            wrong_thread(what, self.owner);
        }
    }

    /// [`assert_same_thread`](Self::assert_same_thread), in debug builds only.
    #[inline]
    pub fn debug_assert_same_thread(&self, what: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread(what);
        #[cfg(not(debug_assertions))]
        let _ = what;
    }
}

#[cold]
#[inline(never)]
fn wrong_thread(what: &str, owner: ThreadId) -> ! {
    let current = std::thread::current();
    panic!(
        "{what}: running on \"{}\" ({:?}), owned by {owner:?}; post UI work through UiHandle::post",
        current.name().unwrap_or("<unnamed>"),
        current.id(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread("same thread");
        assert_eq!(affinity.thread_id(), std::thread::current().id());
    }

    #[test]
    fn test_affinity_other_thread() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!result);
    }

    #[test]
    fn test_assert_panics_off_thread() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || affinity.assert_same_thread("ui only")).join();
        assert!(result.is_err());
    }
}
