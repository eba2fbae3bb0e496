//! Property system for huebridge.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it. Owners pair it with a [`Signal`](crate::Signal) and emit only
//! when `set` returns `true`, which is how repeated identical writes stay
//! invisible to observers.
//!
//! # Example
//!
//! ```
//! use huebridge_core::{Property, Signal};
//!
//! struct Accent {
//!     value: Property<u32>,
//!     value_changed: Signal<u32>,
//! }
//!
//! impl Accent {
//!     fn set(&self, rgb: u32) {
//!         if self.value.set(rgb) {
//!             self.value_changed.emit(rgb);
//!         }
//!     }
//! }
//!
//! let accent = Accent { value: Property::new(0x007AFF), value_changed: Signal::new() };
//! accent.set(0x5856D6);
//! assert_eq!(accent.value.get(), 0x5856D6);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
