//! The tree-scoped tint channel.
//!
//! A [`TintEnvironment`] is created for a subtree and handed to whoever
//! drives the theme; it is the only writer. Descendants receive
//! [`TintReader`]s, threaded through construction like any other context
//! value. A reader that was never connected to an environment reports
//! [`BASELINE_TINT`], so isolated subtrees render with a sane accent.
//!
//! Consumers read the tint from here rather than from any platform accent
//! accessor; this channel is always consistent with the resolved theme.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_core::{Property, Signal, Subscription};

use crate::catalog::NamedTint;
use crate::color::Color;

/// The tint a reader reports before any theme has been written.
///
/// Kept separate from the resolver's fallback so the two can be tuned
/// independently.
pub const BASELINE_TINT: Color = NamedTint::Blue.color();

struct TintSlot {
    value: Property<Color>,
    populated: AtomicBool,
    changed: Arc<Signal<Color>>,
}

/// Write side of the tint channel. Not `Clone`: ownership is the write capability.
pub struct TintEnvironment {
    slot: Arc<TintSlot>,
    baseline: Color,
}

impl Default for TintEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TintEnvironment {
    /// Create an environment seeded with [`BASELINE_TINT`].
    pub fn new() -> Self {
        Self::with_baseline(BASELINE_TINT)
    }

    /// Create an environment seeded with a custom baseline.
    pub fn with_baseline(baseline: Color) -> Self {
        Self {
            slot: Arc::new(TintSlot {
                value: Property::new(baseline),
                populated: AtomicBool::new(false),
                changed: Arc::new(Signal::new()),
            }),
            baseline,
        }
    }

    /// Hand out a read-only view for a descendant.
    pub fn reader(&self) -> TintReader {
        TintReader {
            slot: Some(self.slot.clone()),
            baseline: self.baseline,
        }
    }

    /// Publish a new tint.
    ///
    /// Returns `true` if the value changed; readers are notified only then.
    pub fn set(&self, color: Color) -> bool {
        self.slot.populated.store(true, Ordering::SeqCst);
        let changed = self.slot.value.set(color);
        if changed {
            tracing::trace!(target: targets::ENVIRONMENT, tint = %color, "tint environment updated");
            self.slot.changed.emit(color);
        }
        changed
    }

    /// The current tint.
    pub fn get(&self) -> Color {
        self.slot.value.get()
    }
}

impl std::fmt::Debug for TintEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TintEnvironment")
            .field("tint", &self.get())
            .field("baseline", &self.baseline)
            .finish()
    }
}

/// Read side of the tint channel.
#[derive(Clone)]
pub struct TintReader {
    slot: Option<Arc<TintSlot>>,
    baseline: Color,
}

impl Default for TintReader {
    fn default() -> Self {
        Self::detached()
    }
}

impl TintReader {
    /// A reader with no environment behind it; always reports [`BASELINE_TINT`].
    pub fn detached() -> Self {
        Self {
            slot: None,
            baseline: BASELINE_TINT,
        }
    }

    /// The current tint.
    pub fn get(&self) -> Color {
        match &self.slot {
            Some(slot) => slot.value.get(),
            None => self.baseline,
        }
    }

    /// Returns `true` once the owning environment has been written at least once.
    pub fn is_populated(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|slot| slot.populated.load(Ordering::SeqCst))
    }

    /// Call `handler` whenever the tint changes.
    ///
    /// A detached reader never changes, so it returns an empty subscription.
    pub fn on_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Color) + Send + Sync + 'static,
    {
        match &self.slot {
            Some(slot) => slot.changed.subscribe(move |&color| handler(color)),
            None => Subscription::empty(),
        }
    }
}

impl std::fmt::Debug for TintReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TintReader")
            .field("tint", &self.get())
            .field("attached", &self.slot.is_some())
            .finish()
    }
}
