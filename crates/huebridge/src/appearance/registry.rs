//! The process-wide appearance registry.
//!
//! Presentation machinery for legacy components looks its style up here when
//! an instance is shown. Entries are last-write-wins with no history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use huebridge_core::logging::targets;
use huebridge_core::{Signal, Subscription, ThreadAffinity};
use parking_lot::RwLock;

use super::target::{LegacyStyleRegistration, LegacyStyleTarget};
use crate::error::{Error, Result};

/// Storage for per-target registrations.
///
/// Implemented by [`ProcessAppearanceRegistry`] in production; tests supply
/// recording fakes.
pub trait AppearanceRegistry: Send + Sync {
    /// Overwrite the registration for `target`.
    fn register(&self, target: LegacyStyleTarget, registration: LegacyStyleRegistration);

    /// The registration a newly presented `target` would pick up.
    fn registration(&self, target: LegacyStyleTarget) -> Option<LegacyStyleRegistration>;
}

/// The production registry.
///
/// Writes must happen on the thread that created it; this is checked in
/// debug builds. Reads are allowed from anywhere.
pub struct ProcessAppearanceRegistry {
    entries: RwLock<HashMap<LegacyStyleTarget, LegacyStyleRegistration>>,
    registration_changed: Arc<Signal<(LegacyStyleTarget, LegacyStyleRegistration)>>,
    writes: AtomicU64,
    affinity: ThreadAffinity,
}

impl Default for ProcessAppearanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessAppearanceRegistry {
    /// Create an empty registry owned by the calling thread.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            registration_changed: Arc::new(Signal::new()),
            writes: AtomicU64::new(0),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Signal emitted when a target's registration actually changes.
    ///
    /// Rewriting the current value counts as a write but does not emit.
    pub fn registration_changed(&self) -> &Signal<(LegacyStyleTarget, LegacyStyleRegistration)> {
        &self.registration_changed
    }

    /// Subscribe to registration changes.
    pub fn on_registration_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(LegacyStyleTarget, LegacyStyleRegistration) + Send + Sync + 'static,
    {
        self.registration_changed
            .subscribe(move |&(target, registration)| handler(target, registration))
    }

    /// Total number of writes, including ones that changed nothing.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Every current registration, in [`LegacyStyleTarget::ALL`] order.
    pub fn snapshot(&self) -> Vec<(LegacyStyleTarget, LegacyStyleRegistration)> {
        let entries = self.entries.read();
        LegacyStyleTarget::ALL
            .into_iter()
            .filter_map(|target| entries.get(&target).map(|reg| (target, *reg)))
            .collect()
    }

    /// The thread writes are expected on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }
}

impl AppearanceRegistry for ProcessAppearanceRegistry {
    fn register(&self, target: LegacyStyleTarget, registration: LegacyStyleRegistration) {
        self.affinity
            .debug_assert_same_thread("appearance registry written off the UI thread");

        self.writes.fetch_add(1, Ordering::SeqCst);
        let previous = self.entries.write().insert(target, registration);

        if previous != Some(registration) {
            tracing::debug!(
                target: targets::APPEARANCE,
                %target,
                %registration,
                "appearance registration updated"
            );
            self.registration_changed.emit((target, registration));
        }
    }

    fn registration(&self, target: LegacyStyleTarget) -> Option<LegacyStyleRegistration> {
        self.entries.read().get(&target).copied()
    }
}

impl std::fmt::Debug for ProcessAppearanceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessAppearanceRegistry")
            .field("entries", &self.snapshot())
            .field("writes", &self.write_count())
            .finish()
    }
}

static APPEARANCE_REGISTRY: OnceLock<Arc<ProcessAppearanceRegistry>> = OnceLock::new();

/// Initialize the process appearance registry, owned by the calling thread.
///
/// Call this once on the UI thread during startup. Later calls return the
/// existing registry.
pub fn init_appearance_registry() -> Arc<ProcessAppearanceRegistry> {
    APPEARANCE_REGISTRY
        .get_or_init(|| {
            tracing::debug!(target: targets::APPEARANCE, "process appearance registry initialized");
            Arc::new(ProcessAppearanceRegistry::new())
        })
        .clone()
}

/// Get the process appearance registry.
///
/// Returns an error if [`init_appearance_registry`] has not been called.
pub fn appearance_registry() -> Result<Arc<ProcessAppearanceRegistry>> {
    APPEARANCE_REGISTRY
        .get()
        .cloned()
        .ok_or(Error::RegistryNotInitialized)
}
