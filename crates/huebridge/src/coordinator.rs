//! Theme coordination.
//!
//! The [`ThemeCoordinator`] is the only component that writes the resolved
//! theme anywhere. While attached it listens to the preference source and
//! the ambient scheme source, re-resolves the half of the theme that an
//! event can affect, and when the result differs from its cache applies it
//! to every surface in a fixed order:
//!
//! 1. The declarative surface
//! 2. The tint environment
//! 3. The legacy style bridge (every target)
//!
//! # Threading
//!
//! All resolution and application happens on the UI thread. Notifications
//! that arrive on another thread are posted through the coordinator's
//! [`UiHandle`] and handled when the host next drains its dispatcher. A
//! coordinator without a handle drops such notifications with a warning.
//!
//! A notification raised by one of the surfaces while a theme is being
//! applied (an observer of the style root that edits a preference, say) is
//! queued and handled once the current application has reached every
//! surface, so no surface is ever left on an older theme.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use huebridge::appearance::{LegacyStyleBridge, ProcessAppearanceRegistry};
//! use huebridge::file::Settings;
//! use huebridge::{ManualAmbientScheme, SettingsPreferences, ThemeCoordinator};
//! use huebridge_style::{ColorScheme, NamedTint, StyleRoot};
//!
//! let settings = Arc::new(Settings::new());
//! settings.set("appearance.tint", "indigo");
//!
//! let ambient = Arc::new(ManualAmbientScheme::new(ColorScheme::Light));
//! let root = Arc::new(StyleRoot::new());
//! let registry = Arc::new(ProcessAppearanceRegistry::new());
//!
//! let coordinator = ThemeCoordinator::builder(
//!     Arc::new(SettingsPreferences::new(settings.clone())),
//!     ambient.clone(),
//!     root.clone(),
//!     LegacyStyleBridge::new(registry),
//! )
//! .build();
//!
//! coordinator.attach();
//! assert_eq!(root.tint(), NamedTint::Indigo.color());
//!
//! ambient.set_scheme(ColorScheme::Dark);
//! assert_eq!(root.scheme(), ColorScheme::Dark);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use huebridge_core::logging::{span_names, targets};
use huebridge_core::{Subscription, ThreadAffinity, UiHandle};
use huebridge_style::{
    ColorScheme, DeclarativeSurface, ResolvedTheme, ThemeResolver, TintEnvironment, TintReader,
};
use parking_lot::Mutex;

use crate::appearance::LegacyStyleBridge;
use crate::sources::{AmbientSchemeSource, PreferenceChange, PreferenceSource};

/// Lifecycle state of a [`ThemeCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    /// Not listening; nothing propagates.
    #[default]
    Detached,
    /// Subscribed to both sources with a cached theme.
    Attached,
}

#[derive(Debug, Clone, Copy)]
enum ThemeEvent {
    Preference(PreferenceChange),
    Ambient(ColorScheme),
}

struct Inner {
    preferences: Arc<dyn PreferenceSource>,
    ambient: Arc<dyn AmbientSchemeSource>,
    surface: Arc<dyn DeclarativeSurface>,
    bridge: LegacyStyleBridge,
    resolver: ThemeResolver,
    environment: TintEnvironment,
    dispatcher: Option<UiHandle>,
    affinity: ThreadAffinity,
    attached: AtomicBool,
    /// Bumped on every attach and detach; events carry the value they were
    /// subscribed under and are ignored once it moves on.
    generation: AtomicU64,
    cache: Mutex<Option<ResolvedTheme>>,
    /// Set while a theme is being pushed to the surfaces.
    applying: AtomicBool,
    /// Events raised while `applying` was set, with their generation.
    pending: Mutex<VecDeque<(u64, ThemeEvent)>>,
    subscriptions: Mutex<Vec<Subscription>>,
    applications: AtomicU64,
}

impl Inner {
    fn on_ui_thread(&self) -> bool {
        match &self.dispatcher {
            Some(ui) => ui.is_ui_thread(),
            None => self.affinity.is_same_thread(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn resolve_all(&self) -> ResolvedTheme {
        self.resolver.resolve(
            &self.preferences.tint_raw(),
            self.preferences.scheme_preference(),
            self.ambient.ambient_scheme(),
        )
    }

    fn apply(&self, theme: &ResolvedTheme) {
        let _span = tracing::debug_span!(span_names::APPLY_THEME, theme = %theme).entered();

        self.surface.apply_theme(theme);
        self.environment.set(theme.color);
        self.bridge.apply_theme(theme);

        self.applications.fetch_add(1, Ordering::SeqCst);
    }

    /// Apply `theme`, then handle anything the surfaces raised meanwhile.
    fn apply_exclusive(&self, theme: &ResolvedTheme) {
        if self.applying.swap(true, Ordering::SeqCst) {
            // Attached from inside an application; the outer drain picks up
            // whatever follows.
            self.apply(theme);
            return;
        }
        let _applying = ApplyingGuard(&self.applying);
        self.apply(theme);
        self.drain_pending();
    }

    fn next_pending(&self) -> Option<(u64, ThemeEvent)> {
        self.pending.lock().pop_front()
    }

    fn drain_pending(&self) {
        while let Some((generation, event)) = self.next_pending() {
            self.process(generation, event);
        }
    }

    /// Route an event from a source subscription to [`handle`](Self::handle)
    /// on the UI thread.
    fn deliver(this: &Weak<Self>, generation: u64, event: ThemeEvent) {
        let Some(inner) = this.upgrade() else {
            return;
        };
        if !inner.is_current(generation) {
            return;
        }

        if inner.on_ui_thread() {
            inner.handle(generation, event);
            return;
        }

        let Some(ui) = &inner.dispatcher else {
            tracing::warn!(
                target: targets::COORDINATOR,
                ?event,
                "theme event arrived off the UI thread with no dispatcher, dropping it"
            );
            return;
        };

        let weak = Weak::clone(this);
        let posted = ui.post(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle(generation, event);
            }
        });
        if let Err(err) = posted {
            tracing::warn!(
                target: targets::COORDINATOR,
                ?event,
                error = %err,
                "could not marshal theme event onto the UI thread"
            );
        }
    }

    fn handle(&self, generation: u64, event: ThemeEvent) {
        self.pending.lock().push_back((generation, event));
        if self.applying.swap(true, Ordering::SeqCst) {
            tracing::trace!(
                target: targets::COORDINATOR,
                ?event,
                "event raised during an application, queued"
            );
            return;
        }
        let _applying = ApplyingGuard(&self.applying);
        self.drain_pending();
    }

    fn process(&self, generation: u64, event: ThemeEvent) {
        if !self.is_current(generation) {
            tracing::trace!(target: targets::COORDINATOR, ?event, "ignoring event from a previous attachment");
            return;
        }

        let next = {
            let mut cache = self.cache.lock();
            let Some(current) = *cache else {
                return;
            };

            let next = match event {
                ThemeEvent::Preference(PreferenceChange::Tint) => {
                    current.with_color(self.resolver.resolve_color(&self.preferences.tint_raw()))
                }
                ThemeEvent::Preference(PreferenceChange::Scheme) => current.with_scheme(
                    self.resolver
                        .resolve_scheme(self.preferences.scheme_preference(), self.ambient.ambient_scheme()),
                ),
                ThemeEvent::Ambient(ambient) => current.with_scheme(
                    self.resolver
                        .resolve_scheme(self.preferences.scheme_preference(), ambient),
                ),
            };

            if next == current {
                tracing::debug!(
                    target: targets::COORDINATOR,
                    ?event,
                    theme = %current,
                    "theme unchanged, skipping re-application"
                );
                return;
            }
            *cache = Some(next);
            next
        };

        tracing::debug!(target: targets::COORDINATOR, ?event, theme = %next, "re-applying theme");
        self.apply(&next);
    }

    fn attach(this: &Arc<Self>) {
        if this.attached.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: targets::COORDINATOR, "already attached");
            return;
        }

        let _span = tracing::info_span!(span_names::ATTACH).entered();
        let generation = this.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let theme = this.resolve_all();
        *this.cache.lock() = Some(theme);

        let weak = Arc::downgrade(this);
        let preference_sub = {
            let weak = weak.clone();
            this.preferences.on_preference_change(Box::new(move |change| {
                Inner::deliver(&weak, generation, ThemeEvent::Preference(change));
            }))
        };
        let ambient_sub = this.ambient.on_ambient_scheme_change(Box::new(move |scheme| {
            Inner::deliver(&weak, generation, ThemeEvent::Ambient(scheme));
        }));

        let stale = std::mem::replace(
            &mut *this.subscriptions.lock(),
            vec![preference_sub, ambient_sub],
        );
        drop(stale);

        this.apply_exclusive(&theme);
        tracing::info!(target: targets::COORDINATOR, theme = %theme, "theme coordinator attached");
    }
}

/// Clears the applying flag when an application ends, even by unwinding.
struct ApplyingGuard<'a>(&'a AtomicBool);

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Keeps the declarative tree, the tint environment, and the legacy
/// appearance registry on one resolved theme.
pub struct ThemeCoordinator {
    inner: Arc<Inner>,
}

impl ThemeCoordinator {
    /// Start building a coordinator over its two sources and two sinks.
    pub fn builder(
        preferences: Arc<dyn PreferenceSource>,
        ambient: Arc<dyn AmbientSchemeSource>,
        surface: Arc<dyn DeclarativeSurface>,
        bridge: LegacyStyleBridge,
    ) -> ThemeCoordinatorBuilder {
        ThemeCoordinatorBuilder {
            preferences,
            ambient,
            surface,
            bridge,
            resolver: None,
            environment: None,
            dispatcher: None,
        }
    }

    /// Resolve the current inputs, apply them everywhere, and start listening.
    ///
    /// Attaching an attached coordinator does nothing. Called off the UI
    /// thread, the attach is posted to the dispatcher and takes effect at
    /// its next drain; without a dispatcher it is refused with a warning.
    pub fn attach(&self) {
        let Some(ui) = &self.inner.dispatcher else {
            if !self.inner.affinity.is_same_thread() {
                tracing::warn!(
                    target: targets::COORDINATOR,
                    "attach called off the UI thread with no dispatcher, ignoring"
                );
                return;
            }
            Inner::attach(&self.inner);
            return;
        };

        let weak = Arc::downgrade(&self.inner);
        let attached = ui.run_or_post(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::attach(&inner);
            }
        });
        if let Err(err) = attached {
            tracing::warn!(
                target: targets::COORDINATOR,
                error = %err,
                "could not marshal attach onto the UI thread"
            );
        }
    }

    /// Stop listening. Nothing propagates until the next [`attach`](Self::attach).
    pub fn detach(&self) {
        let inner = &self.inner;
        if !inner.attached.swap(false, Ordering::SeqCst) {
            return;
        }

        inner.generation.fetch_add(1, Ordering::SeqCst);
        inner.pending.lock().clear();
        let subscriptions = std::mem::take(&mut *inner.subscriptions.lock());
        drop(subscriptions);

        tracing::info!(target: targets::COORDINATOR, "theme coordinator detached");
    }

    /// Returns `true` while attached.
    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::SeqCst)
    }

    /// The current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        if self.is_attached() {
            CoordinatorState::Attached
        } else {
            CoordinatorState::Detached
        }
    }

    /// The last theme applied, if the coordinator has ever attached.
    ///
    /// After a detach this is the theme that was in effect at the time.
    pub fn current_theme(&self) -> Option<ResolvedTheme> {
        *self.inner.cache.lock()
    }

    /// A reader for the tint environment this coordinator writes.
    pub fn tint_reader(&self) -> TintReader {
        self.inner.environment.reader()
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &ThemeResolver {
        &self.inner.resolver
    }

    /// Number of times a theme has been applied to the surfaces.
    pub fn application_count(&self) -> u64 {
        self.inner.applications.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ThemeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCoordinator")
            .field("state", &self.state())
            .field("theme", &self.current_theme())
            .field("applications", &self.application_count())
            .finish()
    }
}

/// Builder for [`ThemeCoordinator`].
pub struct ThemeCoordinatorBuilder {
    preferences: Arc<dyn PreferenceSource>,
    ambient: Arc<dyn AmbientSchemeSource>,
    surface: Arc<dyn DeclarativeSurface>,
    bridge: LegacyStyleBridge,
    resolver: Option<ThemeResolver>,
    environment: Option<TintEnvironment>,
    dispatcher: Option<UiHandle>,
}

impl ThemeCoordinatorBuilder {
    /// Resolve with `resolver` instead of the builtin one.
    pub fn resolver(mut self, resolver: ThemeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Write to `environment` instead of a fresh one.
    pub fn environment(mut self, environment: TintEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Marshal off-thread notifications through `ui`.
    pub fn dispatcher(mut self, ui: UiHandle) -> Self {
        self.dispatcher = Some(ui);
        self
    }

    /// Build a detached coordinator bound to the calling thread.
    pub fn build(self) -> ThemeCoordinator {
        ThemeCoordinator {
            inner: Arc::new(Inner {
                preferences: self.preferences,
                ambient: self.ambient,
                surface: self.surface,
                bridge: self.bridge,
                resolver: self.resolver.unwrap_or_default(),
                environment: self.environment.unwrap_or_default(),
                dispatcher: self.dispatcher,
                affinity: ThreadAffinity::current(),
                attached: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                cache: Mutex::new(None),
                applying: AtomicBool::new(false),
                pending: Mutex::new(VecDeque::new()),
                subscriptions: Mutex::new(Vec::new()),
                applications: AtomicU64::new(0),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{
        AppearanceRegistry, LegacyStyleRegistration, LegacyStyleTarget, ProcessAppearanceRegistry,
    };
    use crate::file::Settings;
    use crate::sources::{ManualAmbientScheme, SettingsPreferences};
    use huebridge_style::{Color, StyleRoot, DEFAULT_FALLBACK_TINT};

    struct Fixture {
        settings: Arc<Settings>,
        ambient: Arc<ManualAmbientScheme>,
        root: Arc<StyleRoot>,
        registry: Arc<ProcessAppearanceRegistry>,
        coordinator: ThemeCoordinator,
    }

    fn fixture(tint: &str, scheme: &str, ambient: ColorScheme) -> Fixture {
        let settings = Arc::new(Settings::new());
        settings.set("appearance.tint", tint);
        settings.set("appearance.color_scheme", scheme);

        let ambient = Arc::new(ManualAmbientScheme::new(ambient));
        let root = Arc::new(StyleRoot::new());
        let registry = Arc::new(ProcessAppearanceRegistry::new());

        let coordinator = ThemeCoordinator::builder(
            Arc::new(SettingsPreferences::new(settings.clone())),
            ambient.clone(),
            root.clone(),
            LegacyStyleBridge::new(registry.clone()),
        )
        .build();

        Fixture {
            settings,
            ambient,
            root,
            registry,
            coordinator,
        }
    }

    #[test]
    fn starts_detached() {
        let f = fixture("indigo", "system", ColorScheme::Light);
        assert_eq!(f.coordinator.state(), CoordinatorState::Detached);
        assert_eq!(f.coordinator.current_theme(), None);
        assert_eq!(f.coordinator.application_count(), 0);
        assert!(!f.coordinator.tint_reader().is_populated());
    }

    #[test]
    fn attach_applies_everywhere() {
        let f = fixture("#FF0000", "dark", ColorScheme::Light);
        f.coordinator.attach();

        let expected = ResolvedTheme::new(Color::RED, ColorScheme::Dark);
        assert_eq!(f.coordinator.state(), CoordinatorState::Attached);
        assert_eq!(f.coordinator.current_theme(), Some(expected));
        assert_eq!(f.root.theme(), expected);
        assert_eq!(f.coordinator.tint_reader().get(), Color::RED);
        for target in LegacyStyleTarget::ALL {
            assert_eq!(f.registry.registration(target), Some(LegacyStyleRegistration::from(expected)));
        }
        assert_eq!(f.coordinator.application_count(), 1);
    }

    #[test]
    fn second_attach_is_noop() {
        let f = fixture("indigo", "system", ColorScheme::Light);
        f.coordinator.attach();
        f.coordinator.attach();
        assert_eq!(f.coordinator.application_count(), 1);
        assert_eq!(f.registry.write_count(), 2);
    }

    #[test]
    fn unchanged_result_is_not_reapplied() {
        let f = fixture("indigo", "dark", ColorScheme::Light);
        f.coordinator.attach();

        // Explicit dark wins, so the ambient flip resolves to the same scheme.
        f.ambient.set_scheme(ColorScheme::Dark);
        f.settings.set("appearance.tint", "#5856D6");

        assert_eq!(f.coordinator.application_count(), 1);
    }

    #[test]
    fn unknown_tint_uses_fallback() {
        let f = fixture("ocean", "system", ColorScheme::Dark);
        f.coordinator.attach();
        assert_eq!(
            f.coordinator.current_theme(),
            Some(ResolvedTheme::new(DEFAULT_FALLBACK_TINT, ColorScheme::Dark))
        );
    }

    #[test]
    fn detach_stops_propagation() {
        let f = fixture("indigo", "system", ColorScheme::Light);
        f.coordinator.attach();
        f.coordinator.detach();
        f.coordinator.detach();

        f.ambient.set_scheme(ColorScheme::Dark);
        f.settings.set("appearance.tint", "red");

        assert_eq!(f.coordinator.state(), CoordinatorState::Detached);
        assert_eq!(f.root.scheme(), ColorScheme::Light);
        assert_eq!(f.coordinator.application_count(), 1);
    }

    #[test]
    fn reattach_picks_up_current_inputs() {
        let f = fixture("indigo", "system", ColorScheme::Light);
        f.coordinator.attach();
        f.coordinator.detach();
        f.settings.set("appearance.tint", "red");
        f.coordinator.attach();

        assert_eq!(f.root.tint(), huebridge_style::NamedTint::Red.color());
        assert_eq!(f.coordinator.application_count(), 2);
    }
}
