//! Inputs to the theme: stored preferences and the ambient scheme.
//!
//! The coordinator never reads a settings store or the platform directly. It
//! sees a [`PreferenceSource`] and an [`AmbientSchemeSource`], both of which
//! hand back a [`Subscription`] for change notification.

use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_core::{Property, Signal, Subscription};
use huebridge_style::{ColorScheme, SchemePreference};

use crate::config::{ThemeConfig, DEFAULT_SCHEME_KEY, DEFAULT_TINT_KEY};
use crate::file::Settings;

/// Which stored preference changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceChange {
    /// The raw tint value.
    Tint,
    /// The scheme preference.
    Scheme,
}

/// Handler invoked on preference changes.
pub type PreferenceHandler = Box<dyn Fn(PreferenceChange) + Send + Sync>;

/// Handler invoked on ambient scheme changes.
pub type AmbientSchemeHandler = Box<dyn Fn(ColorScheme) + Send + Sync>;

/// Read access to the persisted theme preference.
pub trait PreferenceSource: Send + Sync {
    /// The stored tint: a named token, a hex string, or anything else.
    fn tint_raw(&self) -> String;

    /// The stored scheme preference.
    fn scheme_preference(&self) -> SchemePreference;

    /// Call `handler` whenever either preference changes.
    fn on_preference_change(&self, handler: PreferenceHandler) -> Subscription;
}

/// The platform's current light/dark scheme.
pub trait AmbientSchemeSource: Send + Sync {
    /// The scheme right now.
    fn ambient_scheme(&self) -> ColorScheme;

    /// Call `handler` whenever the ambient scheme changes.
    fn on_ambient_scheme_change(&self, handler: AmbientSchemeHandler) -> Subscription;
}

// ============================================================================
// Settings-backed preferences
// ============================================================================

/// A [`PreferenceSource`] reading two keys of a [`Settings`] store.
///
/// A missing tint reads as `""`, which resolves to the fallback color. A
/// missing or unrecognized scheme reads as [`SchemePreference::System`].
#[derive(Debug, Clone)]
pub struct SettingsPreferences {
    settings: Arc<Settings>,
    tint_key: String,
    scheme_key: String,
}

impl SettingsPreferences {
    /// Read the default keys, `appearance.tint` and `appearance.color_scheme`.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_keys(settings, DEFAULT_TINT_KEY, DEFAULT_SCHEME_KEY)
    }

    /// Read custom keys.
    pub fn with_keys(
        settings: Arc<Settings>,
        tint_key: impl Into<String>,
        scheme_key: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            tint_key: normalize_key(&tint_key.into()),
            scheme_key: normalize_key(&scheme_key.into()),
        }
    }

    /// Read the keys named in `config`.
    pub fn from_config(settings: Arc<Settings>, config: &ThemeConfig) -> Self {
        Self::with_keys(settings, config.tint_key.as_str(), config.scheme_key.as_str())
    }

    /// The underlying store.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Key holding the tint.
    pub fn tint_key(&self) -> &str {
        &self.tint_key
    }

    /// Key holding the scheme preference.
    pub fn scheme_key(&self) -> &str {
        &self.scheme_key
    }
}

impl PreferenceSource for SettingsPreferences {
    fn tint_raw(&self) -> String {
        self.settings.get_str(&self.tint_key).unwrap_or_default()
    }

    fn scheme_preference(&self) -> SchemePreference {
        let Some(raw) = self.settings.get_str(&self.scheme_key) else {
            return SchemePreference::System;
        };
        raw.parse().unwrap_or_else(|err| {
            tracing::debug!(
                target: targets::SETTINGS,
                key = %self.scheme_key,
                error = %err,
                "unrecognized scheme preference, using system"
            );
            SchemePreference::System
        })
    }

    fn on_preference_change(&self, handler: PreferenceHandler) -> Subscription {
        let tint_key = self.tint_key.clone();
        let scheme_key = self.scheme_key.clone();

        self.settings.on_changed(move |key| {
            let key = normalize_key(key);
            if affects(&key, &tint_key) {
                handler(PreferenceChange::Tint);
            }
            if affects(&key, &scheme_key) {
                handler(PreferenceChange::Scheme);
            }
        })
    }
}

fn normalize_key(key: &str) -> String {
    key.split(['.', '/'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a write at `changed` can alter the value at `key`.
///
/// An empty path means the whole store changed. Writing a parent group
/// replaces everything below it.
fn affects(changed: &str, key: &str) -> bool {
    changed.is_empty()
        || changed == key
        || key
            .strip_prefix(changed)
            .is_some_and(|rest| rest.starts_with('.'))
}

// ============================================================================
// Host-driven ambient scheme
// ============================================================================

/// An [`AmbientSchemeSource`] the host updates explicitly.
///
/// Useful when the host's event loop already receives appearance
/// notifications, and in tests.
pub struct ManualAmbientScheme {
    scheme: Property<ColorScheme>,
    changed: Arc<Signal<ColorScheme>>,
}

impl ManualAmbientScheme {
    /// Start at `initial`.
    pub fn new(initial: ColorScheme) -> Self {
        Self {
            scheme: Property::new(initial),
            changed: Arc::new(Signal::new()),
        }
    }

    /// Report a new platform scheme. Subscribers hear about it only if it differs.
    pub fn set_scheme(&self, scheme: ColorScheme) -> bool {
        let changed = self.scheme.set(scheme);
        if changed {
            tracing::debug!(target: targets::SYSTEM_THEME, %scheme, "ambient scheme changed");
            self.changed.emit(scheme);
        }
        changed
    }
}

impl Default for ManualAmbientScheme {
    fn default() -> Self {
        Self::new(ColorScheme::Light)
    }
}

impl AmbientSchemeSource for ManualAmbientScheme {
    fn ambient_scheme(&self) -> ColorScheme {
        self.scheme.get()
    }

    fn on_ambient_scheme_change(&self, handler: AmbientSchemeHandler) -> Subscription {
        self.changed.subscribe(move |&scheme| handler(scheme))
    }
}

impl std::fmt::Debug for ManualAmbientScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualAmbientScheme")
            .field("scheme", &self.scheme.get())
            .finish()
    }
}
