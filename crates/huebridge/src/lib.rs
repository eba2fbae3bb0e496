//! # huebridge
//!
//! One app-wide tint color and light/dark scheme, kept consistent across two
//! very different styling surfaces:
//!
//! - **Declarative components** observe a [`StyleRoot`] and read the tint
//!   through a [`TintReader`] handed down the tree.
//! - **Legacy system components** (alert presenters, document pickers) are
//!   presented outside that tree and pick their style up from a process-wide
//!   [appearance registry](appearance) at presentation time.
//!
//! The [`ThemeCoordinator`] reads the stored preference and the platform
//! scheme, resolves them with a [`ThemeResolver`], and applies the result to
//! both surfaces whenever either input changes. [`ThemeRuntime`] wires the
//! production pieces together.
//!
//! # Quick Start
//!
//! ```no_run
//! use huebridge::prelude::*;
//!
//! let runtime = ThemeRuntime::open("my-app", ThemeConfig::default())?;
//! runtime.start()?;
//!
//! runtime.settings().set("appearance.tint", "indigo");
//! assert_eq!(runtime.style_root().tint(), NamedTint::Indigo.color());
//! # Ok::<(), huebridge::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! - `system-theme` (default): detect the platform scheme with `dark-light`.
//!   Without it the platform scheme is always reported as
//!   [`ThemeConfig::unknown_ambient`].

pub mod appearance;
pub mod config;
pub mod coordinator;
mod error;
pub mod file;
pub mod platform;
pub mod runtime;
pub mod sources;

pub use config::{ThemeConfig, DEFAULT_SCHEME_KEY, DEFAULT_TINT_KEY};
pub use coordinator::{CoordinatorState, ThemeCoordinator, ThemeCoordinatorBuilder};
pub use error::{Error, Result};
pub use runtime::ThemeRuntime;
pub use sources::{
    AmbientSchemeSource, ManualAmbientScheme, PreferenceChange, PreferenceSource,
    SettingsPreferences,
};

pub use huebridge_core::{Subscription, UiDispatcher, UiHandle};
pub use huebridge_style::{
    Color, ColorScheme, DeclarativeSurface, NamedTint, ResolvedTheme, SchemePreference, StyleRoot,
    ThemeResolver, TintEnvironment, TintReader,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::appearance::{
        AppearanceRegistry, LegacyStyleBridge, LegacyStyleTarget, ProcessAppearanceRegistry,
    };
    pub use crate::file::Settings;
    pub use crate::{
        AmbientSchemeSource, ManualAmbientScheme, PreferenceSource, SettingsPreferences,
        ThemeConfig, ThemeCoordinator, ThemeRuntime,
    };
    pub use huebridge_style::prelude::*;
}

static_assertions::assert_impl_all!(ThemeCoordinator: Send, Sync);
static_assertions::assert_impl_all!(file::Settings: Send, Sync);
static_assertions::assert_impl_all!(appearance::ProcessAppearanceRegistry: Send, Sync);
static_assertions::assert_impl_all!(platform::SystemAmbientScheme: Send, Sync);
