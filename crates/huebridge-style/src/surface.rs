//! The declarative side of the theme.
//!
//! Components that take part in the reactive style system observe a
//! [`StyleRoot`]. Whatever drives the theme pushes resolved values into it
//! through the [`DeclarativeSurface`] trait, which is also the seam tests use
//! to observe applications.

use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_core::{Property, Signal, Subscription};

use crate::color::Color;
use crate::environment::BASELINE_TINT;
use crate::resolver::ResolvedTheme;
use crate::scheme::ColorScheme;

/// Something that renders with the resolved theme.
pub trait DeclarativeSurface: Send + Sync {
    /// Apply a resolved theme to the surface.
    fn apply_theme(&self, theme: &ResolvedTheme);
}

/// Root of the declarative tree's theme state.
pub struct StyleRoot {
    theme: Property<ResolvedTheme>,
    theme_changed: Arc<Signal<ResolvedTheme>>,
}

impl Default for StyleRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRoot {
    /// Create a root showing [`BASELINE_TINT`] in the light scheme.
    pub fn new() -> Self {
        Self::with_theme(ResolvedTheme::new(BASELINE_TINT, ColorScheme::Light))
    }

    /// Create a root with an initial theme.
    pub fn with_theme(theme: ResolvedTheme) -> Self {
        Self {
            theme: Property::new(theme),
            theme_changed: Arc::new(Signal::new()),
        }
    }

    /// The current theme.
    pub fn theme(&self) -> ResolvedTheme {
        self.theme.get()
    }

    /// The current tint.
    pub fn tint(&self) -> Color {
        self.theme.with(|theme| theme.color)
    }

    /// The current scheme.
    pub fn scheme(&self) -> ColorScheme {
        self.theme.with(|theme| theme.scheme)
    }

    /// Signal emitted when the theme changes.
    pub fn theme_changed(&self) -> &Signal<ResolvedTheme> {
        &self.theme_changed
    }

    /// Subscribe to theme changes.
    pub fn on_theme_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ResolvedTheme) + Send + Sync + 'static,
    {
        self.theme_changed.subscribe(handler)
    }
}

impl DeclarativeSurface for StyleRoot {
    fn apply_theme(&self, theme: &ResolvedTheme) {
        if self.theme.set(*theme) {
            tracing::trace!(target: targets::STYLE_ROOT, theme = %theme, "style root restyled");
            self.theme_changed.emit(*theme);
        }
    }
}

impl std::fmt::Debug for StyleRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRoot")
            .field("theme", &self.theme())
            .finish()
    }
}
