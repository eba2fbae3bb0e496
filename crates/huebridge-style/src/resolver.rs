//! Resolution of raw preference values into a concrete theme.
//!
//! Tint precedence, first match wins:
//!
//! 1. An exact named token from the [`TintCatalog`]
//! 2. A valid hex string
//! 3. The resolver's fallback color
//!
//! Scheme resolution lets an explicit `Light`/`Dark` preference override the
//! ambient scheme; `System` takes the ambient scheme as-is. Every input has a
//! defined output.

use std::fmt;
use std::sync::Arc;

use huebridge_core::logging::targets;

use crate::catalog::{BuiltinTints, NamedTint, TintCatalog};
use crate::color::Color;
use crate::scheme::{ColorScheme, SchemePreference};

/// The color used when a stored tint is neither a token nor valid hex.
pub const DEFAULT_FALLBACK_TINT: Color = NamedTint::Blue.color();

/// A fully concrete theme: one tint color and one scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTheme {
    /// The accent/tint color.
    pub color: Color,
    /// The light/dark scheme.
    pub scheme: ColorScheme,
}

impl ResolvedTheme {
    /// Create a resolved theme.
    pub const fn new(color: Color, scheme: ColorScheme) -> Self {
        Self { color, scheme }
    }

    /// Same color, different scheme.
    pub fn with_scheme(self, scheme: ColorScheme) -> Self {
        Self { scheme, ..self }
    }

    /// Same scheme, different color.
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.color, self.scheme)
    }
}

/// Which rule produced a resolved tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TintSource {
    /// Matched a catalog token.
    Named(Color),
    /// Parsed as hex.
    Hex(Color),
    /// Neither matched.
    Fallback(Color),
}

impl TintSource {
    /// The color regardless of how it was found.
    pub fn color(self) -> Color {
        match self {
            TintSource::Named(color) | TintSource::Hex(color) | TintSource::Fallback(color) => color,
        }
    }
}

/// Turns raw preference values into a [`ResolvedTheme`].
///
/// Stateless apart from its configuration; cheap to clone.
#[derive(Clone)]
pub struct ThemeResolver {
    catalog: Arc<dyn TintCatalog>,
    fallback: Color,
}

impl ThemeResolver {
    /// Create a resolver over a token catalog, using [`DEFAULT_FALLBACK_TINT`].
    pub fn new(catalog: Arc<dyn TintCatalog>) -> Self {
        Self {
            catalog,
            fallback: DEFAULT_FALLBACK_TINT,
        }
    }

    /// A resolver over [`BuiltinTints`].
    pub fn builtin() -> Self {
        Self::new(Arc::new(BuiltinTints))
    }

    /// Replace the fallback color.
    pub fn with_fallback(mut self, fallback: Color) -> Self {
        self.fallback = fallback;
        self
    }

    /// The color used when nothing else matches.
    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Resolve both halves of the theme.
    pub fn resolve(
        &self,
        tint_raw: &str,
        scheme_pref: SchemePreference,
        ambient: ColorScheme,
    ) -> ResolvedTheme {
        ResolvedTheme {
            color: self.resolve_color(tint_raw),
            scheme: self.resolve_scheme(scheme_pref, ambient),
        }
    }

    /// Resolve only the tint color.
    pub fn resolve_color(&self, tint_raw: &str) -> Color {
        let source = self.tint_source(tint_raw);
        if let TintSource::Fallback(color) = source {
            tracing::debug!(
                target: targets::RESOLVER,
                tint = tint_raw,
                fallback = %color,
                "tint is neither a named token nor hex, using fallback"
            );
        }
        source.color()
    }

    /// Resolve only the scheme.
    pub fn resolve_scheme(&self, scheme_pref: SchemePreference, ambient: ColorScheme) -> ColorScheme {
        scheme_pref.resolve(ambient)
    }

    /// Report which precedence rule a raw tint falls under.
    pub fn tint_source(&self, tint_raw: &str) -> TintSource {
        if let Some(color) = self.catalog.color_of(tint_raw) {
            TintSource::Named(color)
        } else if let Some(color) = Color::from_hex(tint_raw) {
            TintSource::Hex(color)
        } else {
            TintSource::Fallback(self.fallback)
        }
    }
}

impl Default for ThemeResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
