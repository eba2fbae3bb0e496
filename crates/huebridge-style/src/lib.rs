//! Tint and color-scheme resolution for huebridge.
//!
//! This crate holds the pieces of the theme that are pure values or live
//! inside the declarative tree:
//!
//! - **Color**: RGBA color with hex parsing and formatting
//! - **Schemes**: The light/dark scheme and the user's scheme preference
//! - **Tint catalog**: Named accent tokens and their colors
//! - **Resolver**: Raw preference values to a concrete [`ResolvedTheme`]
//! - **Environment**: The tree-scoped tint channel read by descendants
//! - **Surface**: The declarative style root that receives resolved themes
//!
//! # Example
//!
//! ```
//! use huebridge_style::prelude::*;
//!
//! let resolver = ThemeResolver::builtin();
//! let theme = resolver.resolve("#FF0000", SchemePreference::Light, ColorScheme::Dark);
//!
//! assert_eq!(theme.color, Color::RED);
//! assert_eq!(theme.scheme, ColorScheme::Light);
//! ```

pub mod catalog;
pub mod color;
pub mod environment;
pub mod resolver;
pub mod scheme;
pub mod surface;

mod error;

pub use catalog::{BuiltinTints, NamedTint, TintCatalog};
pub use color::Color;
pub use environment::{TintEnvironment, TintReader, BASELINE_TINT};
pub use error::{ParseColorError, ParseSchemeError};
pub use resolver::{ResolvedTheme, ThemeResolver, TintSource, DEFAULT_FALLBACK_TINT};
pub use scheme::{ColorScheme, SchemePreference};
pub use surface::{DeclarativeSurface, StyleRoot};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::catalog::{BuiltinTints, NamedTint, TintCatalog};
    pub use crate::color::Color;
    pub use crate::environment::{TintEnvironment, TintReader};
    pub use crate::resolver::{ResolvedTheme, ThemeResolver};
    pub use crate::scheme::{ColorScheme, SchemePreference};
    pub use crate::surface::{DeclarativeSurface, StyleRoot};
}
