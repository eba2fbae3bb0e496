//! Platform integration.

mod system_theme;

pub use system_theme::{SystemAmbientScheme, SystemTheme};
