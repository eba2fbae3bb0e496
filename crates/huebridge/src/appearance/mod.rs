//! Styling for components outside the declarative tree.
//!
//! Alert presenters and document pickers are presented by the platform, not
//! mounted under the [`StyleRoot`](huebridge_style::StyleRoot). They read
//! their tint and scheme from a process-wide registry at presentation time,
//! which [`LegacyStyleBridge`] keeps in step with the resolved theme.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use huebridge::appearance::{
//!     AppearanceRegistry, LegacyStyleBridge, LegacyStyleTarget, ProcessAppearanceRegistry,
//! };
//! use huebridge_style::{Color, ColorScheme, ResolvedTheme};
//!
//! let registry = Arc::new(ProcessAppearanceRegistry::new());
//! let bridge = LegacyStyleBridge::new(registry.clone());
//!
//! bridge.apply_theme(&ResolvedTheme::new(Color::RED, ColorScheme::Dark));
//!
//! let style = registry.registration(LegacyStyleTarget::DocumentPicker).unwrap();
//! assert_eq!(style.scheme, ColorScheme::Dark);
//! ```

mod bridge;
mod registry;
mod target;

pub use bridge::LegacyStyleBridge;
pub use registry::{
    appearance_registry, init_appearance_registry, AppearanceRegistry, ProcessAppearanceRegistry,
};
pub use target::{LegacyStyleRegistration, LegacyStyleTarget};
