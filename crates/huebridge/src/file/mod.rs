//! File-backed stores.
//!
//! [`Settings`] is the key-value store preferences are persisted in. It is
//! usable on its own; the theme layer consumes it through
//! [`SettingsPreferences`](crate::SettingsPreferences).

mod settings;

pub use settings::{Settings, SettingsFormat, SettingsValue};
