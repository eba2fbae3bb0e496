//! Theme configuration.
//!
//! Configuration is loaded from TOML. Every field is optional; missing
//! fields take the defaults below.
//!
//! ```toml
//! fallback_tint = "#007AFF"
//! baseline_tint = "#007AFF"
//! tint_key = "appearance.tint"
//! scheme_key = "appearance.color_scheme"
//! unknown_ambient = "light"
//! poll_interval_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use huebridge_style::{
    Color, ColorScheme, TintEnvironment, ThemeResolver, BASELINE_TINT, DEFAULT_FALLBACK_TINT,
};

use crate::error::{Error, Result};

/// Default settings key for the stored tint.
pub const DEFAULT_TINT_KEY: &str = "appearance.tint";
/// Default settings key for the stored scheme preference.
pub const DEFAULT_SCHEME_KEY: &str = "appearance.color_scheme";

/// Tunables for resolving and propagating the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Color used when the stored tint is neither a token nor hex.
    pub fallback_tint: Color,
    /// Color the tint environment reports before it is first written.
    pub baseline_tint: Color,
    /// Settings key holding the raw tint.
    pub tint_key: String,
    /// Settings key holding the scheme preference.
    pub scheme_key: String,
    /// Scheme assumed when the platform cannot report one.
    pub unknown_ambient: ColorScheme,
    /// How often the platform scheme is polled, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fallback_tint: DEFAULT_FALLBACK_TINT,
            baseline_tint: BASELINE_TINT,
            tint_key: DEFAULT_TINT_KEY.to_string(),
            scheme_key: DEFAULT_SCHEME_KEY.to_string(),
            unknown_ambient: ColorScheme::Light,
            poll_interval_ms: 500,
        }
    }
}

impl ThemeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|source| Error::TomlParse {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = toml::from_str(&source).map_err(|source| Error::TomlParse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.tint_key.trim().is_empty() {
            return Err(Error::invalid_config("tint_key must not be empty"));
        }
        if self.scheme_key.trim().is_empty() {
            return Err(Error::invalid_config("scheme_key must not be empty"));
        }
        if self.tint_key == self.scheme_key {
            return Err(Error::invalid_config(format!(
                "tint_key and scheme_key must differ (both are '{}')",
                self.tint_key
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::invalid_config("poll_interval_ms must be greater than zero"));
        }
        Ok(())
    }

    /// The platform poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// A builtin-catalog resolver using this config's fallback.
    pub fn resolver(&self) -> ThemeResolver {
        ThemeResolver::builtin().with_fallback(self.fallback_tint)
    }

    /// A tint environment seeded with this config's baseline.
    pub fn tint_environment(&self) -> TintEnvironment {
        TintEnvironment::with_baseline(self.baseline_tint)
    }

    /// Where an application named `app` keeps its settings file, if the
    /// platform has a config directory.
    pub fn default_settings_path(app: &str) -> Option<PathBuf> {
        ProjectDirs::from("", "", app).map(|dirs| dirs.config_dir().join("settings.toml"))
    }
}
