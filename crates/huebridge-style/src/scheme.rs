//! Light/dark color schemes and the user's scheme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseSchemeError;

/// A concrete light/dark display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl ColorScheme {
    /// Returns true if this is the dark color scheme.
    pub fn is_dark(self) -> bool {
        matches!(self, ColorScheme::Dark)
    }

    /// Returns true if this is the light color scheme.
    pub fn is_light(self) -> bool {
        matches!(self, ColorScheme::Light)
    }

    /// The lowercase name used in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(ParseSchemeError::new(s, "light, dark")),
        }
    }
}

/// The user's stored scheme choice.
///
/// `System` defers to the platform's ambient scheme; the other two override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemePreference {
    /// Follow the platform.
    #[default]
    System,
    /// Always light.
    Light,
    /// Always dark.
    Dark,
}

impl SchemePreference {
    /// The scheme this preference forces, if any.
    pub fn explicit(self) -> Option<ColorScheme> {
        match self {
            SchemePreference::System => None,
            SchemePreference::Light => Some(ColorScheme::Light),
            SchemePreference::Dark => Some(ColorScheme::Dark),
        }
    }

    /// Resolve against the ambient scheme. An explicit choice always wins.
    pub fn resolve(self, ambient: ColorScheme) -> ColorScheme {
        self.explicit().unwrap_or(ambient)
    }

    /// The lowercase name used in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemePreference::System => "system",
            SchemePreference::Light => "light",
            SchemePreference::Dark => "dark",
        }
    }
}

impl fmt::Display for SchemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemePreference {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(SchemePreference::System),
            "light" => Ok(SchemePreference::Light),
            "dark" => Ok(SchemePreference::Dark),
            _ => Err(ParseSchemeError::new(s, "system, light, dark")),
        }
    }
}

impl From<ColorScheme> for SchemePreference {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => SchemePreference::Light,
            ColorScheme::Dark => SchemePreference::Dark,
        }
    }
}
