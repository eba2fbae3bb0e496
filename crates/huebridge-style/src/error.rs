//! Error types for parsing theme values.

/// A string could not be parsed as a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color '{input}': expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError {
    input: String,
}

impl ParseColorError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A string did not name a color scheme or scheme preference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color scheme '{input}': expected one of {expected}")]
pub struct ParseSchemeError {
    input: String,
    expected: &'static str,
}

impl ParseSchemeError {
    pub(crate) fn new(input: impl Into<String>, expected: &'static str) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}
