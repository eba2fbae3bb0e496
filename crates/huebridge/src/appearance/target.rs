use std::fmt;

use huebridge_style::{Color, ColorScheme, ResolvedTheme};

/// A system-provided component styled through the appearance registry.
///
/// These are presented outside the declarative tree, so they never see the
/// [`StyleRoot`](huebridge_style::StyleRoot) and must be styled up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegacyStyleTarget {
    /// Modal alert dialogs.
    AlertPresenter,
    /// File open/save pickers.
    DocumentPicker,
}

impl LegacyStyleTarget {
    /// Every target, in the order the bridge applies them.
    pub const ALL: [LegacyStyleTarget; 2] = [
        LegacyStyleTarget::AlertPresenter,
        LegacyStyleTarget::DocumentPicker,
    ];

    /// Stable identifier the registry is keyed by.
    pub const fn identifier(self) -> &'static str {
        match self {
            LegacyStyleTarget::AlertPresenter => "alert-presenter",
            LegacyStyleTarget::DocumentPicker => "document-picker",
        }
    }

    /// Look a target up by identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|target| target.identifier() == identifier)
    }
}

impl fmt::Display for LegacyStyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// The style a target is presented with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyStyleRegistration {
    /// Tint applied to the component.
    pub color: Color,
    /// Scheme the component is forced into.
    pub scheme: ColorScheme,
}

impl LegacyStyleRegistration {
    /// Create a registration.
    pub const fn new(color: Color, scheme: ColorScheme) -> Self {
        Self { color, scheme }
    }
}

impl From<ResolvedTheme> for LegacyStyleRegistration {
    fn from(theme: ResolvedTheme) -> Self {
        Self::new(theme.color, theme.scheme)
    }
}

impl fmt::Display for LegacyStyleRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.color, self.scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert_eq!(LegacyStyleTarget::AlertPresenter.identifier(), "alert-presenter");
        assert_eq!(LegacyStyleTarget::DocumentPicker.to_string(), "document-picker");
        assert_eq!(
            LegacyStyleTarget::from_identifier("document-picker"),
            Some(LegacyStyleTarget::DocumentPicker)
        );
        assert_eq!(LegacyStyleTarget::from_identifier("share-sheet"), None);
    }

    #[test]
    fn registration_from_theme() {
        let theme = ResolvedTheme::new(Color::RED, ColorScheme::Dark);
        let registration = LegacyStyleRegistration::from(theme);
        assert_eq!(registration, LegacyStyleRegistration::new(Color::RED, ColorScheme::Dark));
    }
}
