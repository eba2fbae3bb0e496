use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_style::{Color, ColorScheme, ResolvedTheme};

use super::registry::AppearanceRegistry;
use super::target::{LegacyStyleRegistration, LegacyStyleTarget};

/// Drives the appearance registry from resolved themes.
///
/// The only writer of legacy registrations. Every target always receives the
/// same values.
#[derive(Clone)]
pub struct LegacyStyleBridge {
    registry: Arc<dyn AppearanceRegistry>,
}

impl LegacyStyleBridge {
    /// Create a bridge writing to `registry`.
    pub fn new(registry: Arc<dyn AppearanceRegistry>) -> Self {
        Self { registry }
    }

    /// The registry being written.
    pub fn registry(&self) -> &Arc<dyn AppearanceRegistry> {
        &self.registry
    }

    /// Overwrite the registration for one target. Always writes.
    pub fn apply(&self, target: LegacyStyleTarget, color: Color, scheme: ColorScheme) {
        tracing::trace!(target: targets::APPEARANCE, %target, %color, %scheme, "applying legacy style");
        self.registry
            .register(target, LegacyStyleRegistration::new(color, scheme));
    }

    /// Apply `theme` to every target, in [`LegacyStyleTarget::ALL`] order.
    pub fn apply_theme(&self, theme: &ResolvedTheme) {
        for target in LegacyStyleTarget::ALL {
            self.apply(target, theme.color, theme.scheme);
        }
    }
}

impl std::fmt::Debug for LegacyStyleBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyStyleBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::ProcessAppearanceRegistry;

    #[test]
    fn apply_theme_covers_every_target() {
        let registry = Arc::new(ProcessAppearanceRegistry::new());
        let bridge = LegacyStyleBridge::new(registry.clone());
        let theme = ResolvedTheme::new(Color::GREEN, ColorScheme::Dark);

        bridge.apply_theme(&theme);

        for target in LegacyStyleTarget::ALL {
            assert_eq!(registry.registration(target), Some(LegacyStyleRegistration::from(theme)));
        }
        assert_eq!(registry.write_count(), 2);
    }

    #[test]
    fn repeated_apply_still_writes() {
        let registry = Arc::new(ProcessAppearanceRegistry::new());
        let bridge = LegacyStyleBridge::new(registry.clone());

        bridge.apply(LegacyStyleTarget::AlertPresenter, Color::RED, ColorScheme::Light);
        bridge.apply(LegacyStyleTarget::AlertPresenter, Color::RED, ColorScheme::Light);

        assert_eq!(registry.write_count(), 2);
        assert_eq!(
            registry.registration(LegacyStyleTarget::AlertPresenter),
            Some(LegacyStyleRegistration::new(Color::RED, ColorScheme::Light))
        );
    }
}
