//! Production wiring.
//!
//! [`ThemeRuntime`] assembles the pieces an application needs: a settings
//! store, a UI dispatcher, the platform scheme watcher, a [`StyleRoot`], and
//! the process appearance registry, all driven by one [`ThemeCoordinator`].
//! Create it on the UI thread and drain it from the event loop.
//!
//! ```no_run
//! use huebridge::{ThemeConfig, ThemeRuntime};
//!
//! let runtime = ThemeRuntime::open("my-app", ThemeConfig::default())?;
//! runtime.start()?;
//!
//! loop {
//!     // ...process window events...
//!     runtime.process_pending();
//! #   break;
//! }
//! # Ok::<(), huebridge::Error>(())
//! ```

use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_core::{UiDispatcher, UiHandle};
use huebridge_style::{StyleRoot, TintReader};

use crate::appearance::{init_appearance_registry, LegacyStyleBridge, ProcessAppearanceRegistry};
use crate::config::ThemeConfig;
use crate::coordinator::ThemeCoordinator;
use crate::error::Result;
use crate::file::{Settings, SettingsFormat};
use crate::platform::SystemAmbientScheme;
use crate::sources::SettingsPreferences;

/// Everything needed to keep an application's theme in sync.
pub struct ThemeRuntime {
    config: ThemeConfig,
    settings: Arc<Settings>,
    dispatcher: UiDispatcher,
    ambient: Arc<SystemAmbientScheme>,
    root: Arc<StyleRoot>,
    registry: Arc<ProcessAppearanceRegistry>,
    coordinator: ThemeCoordinator,
}

impl ThemeRuntime {
    /// Use the settings file in the platform config directory for `app`.
    ///
    /// The file is read if it exists, and every later change is saved back
    /// to it.
    pub fn open(app: &str, config: ThemeConfig) -> Result<Self> {
        let settings = match ThemeConfig::default_settings_path(app) {
            Some(path) => {
                let settings = if path.exists() {
                    Settings::load(&path)?
                } else {
                    Settings::new()
                };
                settings.set_auto_save(&path, SettingsFormat::from_path(&path));
                tracing::debug!(
                    target: targets::SETTINGS,
                    path = %path.display(),
                    "using settings file"
                );
                settings
            }
            None => {
                tracing::warn!(
                    target: targets::SETTINGS,
                    "no config directory on this platform, settings will not persist"
                );
                Settings::new()
            }
        };
        Self::new(config, Arc::new(settings))
    }

    /// Wire up around an existing settings store, using the process
    /// appearance registry.
    pub fn new(config: ThemeConfig, settings: Arc<Settings>) -> Result<Self> {
        let registry = init_appearance_registry();
        let ambient = SystemAmbientScheme::new(config.unknown_ambient);
        Self::from_parts(config, settings, registry, ambient)
    }

    /// Wire up from explicit parts.
    pub fn from_parts(
        config: ThemeConfig,
        settings: Arc<Settings>,
        registry: Arc<ProcessAppearanceRegistry>,
        ambient: SystemAmbientScheme,
    ) -> Result<Self> {
        config.validate()?;

        let dispatcher = UiDispatcher::new();
        let ambient = Arc::new(ambient);
        let root = Arc::new(StyleRoot::new());

        let coordinator = ThemeCoordinator::builder(
            Arc::new(SettingsPreferences::from_config(settings.clone(), &config)),
            ambient.clone(),
            root.clone(),
            LegacyStyleBridge::new(registry.clone()),
        )
        .resolver(config.resolver())
        .environment(config.tint_environment())
        .dispatcher(dispatcher.handle())
        .build();

        Ok(Self {
            config,
            settings,
            dispatcher,
            ambient,
            root,
            registry,
            coordinator,
        })
    }

    /// Apply the current theme and start following changes.
    ///
    /// If the platform watcher cannot be started the coordinator is detached
    /// again before the error is returned.
    pub fn start(&self) -> Result<()> {
        self.attach_then(|| {
            self.ambient
                .start(self.dispatcher.handle(), self.config.poll_interval())
        })
    }

    fn attach_then(&self, start_watcher: impl FnOnce() -> Result<()>) -> Result<()> {
        self.coordinator.attach();
        start_watcher().inspect_err(|err| {
            tracing::warn!(
                target: targets::SYSTEM_THEME,
                error = %err,
                "scheme watcher failed to start, detaching"
            );
            self.coordinator.detach();
        })
    }

    /// Stop following changes. The last applied theme stays in place.
    pub fn stop(&self) {
        self.ambient.stop();
        self.coordinator.detach();
    }

    /// Run queued work on the UI thread. Call from the event loop.
    pub fn process_pending(&self) -> usize {
        self.dispatcher.process_pending()
    }

    /// A handle for posting work to the UI thread.
    pub fn ui_handle(&self) -> UiHandle {
        self.dispatcher.handle()
    }

    /// The configuration in use.
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// The settings store preferences are read from.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// The declarative tree's style root.
    pub fn style_root(&self) -> &Arc<StyleRoot> {
        &self.root
    }

    /// The appearance registry legacy components read from.
    pub fn registry(&self) -> &Arc<ProcessAppearanceRegistry> {
        &self.registry
    }

    /// The platform scheme source.
    pub fn ambient(&self) -> &Arc<SystemAmbientScheme> {
        &self.ambient
    }

    /// The coordinator.
    pub fn coordinator(&self) -> &ThemeCoordinator {
        &self.coordinator
    }

    /// A reader for the tint environment, to hand to descendants.
    pub fn tint_reader(&self) -> TintReader {
        self.coordinator.tint_reader()
    }
}

impl Drop for ThemeRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ThemeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeRuntime")
            .field("coordinator", &self.coordinator)
            .field("ambient", &self.ambient)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
