//! Platform light/dark scheme detection and monitoring.
//!
//! # Detection
//!
//! ```
//! use huebridge::platform::SystemTheme;
//!
//! match SystemTheme::color_scheme() {
//!     Some(scheme) => println!("platform scheme: {scheme}"),
//!     None => println!("platform scheme unknown"),
//! }
//! ```
//!
//! # Monitoring
//!
//! [`SystemAmbientScheme`] polls the platform from a background thread and
//! posts every change through a [`UiHandle`], so its subscribers only ever
//! run on the UI thread.
//!
//! # Platform Notes
//!
//! Detection goes through the `dark-light` crate when the `system-theme`
//! feature is enabled:
//! - **Windows**: `AppsUseLightTheme` registry key
//! - **macOS**: `AppleInterfaceStyle` user default
//! - **Linux**: XDG Desktop Portal `color-scheme` setting
//!
//! Without the feature the scheme is always unknown.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use huebridge_core::logging::targets;
use huebridge_core::{Property, Signal, Subscription, UiHandle};
use huebridge_style::ColorScheme;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::sources::{AmbientSchemeHandler, AmbientSchemeSource};

/// One-shot queries for the platform theme.
pub struct SystemTheme;

impl SystemTheme {
    /// The platform's current scheme, or `None` if it cannot be determined.
    #[cfg(feature = "system-theme")]
    pub fn color_scheme() -> Option<ColorScheme> {
        match dark_light::detect() {
            dark_light::Mode::Dark => Some(ColorScheme::Dark),
            dark_light::Mode::Light => Some(ColorScheme::Light),
            dark_light::Mode::Default => None,
        }
    }

    #[cfg(not(feature = "system-theme"))]
    pub fn color_scheme() -> Option<ColorScheme> {
        None
    }
}

type Detector = Arc<dyn Fn() -> Option<ColorScheme> + Send + Sync>;

struct Shared {
    scheme: Property<ColorScheme>,
    changed: Arc<Signal<ColorScheme>>,
    unknown: ColorScheme,
    detector: Detector,
}

impl Shared {
    fn detect(&self) -> ColorScheme {
        (self.detector)().unwrap_or(self.unknown)
    }

    fn apply(&self, scheme: ColorScheme) -> bool {
        let changed = self.scheme.set(scheme);
        if changed {
            tracing::info!(target: targets::SYSTEM_THEME, %scheme, "platform scheme changed");
            self.changed.emit(scheme);
        }
        changed
    }
}

struct Watcher {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

/// An [`AmbientSchemeSource`] backed by the platform.
///
/// The scheme is read once at construction. Call [`start`](Self::start) to
/// follow later changes, or [`refresh`](Self::refresh) to re-read on demand.
pub struct SystemAmbientScheme {
    shared: Arc<Shared>,
    watcher: Mutex<Option<Watcher>>,
}

impl SystemAmbientScheme {
    /// Read the platform scheme, reporting `unknown` when it cannot be determined.
    pub fn new(unknown: ColorScheme) -> Self {
        Self::with_detector(unknown, SystemTheme::color_scheme)
    }

    /// Use a custom detector in place of the platform query.
    pub fn with_detector<F>(unknown: ColorScheme, detector: F) -> Self
    where
        F: Fn() -> Option<ColorScheme> + Send + Sync + 'static,
    {
        let detector: Detector = Arc::new(detector);
        let initial = detector().unwrap_or(unknown);
        Self {
            shared: Arc::new(Shared {
                scheme: Property::new(initial),
                changed: Arc::new(Signal::new()),
                unknown,
                detector,
            }),
            watcher: Mutex::new(None),
        }
    }

    /// Re-read the platform now. Call on the UI thread.
    ///
    /// Returns `true` if the scheme changed.
    pub fn refresh(&self) -> bool {
        let scheme = self.shared.detect();
        self.shared.apply(scheme)
    }

    /// Start polling every `interval`, delivering changes through `ui`.
    ///
    /// Starting a running watcher does nothing.
    pub fn start(&self, ui: UiHandle, interval: Duration) -> Result<()> {
        let mut watcher = self.watcher.lock();
        if watcher.as_ref().is_some_and(|w| !w.thread.is_finished()) {
            return Ok(());
        }

        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let shared = Arc::clone(&self.shared);
        let thread = std::thread::Builder::new()
            .name("huebridge-scheme-watcher".into())
            .spawn(move || poll_loop(&shared, &ui, interval, &stop_rx))
            .map_err(Error::Watcher)?;

        tracing::debug!(
            target: targets::SYSTEM_THEME,
            interval_ms = interval.as_millis() as u64,
            "scheme watcher started"
        );
        *watcher = Some(Watcher { stop, thread });
        Ok(())
    }

    /// Stop polling and wait for the watcher thread to exit.
    pub fn stop(&self) {
        let Some(Watcher { stop, thread }) = self.watcher.lock().take() else {
            return;
        };
        drop(stop);
        if thread.join().is_err() {
            tracing::warn!(target: targets::SYSTEM_THEME, "scheme watcher thread panicked");
        } else {
            tracing::debug!(target: targets::SYSTEM_THEME, "scheme watcher stopped");
        }
    }

    /// Check if the watcher thread is running.
    pub fn is_running(&self) -> bool {
        self.watcher
            .lock()
            .as_ref()
            .is_some_and(|w| !w.thread.is_finished())
    }
}

fn poll_loop(
    shared: &Arc<Shared>,
    ui: &UiHandle,
    interval: Duration,
    stop: &crossbeam_channel::Receiver<()>,
) {
    let mut last_seen = shared.scheme.get();

    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let detected = shared.detect();
        if detected == last_seen {
            continue;
        }
        last_seen = detected;

        let target = Arc::clone(shared);
        if ui.post(move || {
            target.apply(detected);
        })
        .is_err()
        {
            tracing::debug!(
                target: targets::SYSTEM_THEME,
                "UI dispatcher gone, scheme watcher exiting"
            );
            return;
        }
    }
}

impl Drop for SystemAmbientScheme {
    fn drop(&mut self) {
        self.stop();
    }
}

impl AmbientSchemeSource for SystemAmbientScheme {
    fn ambient_scheme(&self) -> ColorScheme {
        self.shared.scheme.get()
    }

    fn on_ambient_scheme_change(&self, handler: AmbientSchemeHandler) -> Subscription {
        self.shared.changed.subscribe(move |&scheme| handler(scheme))
    }
}

impl std::fmt::Debug for SystemAmbientScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemAmbientScheme")
            .field("scheme", &self.shared.scheme.get())
            .field("unknown", &self.shared.unknown)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huebridge_core::UiDispatcher;
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::time::Instant;

    const UNKNOWN: u8 = 0;
    const LIGHT: u8 = 1;
    const DARK: u8 = 2;

    fn fake_platform(initial: u8) -> (Arc<AtomicU8>, impl Fn() -> Option<ColorScheme> + Send + Sync) {
        let state = Arc::new(AtomicU8::new(initial));
        let reader = state.clone();
        let detector = move || match reader.load(Ordering::SeqCst) {
            LIGHT => Some(ColorScheme::Light),
            DARK => Some(ColorScheme::Dark),
            _ => None,
        };
        (state, detector)
    }

    #[test]
    fn detection_does_not_panic() {
        let _scheme = SystemTheme::color_scheme();
        let source = SystemAmbientScheme::new(ColorScheme::Light);
        assert!(!source.is_running());
    }

    #[test]
    fn unknown_maps_to_configured_default() {
        let (_state, detector) = fake_platform(UNKNOWN);
        let source = SystemAmbientScheme::with_detector(ColorScheme::Dark, detector);
        assert_eq!(source.ambient_scheme(), ColorScheme::Dark);
    }

    #[test]
    fn refresh_emits_on_change() {
        let (state, detector) = fake_platform(LIGHT);
        let source = SystemAmbientScheme::with_detector(ColorScheme::Light, detector);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = source.on_ambient_scheme_change(Box::new(move |s| seen_clone.lock().push(s)));

        assert!(!source.refresh());
        state.store(DARK, Ordering::SeqCst);
        assert!(source.refresh());
        assert_eq!(*seen.lock(), vec![ColorScheme::Dark]);
    }

    #[test]
    fn watcher_delivers_on_ui_thread() {
        let dispatcher = UiDispatcher::new();
        let (state, detector) = fake_platform(LIGHT);
        let source = SystemAmbientScheme::with_detector(ColorScheme::Light, detector);

        let ui_thread = std::thread::current().id();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = source.on_ambient_scheme_change(Box::new(move |scheme| {
            assert_eq!(std::thread::current().id(), ui_thread);
            seen_clone.lock().push(scheme);
        }));

        source.start(dispatcher.handle(), Duration::from_millis(5)).unwrap();
        assert!(source.is_running());
        state.store(DARK, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(5);
        while seen.lock().is_empty() && Instant::now() < deadline {
            dispatcher.process_pending();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(*seen.lock(), vec![ColorScheme::Dark]);
        assert_eq!(source.ambient_scheme(), ColorScheme::Dark);

        source.stop();
        assert!(!source.is_running());
    }

    #[test]
    fn start_twice_is_noop() {
        let dispatcher = UiDispatcher::new();
        let (_state, detector) = fake_platform(LIGHT);
        let source = SystemAmbientScheme::with_detector(ColorScheme::Light, detector);

        source.start(dispatcher.handle(), Duration::from_millis(50)).unwrap();
        source.start(dispatcher.handle(), Duration::from_millis(50)).unwrap();
        assert!(source.is_running());
        drop(source);
    }
}
