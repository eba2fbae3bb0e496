//! Logging facilities for huebridge.
//!
//! huebridge uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("huebridge=debug")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`] below so a subsystem
//! can be filtered on its own.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "huebridge_core::signal";
    /// UI-thread dispatch target.
    pub const DISPATCH: &str = "huebridge_core::dispatch";
    /// Tint and scheme resolution target.
    pub const RESOLVER: &str = "huebridge_style::resolver";
    /// Tint environment channel target.
    pub const ENVIRONMENT: &str = "huebridge_style::environment";
    /// Declarative style root target.
    pub const STYLE_ROOT: &str = "huebridge_style::surface";
    /// Legacy appearance registry target.
    pub const APPEARANCE: &str = "huebridge::appearance";
    /// Theme coordinator target.
    pub const COORDINATOR: &str = "huebridge::coordinator";
    /// Preference store target.
    pub const SETTINGS: &str = "huebridge::settings";
    /// Platform ambient scheme target.
    pub const SYSTEM_THEME: &str = "huebridge::system_theme";
}

/// Span names used for coarse-grained tracing of theme propagation.
pub mod span_names {
    /// One full application of a resolved theme to every surface.
    pub const APPLY_THEME: &str = "huebridge::apply_theme";
    /// Attaching a coordinator to its sources.
    pub const ATTACH: &str = "huebridge::attach";
}
