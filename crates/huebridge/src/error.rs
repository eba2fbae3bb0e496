//! Error types for huebridge.
//!
//! Theme resolution and propagation never fail. Errors only come from the
//! ambient layers: reading configuration, persisting settings, and starting
//! the platform scheme watcher.

use std::path::PathBuf;

use huebridge_core::DispatchError;

/// Result type alias for huebridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in huebridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file was not valid JSON.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A settings or config document was not valid TOML.
    #[error("invalid TOML in {}: {source}", origin(.path))]
    TomlParse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be rendered as TOML.
    #[error("failed to serialize settings as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration parsed but is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ambient scheme watcher thread could not be started.
    #[error("failed to start ambient scheme watcher: {0}")]
    Watcher(#[source] std::io::Error),

    /// The process appearance registry was read before it was initialized.
    #[error("appearance registry not initialized; call init_appearance_registry() first")]
    RegistryNotInitialized,

    /// Work could not be marshalled onto the UI thread.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("'{}'", path.display()),
        None => "inline document".to_string(),
    }
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
