//! Error types for the core runtime.

/// Errors raised when marshalling work onto the UI thread.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The [`UiDispatcher`](crate::UiDispatcher) that owned the queue has been dropped.
    #[error("UI dispatcher has been dropped; the job was discarded")]
    Disconnected,
}
