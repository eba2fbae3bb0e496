//! Core runtime for huebridge.
//!
//! This crate provides the small reactive runtime the theming layers are
//! built on:
//!
//! - **Signal/Slot System**: Synchronous, type-safe change notification
//! - **Subscriptions**: RAII handles that disconnect a slot when dropped
//! - **Property System**: Change-detecting value cells
//! - **Thread Affinity**: Owning-thread checks for UI-only state
//! - **UI Dispatcher**: Marshals work posted from background threads onto the UI thread
//!
//! # Signal Example
//!
//! ```
//! use huebridge_core::Signal;
//!
//! let scheme_changed = Signal::<bool>::new();
//!
//! let conn_id = scheme_changed.connect(|dark| {
//!     println!("dark mode: {}", dark);
//! });
//!
//! scheme_changed.emit(true);
//! scheme_changed.disconnect(conn_id);
//! ```
//!
//! # Dispatcher Example
//!
//! ```
//! use huebridge_core::UiDispatcher;
//!
//! let dispatcher = UiDispatcher::new();
//! let handle = dispatcher.handle();
//!
//! std::thread::spawn(move || {
//!     handle.post(|| println!("runs on the UI thread")).ok();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(dispatcher.process_pending(), 1);
//! ```

mod dispatch;
mod error;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;

pub use dispatch::{UiDispatcher, UiHandle};
pub use error::DispatchError;
pub use property::Property;
pub use signal::{ConnectionId, Signal, Subscription};
pub use thread_check::ThreadAffinity;

static_assertions::assert_impl_all!(Signal<u32>: Send, Sync);
static_assertions::assert_impl_all!(Property<u32>: Send, Sync);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
static_assertions::assert_impl_all!(UiHandle: Send, Sync, Clone);
