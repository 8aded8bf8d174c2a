//! Controller shortcut profiles and their dispatch.
//!
//! The crate focuses on *data* handling: binding gamepad buttons to
//! [`ShortcutAction`]s per controller identity, persisting those bindings as
//! a single JSON blob, and firing the bound actions exactly once per press.
//!
//! # Example
//!
//! ```
//! use gamepad::{ButtonIndex, ControllerIdentity, ControllerSnapshot};
//! use keymap::{ActionHandlers, ProfileStore, ShortcutAction, ShortcutDispatcher};
//!
//! let mut store = ProfileStore::builder().build();
//! let pad = ControllerIdentity::from("Pad-X");
//! store
//!     .set_action(&pad, ButtonIndex::A, Some(ShortcutAction::StreamScreenshotCapture))
//!     .unwrap();
//!
//! let mut handlers =
//!     ActionHandlers::new().with(ShortcutAction::StreamScreenshotCapture, || {});
//! let mut dispatcher = ShortcutDispatcher::default();
//!
//! let frame = vec![ControllerSnapshot::new(0, "Pad-X").with_buttons([ButtonIndex::A])];
//! let report = dispatcher.poll(&frame, &store, &mut handlers);
//! assert_eq!(report.fired.len(), 1);
//! ```

pub mod action;
pub mod binding;
pub mod dispatcher;
pub mod error;
pub mod storage;
pub mod store;

pub use action::{ActionCategory, ShortcutAction};
pub use binding::{ProfileBindings, ProfileTable};
pub use dispatcher::{ActionHandlers, DispatchReport, FiredAction, ShortcutDispatcher};
pub use error::KeymapError;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{ProfileStore, ProfileStoreBuilder, DEFAULT_STORAGE_KEY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
