//! Gamepad and keyboard focus navigation for a tabbed settings dialog.
//!
//! The dialog is seen through the [`FocusTree`] capability trait: a tab
//! strip whose entries select one visible tab group, groups made of
//! containers, containers made of focusable controls. [`navigator`] holds
//! the pure traversal rules and [`NavigationController`] runs a session on
//! top of them, polling controllers at a fixed interval.

pub mod controller;
pub mod navigator;
pub mod settings_tree;
pub mod tree;

pub use controller::{NavCommand, NavKey, NavigationController, SessionConfig, SessionEvent};
pub use navigator::{move_focus, region, Direction, FocusRegion, NavigatorConfig};
pub use settings_tree::SettingsTree;
pub use tree::{ControlKind, FocusTree, NodeId};
