//! Gamepad input primitives.
//!
//! Raw controller samples come in through a [`ControllerSource`] once per
//! poll. An [`EdgeDetector`] turns consecutive samples into discrete
//! pressed/released transitions, synthesizing digital stick directions from
//! the analog axes along the way. Consumers (shortcut dispatch, focus
//! navigation) each own their own detector and [`PollTimer`].

pub mod button;
pub mod edge;
pub mod poll;
pub mod snapshot;
pub mod stick;

pub use button::{ButtonIndex, ButtonSet};
pub use edge::{compute_edges, EdgeDetector, Edges};
pub use poll::PollTimer;
pub use snapshot::{ControllerIdentity, ControllerSnapshot, ControllerSource, ScriptedControllers};
pub use stick::{StickPolicy, StickThresholds};
