//! Edge detection over consecutive controller frames.
//!
//! The detector keeps exactly one generation of history per controller
//! index: the set of buttons that were down on the previous poll. Each
//! [`EdgeDetector::advance`] call compares the new frame against that set
//! and then replaces it, so a button held for many polls produces a single
//! pressed edge and, once let go, a single released edge.
//!
//! The guide button is reserved for the platform and never appears in the
//! pressed or released sets.

use crate::button::{ButtonIndex, ButtonSet};
use crate::snapshot::ControllerSnapshot;
use crate::stick::{self, StickPolicy, StickThresholds};
use std::collections::HashMap;
use tracing::trace;

/// Transitions between two consecutive frames of one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    /// Down now, up on the previous frame. Never contains Home.
    pub pressed: ButtonSet,
    /// Up now, down on the previous frame. Never contains Home.
    pub released: ButtonSet,
    /// Everything down this frame, Home included.
    pub held: ButtonSet,
    /// Any non-Home button is down this frame.
    pub other_pressed: bool,
    pub home_held: bool,
}

impl Edges {
    pub fn is_pressed(&self, button: ButtonIndex) -> bool {
        self.pressed.contains(button)
    }

    pub fn is_released(&self, button: ButtonIndex) -> bool {
        self.released.contains(button)
    }
}

/// Compute the edges between two pressed-sets.
pub fn compute_edges(previous: &ButtonSet, current: &ButtonSet) -> Edges {
    let held = *current;
    let without_home = current.without(ButtonIndex::Home);
    Edges {
        pressed: without_home.difference(previous),
        released: previous.without(ButtonIndex::Home).difference(current),
        held,
        other_pressed: !without_home.is_empty(),
        home_held: held.contains(ButtonIndex::Home),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameState {
    previous: ButtonSet,
    sticks: ButtonSet,
}

/// Per-controller frame cache. Owned by whichever loop consumes the edges,
/// so independent consumers never share history.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    thresholds: StickThresholds,
    policy: StickPolicy,
    frames: HashMap<usize, FrameState>,
}

impl EdgeDetector {
    pub fn new(thresholds: StickThresholds, policy: StickPolicy) -> Self {
        Self {
            thresholds: thresholds.sanitized(),
            policy,
            frames: HashMap::new(),
        }
    }

    pub fn thresholds(&self) -> StickThresholds {
        self.thresholds
    }

    pub fn policy(&self) -> StickPolicy {
        self.policy
    }

    /// Fold a new snapshot into the cache and return its edges.
    pub fn advance(&mut self, snapshot: &ControllerSnapshot) -> Edges {
        let state = self.frames.entry(snapshot.index).or_default();

        let sticks = stick::synthesize(snapshot, &state.sticks, self.thresholds);
        let dpad_held = snapshot.buttons.iter().any(ButtonIndex::is_dpad);
        let current = match self.policy {
            StickPolicy::Always => snapshot.buttons.union(&sticks),
            StickPolicy::WhenDpadIdle if !dpad_held => snapshot.buttons.union(&sticks),
            StickPolicy::WhenDpadIdle | StickPolicy::Off => snapshot.buttons,
        };

        let edges = compute_edges(&state.previous, &current);
        state.previous = current;
        state.sticks = sticks;

        if !edges.pressed.is_empty() || !edges.released.is_empty() {
            trace!(
                controller = snapshot.index,
                pressed = ?edges.pressed.iter().collect::<Vec<_>>(),
                released = ?edges.released.iter().collect::<Vec<_>>(),
                "controller edges"
            );
        }
        edges
    }

    /// Fold a raw pressed-set (no sticks) into the cache.
    pub fn advance_raw(&mut self, index: usize, current: ButtonSet) -> Edges {
        let state = self.frames.entry(index).or_default();
        let edges = compute_edges(&state.previous, &current);
        state.previous = current;
        edges
    }

    /// The buttons recorded as down on the last poll.
    pub fn previous(&self, index: usize) -> ButtonSet {
        self.frames
            .get(&index)
            .map(|state| state.previous)
            .unwrap_or_default()
    }

    /// Forget a single controller, e.g. on disconnect.
    pub fn reset(&mut self, index: usize) {
        self.frames.remove(&index);
    }

    /// Drop every controller whose index is not in `connected`.
    pub fn retain(&mut self, connected: impl IntoIterator<Item = usize>) {
        let keep: Vec<usize> = connected.into_iter().collect();
        self.frames.retain(|index, _| keep.contains(index));
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
