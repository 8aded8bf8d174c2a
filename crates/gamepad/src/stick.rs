//! Analog stick to digital direction synthesis with hysteresis.

use crate::button::{ButtonIndex, ButtonSet};
use crate::snapshot::ControllerSnapshot;
use serde::{Deserialize, Serialize};

/// Enter/leave thresholds for a synthesized stick direction.
///
/// A direction turns on once the axis magnitude reaches `press` and stays on
/// until the magnitude drops below `release`. Keeping `release < press`
/// prevents chatter around a single cut-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickThresholds {
    pub press: f32,
    pub release: f32,
}

impl Default for StickThresholds {
    fn default() -> Self {
        Self {
            press: 0.5,
            release: 0.1,
        }
    }
}

impl StickThresholds {
    pub fn new(press: f32, release: f32) -> Self {
        Self { press, release }.sanitized()
    }

    /// Clamp into `0 < release <= press <= 1`.
    pub fn sanitized(self) -> Self {
        let press = self.press.clamp(f32::EPSILON, 1.0);
        let release = self.release.clamp(0.0, press);
        Self { press, release }
    }
}

/// When synthesized stick directions contribute to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickPolicy {
    /// Always add stick directions.
    #[default]
    Always,
    /// Only add stick directions while no d-pad button is held.
    WhenDpadIdle,
    /// Ignore the sticks entirely.
    Off,
}

/// Axis layout: (axis, negative direction, positive direction).
const AXES: [(usize, ButtonIndex, ButtonIndex); 4] = [
    (0, ButtonIndex::LeftStickLeft, ButtonIndex::LeftStickRight),
    (1, ButtonIndex::LeftStickUp, ButtonIndex::LeftStickDown),
    (2, ButtonIndex::RightStickLeft, ButtonIndex::RightStickRight),
    (3, ButtonIndex::RightStickUp, ButtonIndex::RightStickDown),
];

/// Synthesize stick directions for `snapshot`, given the directions that
/// were active on the previous frame.
pub fn synthesize(
    snapshot: &ControllerSnapshot,
    previous: &ButtonSet,
    thresholds: StickThresholds,
) -> ButtonSet {
    let mut out = ButtonSet::new();
    for (axis, negative, positive) in AXES {
        let value = snapshot.axis(axis);
        if let Some(button) = axis_direction(value, previous, negative, positive, thresholds) {
            out.insert(button);
        }
    }
    out
}

fn axis_direction(
    value: f32,
    previous: &ButtonSet,
    negative: ButtonIndex,
    positive: ButtonIndex,
    thresholds: StickThresholds,
) -> Option<ButtonIndex> {
    if value <= -thresholds.press {
        return Some(negative);
    }
    if value >= thresholds.press {
        return Some(positive);
    }
    if previous.contains(negative) && value < 0.0 && -value >= thresholds.release {
        return Some(negative);
    }
    if previous.contains(positive) && value > 0.0 && value >= thresholds.release {
        return Some(positive);
    }
    None
}

/// Map a synthesized left-stick direction onto the d-pad button it mimics.
pub fn as_dpad(button: ButtonIndex) -> ButtonIndex {
    match button {
        ButtonIndex::LeftStickUp => ButtonIndex::Up,
        ButtonIndex::LeftStickDown => ButtonIndex::Down,
        ButtonIndex::LeftStickLeft => ButtonIndex::Left,
        ButtonIndex::LeftStickRight => ButtonIndex::Right,
        other => other,
    }
}
