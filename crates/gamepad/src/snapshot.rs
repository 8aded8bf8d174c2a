//! Raw per-poll controller samples and the enumeration seam that provides them.

use crate::button::{ButtonIndex, ButtonSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Opaque controller model name, used as the profile key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerIdentity(Arc<str>);

impl ControllerIdentity {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControllerIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ControllerIdentity {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ControllerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ControllerIdentity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ControllerIdentity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// One sampled frame of a connected controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSnapshot {
    /// Slot index assigned by the platform; stable while connected.
    pub index: usize,
    pub identity: ControllerIdentity,
    /// Emulated device (e.g. on-screen touch controls). Excluded from
    /// profiles and from navigation.
    pub is_virtual: bool,
    /// Digital buttons currently down. Stick directions are never stored
    /// here; they are derived from `axes`.
    pub buttons: ButtonSet,
    /// Raw axis values in `[-1.0, 1.0]`: LX, LY, RX, RY.
    pub axes: SmallVec<[f32; 4]>,
}

impl ControllerSnapshot {
    pub fn new(index: usize, identity: impl Into<ControllerIdentity>) -> Self {
        Self {
            index,
            identity: identity.into(),
            is_virtual: false,
            buttons: ButtonSet::EMPTY,
            axes: SmallVec::from_elem(0.0, 4),
        }
    }

    pub fn virtual_device(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn with_buttons(mut self, buttons: impl IntoIterator<Item = ButtonIndex>) -> Self {
        self.buttons = buttons
            .into_iter()
            .filter(|button| !button.is_stick_direction())
            .collect();
        self
    }

    pub fn with_axis(mut self, axis: usize, value: f32) -> Self {
        if self.axes.len() <= axis {
            self.axes.resize(axis + 1, 0.0);
        }
        self.axes[axis] = value.clamp(-1.0, 1.0);
        self
    }

    /// Build from a standard-mapping pressed array, as delivered by most
    /// platform gamepad APIs.
    pub fn from_raw(
        index: usize,
        identity: impl Into<ControllerIdentity>,
        pressed: &[bool],
        axes: &[f32],
    ) -> Self {
        let buttons = ButtonIndex::ALL
            .iter()
            .copied()
            .filter(|button| {
                button
                    .raw_slot()
                    .and_then(|slot| pressed.get(slot).copied())
                    .unwrap_or(false)
            })
            .collect();

        Self {
            index,
            identity: identity.into(),
            is_virtual: false,
            buttons,
            axes: axes.iter().map(|v| v.clamp(-1.0, 1.0)).collect(),
        }
    }

    pub fn axis(&self, axis: usize) -> f32 {
        self.axes.get(axis).copied().unwrap_or(0.0)
    }
}

/// Enumerates the currently connected controllers.
pub trait ControllerSource {
    /// Snapshots of every connected controller, in any order.
    fn connected(&self) -> Vec<ControllerSnapshot>;
}

impl<F> ControllerSource for F
where
    F: Fn() -> Vec<ControllerSnapshot>,
{
    fn connected(&self) -> Vec<ControllerSnapshot> {
        self()
    }
}

/// Scripted source that replays a fixed list of frames, one per `advance`.
/// The last frame stays current once the script is exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedControllers {
    frames: Vec<Vec<ControllerSnapshot>>,
    cursor: usize,
}

impl ScriptedControllers {
    pub fn new(frames: Vec<Vec<ControllerSnapshot>>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn push_frame(&mut self, frame: Vec<ControllerSnapshot>) {
        self.frames.push(frame);
    }

    /// Move to the next frame. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn frame_index(&self) -> usize {
        self.cursor
    }
}

impl ControllerSource for ScriptedControllers {
    fn connected(&self) -> Vec<ControllerSnapshot> {
        self.frames.get(self.cursor).cloned().unwrap_or_default()
    }
}
