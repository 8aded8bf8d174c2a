//! Shortcut actions that a controller button can be bound to.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Grouping shown on selection surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ActionCategory {
    Stream,
    Device,
    Screen,
}

/// Parameterless action fired by a bound button.
///
/// The wire id (`stream-screenshot-capture`, ...) is what gets persisted; it
/// must stay stable across releases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ShortcutAction {
    StreamScreenshotCapture,
    StreamMenuToggle,
    StreamStatsToggle,
    StreamSoundToggle,
    StreamMicrophoneToggle,
    StreamVolumeInc,
    StreamVolumeDec,
    DeviceVolumeInc,
    DeviceVolumeDec,
    ScreenBrightnessInc,
    ScreenBrightnessDec,
}

impl ShortcutAction {
    /// Stable persisted identifier.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Parse a persisted identifier. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    pub fn category(self) -> ActionCategory {
        match self {
            ShortcutAction::DeviceVolumeInc | ShortcutAction::DeviceVolumeDec => {
                ActionCategory::Device
            }
            ShortcutAction::ScreenBrightnessInc | ShortcutAction::ScreenBrightnessDec => {
                ActionCategory::Screen
            }
            _ => ActionCategory::Stream,
        }
    }

    /// Human readable label for selection lists.
    pub fn label(self) -> &'static str {
        match self {
            ShortcutAction::StreamScreenshotCapture => "Take screenshot",
            ShortcutAction::StreamMenuToggle => "Show/hide stream menu",
            ShortcutAction::StreamStatsToggle => "Show/hide stats",
            ShortcutAction::StreamSoundToggle => "Mute/unmute sound",
            ShortcutAction::StreamMicrophoneToggle => "Mute/unmute microphone",
            ShortcutAction::StreamVolumeInc => "Increase stream volume",
            ShortcutAction::StreamVolumeDec => "Decrease stream volume",
            ShortcutAction::DeviceVolumeInc => "Increase device volume",
            ShortcutAction::DeviceVolumeDec => "Decrease device volume",
            ShortcutAction::ScreenBrightnessInc => "Increase screen brightness",
            ShortcutAction::ScreenBrightnessDec => "Decrease screen brightness",
        }
    }

    /// Actions grouped by category, in declaration order.
    pub fn grouped() -> Vec<(ActionCategory, Vec<ShortcutAction>)> {
        let mut groups: Vec<(ActionCategory, Vec<ShortcutAction>)> = Vec::new();
        for action in Self::iter() {
            match groups.iter_mut().find(|(c, _)| *c == action.category()) {
                Some((_, actions)) => actions.push(action),
                None => groups.push((action.category(), vec![action])),
            }
        }
        groups
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for action in ShortcutAction::iter() {
            assert_eq!(ShortcutAction::from_id(action.id()), Some(action));
        }
        assert_eq!(
            ShortcutAction::StreamScreenshotCapture.id(),
            "stream-screenshot-capture"
        );
        assert_eq!(ShortcutAction::from_id("stream-teleport"), None);
    }

    #[test]
    fn serde_uses_wire_id() {
        let json = serde_json::to_string(&ShortcutAction::ScreenBrightnessDec).unwrap();
        assert_eq!(json, "\"screen-brightness-dec\"");
    }

    #[test]
    fn grouping_covers_every_action() {
        let groups = ShortcutAction::grouped();
        let names: Vec<&str> = groups.iter().map(|(c, _)| (*c).into()).collect();
        assert_eq!(names, vec!["stream", "device", "screen"]);
        let total: usize = groups.iter().map(|(_, a)| a.len()).sum();
        assert_eq!(total, ShortcutAction::iter().count());
    }
}
