//! Standard gamepad button indices and a compact ordered set over them.
//!
//! Ordinals follow the standard gamepad mapping. Stick directions do not
//! exist on the physical layout; they are synthesized from axis values and
//! live in the 100/200 ranges so they never collide with real buttons.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// A physical or synthesized gamepad button.
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
    AsRefStr,
)]
#[repr(u16)]
pub enum ButtonIndex {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    Select = 8,
    Start = 9,
    LeftStick = 10,
    RightStick = 11,
    Up = 12,
    Down = 13,
    Left = 14,
    Right = 15,
    Home = 16,
    Share = 17,
    LeftStickUp = 100,
    LeftStickDown = 101,
    LeftStickLeft = 102,
    LeftStickRight = 103,
    RightStickUp = 200,
    RightStickDown = 201,
    RightStickLeft = 202,
    RightStickRight = 203,
}

impl ButtonIndex {
    /// Every button in ascending ordinal order.
    pub const ALL: [ButtonIndex; 26] = [
        ButtonIndex::A,
        ButtonIndex::B,
        ButtonIndex::X,
        ButtonIndex::Y,
        ButtonIndex::LeftBumper,
        ButtonIndex::RightBumper,
        ButtonIndex::LeftTrigger,
        ButtonIndex::RightTrigger,
        ButtonIndex::Select,
        ButtonIndex::Start,
        ButtonIndex::LeftStick,
        ButtonIndex::RightStick,
        ButtonIndex::Up,
        ButtonIndex::Down,
        ButtonIndex::Left,
        ButtonIndex::Right,
        ButtonIndex::Home,
        ButtonIndex::Share,
        ButtonIndex::LeftStickUp,
        ButtonIndex::LeftStickDown,
        ButtonIndex::LeftStickLeft,
        ButtonIndex::LeftStickRight,
        ButtonIndex::RightStickUp,
        ButtonIndex::RightStickDown,
        ButtonIndex::RightStickLeft,
        ButtonIndex::RightStickRight,
    ];

    /// Numeric ordinal used by the standard mapping and by persisted profiles.
    pub fn ordinal(self) -> u16 {
        self as u16
    }

    /// Resolve an ordinal back to a button. Unknown ordinals yield `None`.
    pub fn from_ordinal(ordinal: u16) -> Option<Self> {
        Self::iter().find(|button| button.ordinal() == ordinal)
    }

    /// Index of a raw digital button in a sampled button array, if this is
    /// a physical button.
    pub fn raw_slot(self) -> Option<usize> {
        let ordinal = self.ordinal();
        (ordinal <= ButtonIndex::Share.ordinal()).then_some(ordinal as usize)
    }

    /// The reserved guide button, never reported as an edge.
    pub fn is_home(self) -> bool {
        self == ButtonIndex::Home
    }

    pub fn is_dpad(self) -> bool {
        matches!(
            self,
            ButtonIndex::Up | ButtonIndex::Down | ButtonIndex::Left | ButtonIndex::Right
        )
    }

    pub fn is_stick_direction(self) -> bool {
        self.ordinal() >= 100
    }

    fn bit(self) -> u32 {
        // ALL is sorted and has fewer than 32 entries.
        let position = Self::ALL
            .iter()
            .position(|button| *button == self)
            .unwrap_or_default();
        1 << position
    }
}

impl fmt::Display for ButtonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_ref(), self.ordinal())
    }
}

/// Set of buttons, iterated in ascending ordinal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u32);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn insert(&mut self, button: ButtonIndex) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: ButtonIndex) {
        self.0 &= !button.bit();
    }

    pub fn contains(&self, button: ButtonIndex) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Buttons in `self` that are not in `other`.
    pub fn difference(&self, other: &ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & !other.0)
    }

    pub fn union(&self, other: &ButtonSet) -> ButtonSet {
        ButtonSet(self.0 | other.0)
    }

    /// Copy of the set without `button`.
    pub fn without(mut self, button: ButtonIndex) -> ButtonSet {
        self.remove(button);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = ButtonIndex> + '_ {
        ButtonIndex::ALL
            .iter()
            .copied()
            .filter(move |button| self.contains(*button))
    }
}

impl FromIterator<ButtonIndex> for ButtonSet {
    fn from_iter<T: IntoIterator<Item = ButtonIndex>>(iter: T) -> Self {
        let mut set = ButtonSet::new();
        for button in iter {
            set.insert(button);
        }
        set
    }
}

impl Extend<ButtonIndex> for ButtonSet {
    fn extend<T: IntoIterator<Item = ButtonIndex>>(&mut self, iter: T) {
        for button in iter {
            self.insert(button);
        }
    }
}
