//! Navigation session lifecycle: open, poll, translate input, close.

use crate::navigator::{self, Direction, NavigatorConfig};
use crate::tree::{ControlKind, FocusTree, NodeId};
use gamepad::stick::as_dpad;
use gamepad::{
    ButtonIndex, ButtonSet, ControllerSnapshot, EdgeDetector, PollTimer, StickPolicy,
    StickThresholds,
};
use std::time::{Duration, Instant};
use strum::EnumString;
use tracing::{debug, info};

/// Buttons the session reacts to, highest priority first.
const PRIORITY: [ButtonIndex; 8] = [
    ButtonIndex::Up,
    ButtonIndex::Down,
    ButtonIndex::Left,
    ButtonIndex::Right,
    ButtonIndex::A,
    ButtonIndex::B,
    ButtonIndex::LeftBumper,
    ButtonIndex::RightBumper,
];

/// Stick directions consulted when no digital button fired; horizontal first.
const STICK_PRIORITY: [ButtonIndex; 4] = [
    ButtonIndex::LeftStickLeft,
    ButtonIndex::LeftStickRight,
    ButtonIndex::LeftStickUp,
    ButtonIndex::LeftStickDown,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub sticks: StickThresholds,
    pub navigator: NavigatorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            sticks: StickThresholds::default(),
            navigator: NavigatorConfig::default(),
        }
    }
}

/// What a controller press asked the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Move(Direction),
    Confirm,
    Cancel,
    FocusTab,
}

impl NavCommand {
    fn for_button(button: ButtonIndex) -> Option<Self> {
        Some(match button {
            ButtonIndex::Up => NavCommand::Move(Direction::Up),
            ButtonIndex::Down => NavCommand::Move(Direction::Down),
            ButtonIndex::Left => NavCommand::Move(Direction::Left),
            ButtonIndex::Right => NavCommand::Move(Direction::Right),
            ButtonIndex::A => NavCommand::Confirm,
            ButtonIndex::B => NavCommand::Cancel,
            ButtonIndex::LeftBumper | ButtonIndex::RightBumper => NavCommand::FocusTab,
            _ => return None,
        })
    }
}

/// Keyboard keys the session understands. Parses from DOM-style key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    #[strum(serialize = " ", serialize = "Space")]
    Space,
    Tab,
    Escape,
}

/// Observable session changes, drained with [`NavigationController::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Opened,
    Closed,
    FocusMoved { to: NodeId },
    Activated { node: NodeId },
    ValueStepped { node: NodeId, delta: i32 },
}

#[derive(Debug)]
struct Session {
    timer: PollTimer,
    edges: EdgeDetector,
}

/// Owns the single navigation session.
#[derive(Debug)]
pub struct NavigationController {
    config: SessionConfig,
    session: Option<Session>,
    events: Vec<SessionEvent>,
}

impl NavigationController {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            session: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open the session, optionally switching to `group` first.
    ///
    /// When a session is already open only the group switch happens.
    /// Returns true when a new session started.
    pub fn open<T: FocusTree + ?Sized>(
        &mut self,
        tree: &mut T,
        group: Option<&str>,
        now: Instant,
    ) -> bool {
        if let Some(key) = group {
            if !tree.activate_tab_group(key) {
                debug!(group = key, "unknown tab group");
            }
        }
        if self.session.is_some() {
            return false;
        }

        if let Some(node) = navigator::first_content(tree).filter(|node| tree.focus(*node)) {
            self.events.push(SessionEvent::FocusMoved { to: node });
        }

        let mut timer = PollTimer::new(self.config.poll_interval);
        timer.start(now);
        self.session = Some(Session {
            timer,
            edges: EdgeDetector::new(self.config.sticks, StickPolicy::WhenDpadIdle),
        });
        self.events.push(SessionEvent::Opened);
        info!("navigation session opened");
        true
    }

    /// Stop polling and drop all session state. No-op when closed.
    pub fn close(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        self.events.push(SessionEvent::Closed);
        info!("navigation session closed");
        true
    }

    /// Run one poll if the session timer is due.
    ///
    /// Every physical controller's edge state advances; the first controller
    /// (by index) with an actionable press decides the command.
    pub fn tick<T: FocusTree + ?Sized>(
        &mut self,
        tree: &mut T,
        controllers: &[ControllerSnapshot],
        now: Instant,
    ) -> Option<NavCommand> {
        let session = self.session.as_mut()?;
        if !session.timer.due(now) {
            return None;
        }

        let mut physical: Vec<&ControllerSnapshot> =
            controllers.iter().filter(|c| !c.is_virtual).collect();
        physical.sort_by_key(|c| c.index);
        session.edges.retain(physical.iter().map(|c| c.index));

        let mut command = None;
        for snapshot in physical {
            let edges = session.edges.advance(snapshot);
            if command.is_none() {
                command = first_command(&edges.pressed);
                if let Some(command) = command {
                    debug!(controller = snapshot.index, ?command, "navigation input");
                }
            }
        }

        let command = command?;
        self.apply(tree, command);
        Some(command)
    }

    /// Handle a keyboard key while the session is open.
    ///
    /// Returns true when the key was consumed and default handling should be
    /// suppressed.
    pub fn handle_key<T: FocusTree + ?Sized>(&mut self, tree: &mut T, key: NavKey) -> bool {
        if self.session.is_none() {
            return false;
        }
        match key {
            NavKey::ArrowUp => self.move_focus(tree, Direction::Up),
            NavKey::ArrowDown => self.move_focus(tree, Direction::Down),
            NavKey::ArrowLeft | NavKey::ArrowRight if self.slider_focused(tree) => return false,
            NavKey::ArrowLeft => self.move_focus(tree, Direction::Left),
            NavKey::ArrowRight => self.move_focus(tree, Direction::Right),
            NavKey::Enter | NavKey::Space => {
                let Some(node) = tree.focused() else {
                    return false;
                };
                if tree.control_kind(node) != ControlKind::Tab {
                    return false;
                }
                self.activate(tree, node);
            }
            NavKey::Tab => self.focus_tab(tree),
            NavKey::Escape => {
                self.close();
            }
        }
        true
    }

    /// Drain pending session events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply<T: FocusTree + ?Sized>(&mut self, tree: &mut T, command: NavCommand) {
        match command {
            NavCommand::Confirm => {
                if let Some(node) = tree.focused() {
                    self.activate(tree, node);
                }
            }
            NavCommand::Cancel => {
                self.close();
            }
            NavCommand::FocusTab => self.focus_tab(tree),
            NavCommand::Move(direction @ (Direction::Left | Direction::Right))
                if self.slider_focused(tree) =>
            {
                let Some(node) = tree.focused() else {
                    return;
                };
                let delta = if direction == Direction::Left { -1 } else { 1 };
                if tree.step_value(node, delta) {
                    self.events.push(SessionEvent::ValueStepped { node, delta });
                }
            }
            NavCommand::Move(direction) => self.move_focus(tree, direction),
        }
    }

    fn move_focus<T: FocusTree + ?Sized>(&mut self, tree: &mut T, direction: Direction) {
        if let Some(node) = navigator::move_focus(tree, direction, &self.config.navigator) {
            self.events.push(SessionEvent::FocusMoved { to: node });
        }
    }

    fn focus_tab<T: FocusTree + ?Sized>(&mut self, tree: &mut T) {
        let before = tree.focused();
        if let Some(tab) = navigator::focus_active_tab(tree) {
            if before != Some(tab) {
                self.events.push(SessionEvent::FocusMoved { to: tab });
            }
        }
    }

    fn activate<T: FocusTree + ?Sized>(&mut self, tree: &mut T, node: NodeId) {
        if tree.activate(node) {
            self.events.push(SessionEvent::Activated { node });
        }
    }

    fn slider_focused<T: FocusTree + ?Sized>(&self, tree: &T) -> bool {
        tree.focused()
            .is_some_and(|node| tree.control_kind(node) == ControlKind::Slider)
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

fn first_command(pressed: &ButtonSet) -> Option<NavCommand> {
    PRIORITY
        .iter()
        .chain(STICK_PRIORITY.iter())
        .find(|button| pressed.contains(**button))
        .and_then(|button| NavCommand::for_button(as_dpad(*button)))
}
