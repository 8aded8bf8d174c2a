//! Outward notifications of engine activity.

use keymap::ShortcutAction;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    ActionFired {
        action: ShortcutAction,
        controller: usize,
    },
    SessionOpened,
    SessionClosed,
    /// Emitted when a controller's "any shortcut button held" flag changes.
    ShortcutHeld {
        controller: usize,
        held: bool,
    },
}

type Subscriber = Box<dyn FnMut(&EngineSignal)>;

/// Fan-out of [`EngineSignal`]s to registered subscribers, in registration
/// order.
#[derive(Default)]
pub struct SignalBus {
    subscribers: Vec<Subscriber>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&EngineSignal) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn emit(&mut self, signal: EngineSignal) {
        for subscriber in &mut self.subscribers {
            subscriber(&signal);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
