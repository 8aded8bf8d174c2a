//! Cooperative scheduler wiring shortcut dispatch and focus navigation to
//! one controller source.

use crate::config::EngineConfig;
use crate::signals::{EngineSignal, SignalBus};
use gamepad::{ControllerSource, PollTimer};
use keymap::{
    ActionHandlers, DispatchReport, KeyValueStore, ProfileStore, ShortcutDispatcher,
};
use navigation::{FocusTree, NavCommand, NavKey, NavigationController, SessionEvent};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Present when the shortcut poll ran.
    pub dispatch: Option<DispatchReport>,
    /// Present when the navigation session acted on input.
    pub navigation: Option<NavCommand>,
}

pub struct Engine {
    store: ProfileStore,
    handlers: ActionHandlers,
    dispatcher: ShortcutDispatcher,
    shortcut_timer: PollTimer,
    navigation: NavigationController,
    signals: SignalBus,
    held: HashMap<usize, bool>,
}

impl Engine {
    pub fn new(config: &EngineConfig, storage: impl KeyValueStore + 'static) -> Self {
        let store = config
            .shortcuts
            .reserved_identities
            .iter()
            .fold(
                ProfileStore::builder()
                    .with_storage(storage)
                    .with_key(config.shortcuts.storage_key.clone()),
                |builder, identity| builder.reserve_identity(identity.as_str()),
            )
            .build();

        Self {
            store,
            handlers: ActionHandlers::new(),
            dispatcher: ShortcutDispatcher::new(config.sticks),
            shortcut_timer: PollTimer::new(config.shortcut_interval()),
            navigation: NavigationController::new(config.session()),
            signals: SignalBus::new(),
            held: HashMap::new(),
        }
    }

    /// Arm the shortcut poll loop.
    pub fn start(&mut self, now: Instant) {
        self.shortcut_timer.start(now);
        info!(interval = ?self.shortcut_timer.interval(), "shortcut polling started");
    }

    /// Disarm the shortcut loop and end any navigation session.
    pub fn stop(&mut self) {
        self.shortcut_timer.stop();
        self.dispatcher.reset();
        self.held.clear();
        self.close_settings();
    }

    /// Run whichever poll loops are due at `now` against one shared sample
    /// of `controllers`.
    pub fn tick<S, T>(&mut self, now: Instant, controllers: &S, tree: &mut T) -> TickReport
    where
        S: ControllerSource + ?Sized,
        T: FocusTree + ?Sized,
    {
        let snapshot = controllers.connected();
        let mut report = TickReport::default();

        if self.shortcut_timer.due(now) {
            let dispatch = self
                .dispatcher
                .poll(&snapshot, &self.store, &mut self.handlers);
            self.publish_dispatch(&dispatch);
            report.dispatch = Some(dispatch);
        }

        report.navigation = self.navigation.tick(tree, &snapshot, now);
        self.publish_session_events();
        report
    }

    /// Open the settings dialog session, optionally on tab group `group`.
    pub fn open_settings<T: FocusTree + ?Sized>(
        &mut self,
        tree: &mut T,
        group: Option<&str>,
        now: Instant,
    ) -> bool {
        let opened = self.navigation.open(tree, group, now);
        self.publish_session_events();
        opened
    }

    pub fn close_settings(&mut self) -> bool {
        let closed = self.navigation.close();
        self.publish_session_events();
        closed
    }

    /// Forward a keyboard key to the navigation session.
    pub fn handle_key<T: FocusTree + ?Sized>(&mut self, tree: &mut T, key: NavKey) -> bool {
        let handled = self.navigation.handle_key(tree, key);
        self.publish_session_events();
        handled
    }

    pub fn is_settings_open(&self) -> bool {
        self.navigation.is_open()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    pub fn handlers_mut(&mut self) -> &mut ActionHandlers {
        &mut self.handlers
    }

    pub fn signals_mut(&mut self) -> &mut SignalBus {
        &mut self.signals
    }

    fn publish_dispatch(&mut self, dispatch: &DispatchReport) {
        for fired in &dispatch.fired {
            self.signals.emit(EngineSignal::ActionFired {
                action: fired.action,
                controller: fired.controller,
            });
        }

        let connected: Vec<usize> = dispatch.held.iter().map(|(index, _)| *index).collect();
        self.held.retain(|index, _| connected.contains(index));
        for &(controller, held) in &dispatch.held {
            let previous = self.held.insert(controller, held).unwrap_or(false);
            if previous != held {
                debug!(controller, held, "shortcut hold changed");
                self.signals
                    .emit(EngineSignal::ShortcutHeld { controller, held });
            }
        }
    }

    fn publish_session_events(&mut self) {
        for event in self.navigation.take_events() {
            match event {
                SessionEvent::Opened => self.signals.emit(EngineSignal::SessionOpened),
                SessionEvent::Closed => self.signals.emit(EngineSignal::SessionClosed),
                _ => {}
            }
        }
    }
}
