//! Edge-triggered dispatch of bound shortcut actions.

use crate::action::ShortcutAction;
use crate::store::ProfileStore;
use gamepad::{ButtonIndex, ControllerSnapshot, EdgeDetector, StickPolicy, StickThresholds};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

type Handler = Box<dyn FnMut()>;

/// Feature handlers keyed by action.
#[derive(Default)]
pub struct ActionHandlers {
    handlers: HashMap<ShortcutAction, Handler>,
}

impl ActionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler of `action`.
    pub fn register(&mut self, action: ShortcutAction, handler: impl FnMut() + 'static) {
        self.handlers.insert(action, Box::new(handler));
    }

    pub fn with(mut self, action: ShortcutAction, handler: impl FnMut() + 'static) -> Self {
        self.register(action, handler);
        self
    }

    pub fn unregister(&mut self, action: ShortcutAction) -> bool {
        self.handlers.remove(&action).is_some()
    }

    pub fn contains(&self, action: ShortcutAction) -> bool {
        self.handlers.contains_key(&action)
    }

    /// Run the handler of `action`. Returns false when none is registered.
    pub fn invoke(&mut self, action: ShortcutAction) -> bool {
        match self.handlers.get_mut(&action) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ActionHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// An action that fired during a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredAction {
    pub action: ShortcutAction,
    pub controller: usize,
}

/// Outcome of one dispatcher poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Invoked actions, in dispatch order.
    pub fired: SmallVec<[FiredAction; 2]>,
    /// Per controller index: whether a non-home digital button is held.
    /// Stick deflection never counts. Controllers without a profile always
    /// report `false`.
    pub held: SmallVec<[(usize, bool); 4]>,
}

impl DispatchReport {
    pub fn any_held(&self) -> bool {
        self.held.iter().any(|(_, held)| *held)
    }

    pub fn held_for(&self, controller: usize) -> bool {
        self.held
            .iter()
            .any(|(index, held)| *index == controller && *held)
    }
}

/// Fires each bound action once per physical press.
#[derive(Debug, Clone, Default)]
pub struct ShortcutDispatcher {
    edges: EdgeDetector,
}

impl ShortcutDispatcher {
    pub fn new(thresholds: StickThresholds) -> Self {
        Self {
            edges: EdgeDetector::new(thresholds, StickPolicy::Always),
        }
    }

    /// Process one poll worth of controller snapshots.
    ///
    /// Edge state advances for every physical controller whether or not it
    /// has a profile, so binding a button that is already held does not fire
    /// it until it is pressed again.
    pub fn poll(
        &mut self,
        controllers: &[ControllerSnapshot],
        store: &ProfileStore,
        handlers: &mut ActionHandlers,
    ) -> DispatchReport {
        let mut physical: Vec<&ControllerSnapshot> =
            controllers.iter().filter(|c| !c.is_virtual).collect();
        physical.sort_by_key(|c| c.index);
        self.edges.retain(physical.iter().map(|c| c.index));

        let mut report = DispatchReport::default();
        for snapshot in physical {
            let edges = self.edges.advance(snapshot);

            let Some(bindings) = store.bindings(&snapshot.identity) else {
                report.held.push((snapshot.index, false));
                continue;
            };

            for button in edges.pressed.iter() {
                let Some(action) = bindings.get(button) else {
                    continue;
                };
                if handlers.invoke(action) {
                    debug!(controller = snapshot.index, %button, %action, "shortcut fired");
                    report.fired.push(FiredAction {
                        action,
                        controller: snapshot.index,
                    });
                } else {
                    trace!(%action, "no handler registered");
                }
            }
            let held = !snapshot.buttons.without(ButtonIndex::Home).is_empty();
            report.held.push((snapshot.index, held));
        }
        report
    }

    /// Forget all frame history.
    pub fn reset(&mut self) {
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepad::ControllerIdentity;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(bindings: &[(ButtonIndex, ShortcutAction)]) -> ProfileStore {
        let mut store = ProfileStore::builder().build();
        let identity = ControllerIdentity::from("Pad-X");
        for (button, action) in bindings {
            store.set_action(&identity, *button, Some(*action)).unwrap();
        }
        store
    }

    fn recording(log: &Rc<RefCell<Vec<ShortcutAction>>>) -> ActionHandlers {
        let mut handlers = ActionHandlers::new();
        for action in [
            ShortcutAction::StreamScreenshotCapture,
            ShortcutAction::StreamMenuToggle,
            ShortcutAction::StreamStatsToggle,
        ] {
            let log = Rc::clone(log);
            handlers.register(action, move || log.borrow_mut().push(action));
        }
        handlers
    }

    fn pad(buttons: &[ButtonIndex]) -> Vec<ControllerSnapshot> {
        vec![ControllerSnapshot::new(0, "Pad-X").with_buttons(buttons.iter().copied())]
    }

    #[test]
    fn held_button_fires_once_on_first_frame() {
        let store = store_with(&[(ButtonIndex::A, ShortcutAction::StreamScreenshotCapture)]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = recording(&log);
        let mut dispatcher = ShortcutDispatcher::default();

        let first = dispatcher.poll(&pad(&[ButtonIndex::A]), &store, &mut handlers);
        assert_eq!(first.fired.len(), 1);
        assert_eq!(log.borrow().len(), 1);

        let second = dispatcher.poll(&pad(&[ButtonIndex::A]), &store, &mut handlers);
        assert!(second.fired.is_empty());
        assert!(second.any_held());

        let third = dispatcher.poll(&pad(&[]), &store, &mut handlers);
        assert!(third.fired.is_empty());
        assert!(!third.any_held());

        assert_eq!(*log.borrow(), vec![ShortcutAction::StreamScreenshotCapture]);
    }

    #[test]
    fn simultaneous_presses_fire_in_button_order() {
        let store = store_with(&[
            (ButtonIndex::RightBumper, ShortcutAction::StreamMenuToggle),
            (ButtonIndex::A, ShortcutAction::StreamStatsToggle),
        ]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = recording(&log);
        let mut dispatcher = ShortcutDispatcher::default();

        dispatcher.poll(
            &pad(&[ButtonIndex::RightBumper, ButtonIndex::A]),
            &store,
            &mut handlers,
        );
        assert_eq!(
            *log.borrow(),
            vec![ShortcutAction::StreamStatsToggle, ShortcutAction::StreamMenuToggle]
        );
    }

    #[test]
    fn binding_while_held_does_not_fire() {
        let mut store = ProfileStore::builder().build();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = recording(&log);
        let mut dispatcher = ShortcutDispatcher::default();

        let report = dispatcher.poll(&pad(&[ButtonIndex::X]), &store, &mut handlers);
        assert_eq!(report.held.as_slice(), &[(0, false)]);

        store
            .set_action(
                &ControllerIdentity::from("Pad-X"),
                ButtonIndex::X,
                Some(ShortcutAction::StreamMenuToggle),
            )
            .unwrap();
        dispatcher.poll(&pad(&[ButtonIndex::X]), &store, &mut handlers);
        assert!(log.borrow().is_empty());

        dispatcher.poll(&pad(&[]), &store, &mut handlers);
        dispatcher.poll(&pad(&[ButtonIndex::X]), &store, &mut handlers);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unhandled_and_virtual_are_ignored() {
        let store = store_with(&[(ButtonIndex::B, ShortcutAction::DeviceVolumeDec)]);
        let mut handlers = ActionHandlers::new();
        let mut dispatcher = ShortcutDispatcher::default();

        let report = dispatcher.poll(&pad(&[ButtonIndex::B]), &store, &mut handlers);
        assert!(report.fired.is_empty());

        let touch = vec![ControllerSnapshot::new(1, "Pad-X")
            .virtual_device()
            .with_buttons([ButtonIndex::B])];
        let report = dispatcher.poll(&touch, &store, &mut handlers);
        assert!(report.held.is_empty());
    }

    #[test]
    fn home_only_is_not_reported_as_held() {
        let store = store_with(&[(ButtonIndex::A, ShortcutAction::StreamMenuToggle)]);
        let mut handlers = ActionHandlers::new();
        let mut dispatcher = ShortcutDispatcher::default();

        let report = dispatcher.poll(&pad(&[ButtonIndex::Home]), &store, &mut handlers);
        assert!(!report.held_for(0));
    }

    #[test]
    fn stick_directions_can_be_bound() {
        let store = store_with(&[(ButtonIndex::RightStickUp, ShortcutAction::StreamMenuToggle)]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = recording(&log);
        let mut dispatcher = ShortcutDispatcher::default();

        let tilted = vec![ControllerSnapshot::new(0, "Pad-X").with_axis(3, -0.9)];
        dispatcher.poll(&tilted, &store, &mut handlers);
        dispatcher.poll(&tilted, &store, &mut handlers);
        assert_eq!(*log.borrow(), vec![ShortcutAction::StreamMenuToggle]);
    }

    #[test]
    fn tilted_stick_is_not_reported_as_held() {
        let store = store_with(&[(ButtonIndex::A, ShortcutAction::StreamMenuToggle)]);
        let mut handlers = ActionHandlers::new();
        let mut dispatcher = ShortcutDispatcher::default();

        let tilted = vec![ControllerSnapshot::new(0, "Pad-X").with_axis(0, 0.8)];
        let report = dispatcher.poll(&tilted, &store, &mut handlers);
        assert!(!report.held_for(0));

        let pressed = vec![ControllerSnapshot::new(0, "Pad-X")
            .with_axis(0, 0.8)
            .with_buttons([ButtonIndex::X])];
        let report = dispatcher.poll(&pressed, &store, &mut handlers);
        assert!(report.held_for(0));
    }

    #[test]
    fn controllers_dispatch_independently() {
        let mut store = ProfileStore::builder().build();
        let first = ControllerIdentity::from("Pad-X");
        let second = ControllerIdentity::from("Pad-Y");
        store
            .set_action(&first, ButtonIndex::A, Some(ShortcutAction::StreamMenuToggle))
            .unwrap();
        store
            .set_action(&second, ButtonIndex::B, Some(ShortcutAction::StreamStatsToggle))
            .unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = recording(&log);
        let mut dispatcher = ShortcutDispatcher::default();

        let frame = vec![
            ControllerSnapshot::new(2, "Pad-Y").with_buttons([ButtonIndex::B]),
            ControllerSnapshot::new(0, "Pad-X").with_buttons([ButtonIndex::A]),
        ];
        let report = dispatcher.poll(&frame, &store, &mut handlers);
        assert_eq!(
            report.fired.as_slice(),
            &[
                FiredAction {
                    action: ShortcutAction::StreamMenuToggle,
                    controller: 0,
                },
                FiredAction {
                    action: ShortcutAction::StreamStatsToggle,
                    controller: 2,
                },
            ]
        );

        let frame = vec![
            ControllerSnapshot::new(2, "Pad-Y"),
            ControllerSnapshot::new(0, "Pad-X").with_buttons([ButtonIndex::A]),
        ];
        let report = dispatcher.poll(&frame, &store, &mut handlers);
        assert!(report.fired.is_empty());
        assert_eq!(report.held.as_slice(), &[(0, true), (2, false)]);
        assert_eq!(log.borrow().len(), 2);
    }
}
