use app::{Engine, EngineConfig, EngineSignal};
use gamepad::{ButtonIndex, ControllerIdentity, ControllerSnapshot, ScriptedControllers};
use keymap::{FileStorage, MemoryStorage, ShortcutAction, DEFAULT_STORAGE_KEY};
use navigation::{ControlKind, FocusTree, NavCommand, NodeId, SettingsTree};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const NAV_STEP: Duration = Duration::from_millis(50);

fn pad_frame(buttons: &[ButtonIndex]) -> Vec<ControllerSnapshot> {
    vec![ControllerSnapshot::new(0, "Pad-X").with_buttons(buttons.iter().copied())]
}

fn recorder(engine: &mut Engine) -> Rc<RefCell<Vec<EngineSignal>>> {
    let signals = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&signals);
    engine
        .signals_mut()
        .subscribe(move |signal| sink.borrow_mut().push(*signal));
    signals
}

struct Dialog {
    tree: SettingsTree,
    first: NodeId,
    third_last: NodeId,
}

/// One group, three containers; the middle one has nothing focusable.
fn dialog() -> Dialog {
    let mut tree = SettingsTree::new();
    let group = tree.add_group("stream", "Stream");
    let video = tree.add_container(group, "Video");
    let first = tree.add_control(video, "Quality", ControlKind::Button);
    let disabled = tree.add_container(group, "Unavailable");
    let off = tree.add_control(disabled, "Off", ControlKind::Toggle);
    tree.set_enabled(off, false);
    let audio = tree.add_container(group, "Audio");
    tree.add_control(audio, "Mute", ControlKind::Toggle);
    let third_last = tree.add_slider(audio, "Volume", 0, 100, 5, 50);
    Dialog {
        tree,
        first,
        third_last,
    }
}

#[test]
fn screenshot_fires_once_for_a_held_press() {
    let mut engine = Engine::new(&EngineConfig::default(), MemoryStorage::new());
    engine
        .store_mut()
        .set_action(
            &ControllerIdentity::from("Pad-X"),
            ButtonIndex::A,
            Some(ShortcutAction::StreamScreenshotCapture),
        )
        .unwrap();

    let captures = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&captures);
    engine
        .handlers_mut()
        .register(ShortcutAction::StreamScreenshotCapture, move || {
            log.borrow_mut().push("capture")
        });
    let signals = recorder(&mut engine);

    let mut source = ScriptedControllers::new(vec![
        pad_frame(&[ButtonIndex::A]),
        pad_frame(&[ButtonIndex::A]),
        pad_frame(&[]),
    ]);
    let mut tree = SettingsTree::new();
    let start = Instant::now();
    engine.start(start);

    let mut fired_per_frame = Vec::new();
    let mut now = start;
    loop {
        let report = engine.tick(now, &source, &mut tree);
        fired_per_frame.push(report.dispatch.map_or(0, |d| d.fired.len()));
        if !source.advance() {
            break;
        }
        now += Duration::from_millis(4);
    }

    assert_eq!(fired_per_frame, vec![1, 0, 0]);
    assert_eq!(captures.borrow().len(), 1);
    assert!(signals.borrow().contains(&EngineSignal::ActionFired {
        action: ShortcutAction::StreamScreenshotCapture,
        controller: 0,
    }));
}

#[test]
fn navigation_session_round_trip() {
    let mut engine = Engine::new(&EngineConfig::default(), MemoryStorage::new());
    let signals = recorder(&mut engine);
    let mut d = dialog();

    let start = Instant::now();
    engine.start(start);
    assert!(engine.open_settings(&mut d.tree, None, start));
    assert_eq!(d.tree.focused(), Some(d.first));

    let mut source = ScriptedControllers::new(vec![
        pad_frame(&[ButtonIndex::Down]),
        pad_frame(&[]),
        pad_frame(&[ButtonIndex::Right]),
        pad_frame(&[]),
        pad_frame(&[ButtonIndex::B]),
    ]);

    let mut commands = Vec::new();
    let mut now = start;
    loop {
        commands.push(engine.tick(now, &source, &mut d.tree).navigation);
        if !source.advance() {
            break;
        }
        now += NAV_STEP;
    }

    assert_eq!(
        commands,
        vec![
            Some(NavCommand::Move(navigation::Direction::Down)),
            None,
            Some(NavCommand::Move(navigation::Direction::Right)),
            None,
            Some(NavCommand::Cancel),
        ]
    );
    // DOWN skipped the disabled container; RIGHT on the slider stepped it.
    assert_eq!(d.tree.focused(), Some(d.third_last));
    assert_eq!(d.tree.value(d.third_last), Some(55));
    assert!(!engine.is_settings_open());
    assert_eq!(
        signals
            .borrow()
            .iter()
            .filter(|s| matches!(s, EngineSignal::SessionOpened | EngineSignal::SessionClosed))
            .copied()
            .collect::<Vec<_>>(),
        vec![EngineSignal::SessionOpened, EngineSignal::SessionClosed]
    );
}

#[test]
fn profiles_persist_across_engines() {
    let temp_dir = TempDir::new().unwrap();
    let config = EngineConfig::default();
    let pad = ControllerIdentity::from("Pad-X");

    {
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        let mut engine = Engine::new(&config, storage);
        engine
            .store_mut()
            .set_action(&pad, ButtonIndex::RightBumper, Some(ShortcutAction::StreamMenuToggle))
            .unwrap();
        engine
            .store_mut()
            .set_action(&pad, ButtonIndex::LeftBumper, Some(ShortcutAction::StreamSoundToggle))
            .unwrap();
    }

    let stored =
        std::fs::read_to_string(temp_dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json")))
            .unwrap();
    assert_eq!(
        stored,
        r#"{"Pad-X":{"4":"stream-sound-toggle","5":"stream-menu-toggle"}}"#
    );

    let storage = FileStorage::new(temp_dir.path()).unwrap();
    let engine = Engine::new(&config, storage);
    assert_eq!(engine.store().list_profiles(), vec![pad.clone()]);
    assert_eq!(
        engine.store().action_for(&pad, ButtonIndex::LeftBumper),
        Some(ShortcutAction::StreamSoundToggle)
    );
}

#[test]
fn virtual_controller_profile_is_hidden_by_default() {
    let storage = MemoryStorage::new().with_entry(
        DEFAULT_STORAGE_KEY,
        r#"{"Virtual Controller":{"0":"stream-menu-toggle"},"Pad-X":[null,"stream-stats-toggle"]}"#,
    );
    let engine = Engine::new(&EngineConfig::default(), storage);
    assert_eq!(
        engine.store().list_profiles(),
        vec![ControllerIdentity::from("Pad-X")]
    );
}
