//! Replays a short scripted controller session against an in-memory settings
//! dialog and prints every engine signal.

use app::{AppBuilder, Application, BoxError, EngineSignal};
use gamepad::{ButtonIndex, ControllerIdentity, ControllerSnapshot, ScriptedControllers};
use keymap::ShortcutAction;
use navigation::{ControlKind, FocusTree, SettingsTree};
use std::time::{Duration, Instant};

struct Demo;

impl Application for Demo {
    const APP_ID: &'static str = "scripted_session";
}

fn frame(buttons: &[ButtonIndex]) -> Vec<ControllerSnapshot> {
    vec![ControllerSnapshot::new(0, "Demo Pad").with_buttons(buttons.iter().copied())]
}

fn main() -> Result<(), BoxError> {
    let context = AppBuilder::<Demo>::new(env!("CARGO_PKG_VERSION"))?.build();
    let mut engine = context.build_engine()?;

    let pad = ControllerIdentity::from("Demo Pad");
    engine
        .store_mut()
        .set_action(&pad, ButtonIndex::Y, Some(ShortcutAction::StreamScreenshotCapture))?;
    engine
        .handlers_mut()
        .register(ShortcutAction::StreamScreenshotCapture, || {
            println!("  * screenshot captured");
        });
    engine.signals_mut().subscribe(|signal: &EngineSignal| {
        println!("  signal: {signal:?}");
    });

    let mut tree = SettingsTree::new();
    let stream = tree.add_group("stream", "Stream");
    let device = tree.add_group("device", "Device");
    let video = tree.add_container(stream, "Video");
    tree.add_control(video, "Quality", ControlKind::Button);
    let audio = tree.add_container(stream, "Audio");
    tree.add_slider(audio, "Volume", 0, 100, 10, 50);
    let display = tree.add_container(device, "Display");
    tree.add_control(display, "Brightness", ControlKind::Button);

    let mut source = ScriptedControllers::new(vec![
        frame(&[ButtonIndex::Y]),
        frame(&[ButtonIndex::Y]),
        frame(&[]),
        frame(&[ButtonIndex::Down]),
        frame(&[]),
        frame(&[ButtonIndex::Right]),
        frame(&[]),
        frame(&[ButtonIndex::B]),
    ]);

    let start = Instant::now();
    engine.start(start);
    engine.open_settings(&mut tree, None, start);

    let step = Duration::from_millis(50);
    let mut now = start;
    loop {
        let report = engine.tick(now, &source, &mut tree);
        if let Some(command) = report.navigation {
            let focused = tree.focused().map(|node| tree.label(node).to_owned());
            println!("  nav: {command:?} -> {focused:?}");
        }
        if !source.advance() {
            break;
        }
        now += step;
    }

    if let Some(volume) = tree.find("Volume") {
        println!("volume is now {:?}", tree.value(volume));
    }
    println!("profiles: {:?}", engine.store().list_profiles());
    Ok(())
}
