use std::time::{Duration, Instant};

use campus_quest_core::Direction;
use campus_quest_rendering::{hotkey_for_action, FrameInput, Scene};
use campus_quest_rendering_macroquad::{DeviceSnapshot, PanelInputState};
use campus_quest_rendering_terminal::InputTranslator;
use campus_quest_system_session::Session;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug)]
enum Step {
    Idle(u32),
    Hold(Direction, u32),
    Interact,
    Close,
    Action(usize),
}

fn arrow(direction: Direction) -> KeyCode {
    match direction {
        Direction::Up => KeyCode::Up,
        Direction::Down => KeyCode::Down,
        Direction::Left => KeyCode::Left,
        Direction::Right => KeyCode::Right,
    }
}

/// Frames produced by the windowed adapter's input translation.
fn macroquad_frames(script: &[Step]) -> Vec<FrameInput> {
    let mut latch = PanelInputState::default();
    let mut frames = Vec::new();
    for step in script {
        let (snapshot, count) = match *step {
            Step::Idle(count) => (DeviceSnapshot::default(), count),
            Step::Hold(direction, count) => (
                DeviceSnapshot {
                    intent: campus_quest_core::InputIntent::NONE.with(direction, true),
                    ..DeviceSnapshot::default()
                },
                count,
            ),
            Step::Interact => (
                DeviceSnapshot {
                    interact: true,
                    ..DeviceSnapshot::default()
                },
                1,
            ),
            Step::Close => (
                DeviceSnapshot {
                    escape: true,
                    ..DeviceSnapshot::default()
                },
                1,
            ),
            Step::Action(index) => (
                DeviceSnapshot {
                    typed: hotkey_for_action(index).into_iter().collect(),
                    ..DeviceSnapshot::default()
                },
                1,
            ),
        };
        for _ in 0..count {
            frames.push(snapshot.frame_input(&mut latch));
        }
    }
    frames
}

fn tick(translator: &mut InputTranslator, now: &mut Instant, frames: &mut Vec<FrameInput>) {
    *now += FRAME;
    frames.push(translator.take_frame_input(*now));
}

/// Frames produced by the terminal adapter from discrete key events.
fn terminal_frames(script: &[Step]) -> Vec<FrameInput> {
    let mut translator = InputTranslator::new(true);
    let mut now = Instant::now();
    let mut frames = Vec::new();

    for step in script {
        match *step {
            Step::Idle(count) => {
                for _ in 0..count {
                    tick(&mut translator, &mut now, &mut frames);
                }
            }
            Step::Hold(direction, count) => {
                translator.key(KeyEvent::new(arrow(direction), KeyModifiers::NONE), now);
                for _ in 0..count {
                    tick(&mut translator, &mut now, &mut frames);
                }
                translator.key(
                    KeyEvent::new_with_kind(
                        arrow(direction),
                        KeyModifiers::NONE,
                        KeyEventKind::Release,
                    ),
                    now,
                );
            }
            Step::Interact => {
                translator.key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE), now);
                tick(&mut translator, &mut now, &mut frames);
            }
            Step::Close => {
                translator.key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), now);
                tick(&mut translator, &mut now, &mut frames);
            }
            Step::Action(index) => {
                let key = hotkey_for_action(index).expect("bound hotkey");
                translator.key(KeyEvent::new(KeyCode::Char(key), KeyModifiers::NONE), now);
                tick(&mut translator, &mut now, &mut frames);
            }
        }
    }
    frames
}

fn replay(frames: &[FrameInput]) -> Vec<Scene> {
    let mut session = Session::default();
    let mut scene = session.scene();
    frames
        .iter()
        .map(|input| {
            session.advance(FRAME, input.clone(), &mut scene);
            scene.clone()
        })
        .collect()
}

fn script() -> Vec<Step> {
    vec![
        Step::Idle(2),
        Step::Action(1),
        Step::Action(2),
        Step::Close,
        Step::Interact,
        Step::Close,
        Step::Hold(Direction::Up, 90),
        Step::Hold(Direction::Right, 60),
        Step::Idle(3),
        Step::Hold(Direction::Down, 40),
        Step::Hold(Direction::Left, 200),
        Step::Interact,
        Step::Action(0),
        Step::Idle(100),
    ]
}

#[test]
fn both_adapters_translate_the_script_identically() {
    let script = script();
    assert_eq!(macroquad_frames(&script), terminal_frames(&script));
}

#[test]
fn both_adapters_drive_identical_sessions() {
    let script = script();
    let windowed = replay(&macroquad_frames(&script));
    let terminal = replay(&terminal_frames(&script));

    assert_eq!(windowed.len(), terminal.len());
    for (frame, (left, right)) in windowed.iter().zip(&terminal).enumerate() {
        assert_eq!(left, right, "scenes diverged on frame {frame}");
    }

    // The admin panel opened on the way down stays open after walking away.
    let last = windowed.last().expect("frames");
    assert_eq!(last.hud.experience, 25);
    assert!(last.hud.inventory.contains(&"Dorm Key".to_owned()));
    assert_eq!(
        last.panel.as_ref().map(|panel| panel.title.as_str()),
        Some("Admin Office")
    );
    assert!(last.toasts.is_empty());
    assert_ne!(last.avatar.position, windowed[0].avatar.position);
}
