//! Translation of asynchronously delivered terminal events into frame input.
//!
//! Terminals report key presses as discrete events. When the keyboard
//! enhancement protocol is available, releases are reported too and a held
//! arrow stays held until its release arrives. Otherwise every press or
//! auto-repeat keeps the direction held for [`HOLD_WINDOW`].

use std::time::{Duration, Instant};

use campus_quest_core::{Direction, InputIntent};
use campus_quest_rendering::{action_for_hotkey, FrameInput};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glam::Vec2;

/// How long a press keeps a direction held when releases are not reported.
pub const HOLD_WINDOW: Duration = Duration::from_millis(180);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Hold {
    #[default]
    Released,
    Until(Instant),
    Latched,
}

/// Per-direction hold state.
#[derive(Clone, Debug, Default)]
struct HeldKeys {
    release_events: bool,
    holds: [Hold; 4],
}

impl HeldKeys {
    fn slot(direction: Direction) -> usize {
        match direction {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    fn press(&mut self, direction: Direction, now: Instant) {
        self.holds[Self::slot(direction)] = if self.release_events {
            Hold::Latched
        } else {
            Hold::Until(now + HOLD_WINDOW)
        };
    }

    fn release(&mut self, direction: Direction) {
        self.release_events = true;
        self.holds[Self::slot(direction)] = Hold::Released;
    }

    fn intent(&self, now: Instant) -> InputIntent {
        Direction::ALL
            .iter()
            .fold(InputIntent::NONE, |intent, direction| {
                let held = match self.holds[Self::slot(*direction)] {
                    Hold::Released => false,
                    Hold::Until(deadline) => now < deadline,
                    Hold::Latched => true,
                };
                intent.with(*direction, held)
            })
    }
}

/// Accumulates terminal events between ticks.
///
/// Events only set latches here; [`InputTranslator::take_frame_input`]
/// consumes them once per frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct InputTranslator {
    held: HeldKeys,
    interact: bool,
    close_panel: bool,
    acknowledge_victory: bool,
    panel_action: Option<usize>,
    pointer_world: Option<Vec2>,
    pointer_activate: bool,
    scroll: i32,
    quit: bool,
}

impl InputTranslator {
    /// Creates a translator. `release_events` states whether the terminal
    /// reports key releases.
    #[must_use]
    pub fn new(release_events: bool) -> Self {
        Self {
            held: HeldKeys {
                release_events,
                ..HeldKeys::default()
            },
            ..Self::default()
        }
    }

    /// Records a key event observed at `now`.
    pub fn key(&mut self, event: KeyEvent, now: Instant) {
        if let Some(direction) = arrow_direction(event.code) {
            match event.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => self.held.press(direction, now),
                KeyEventKind::Release => self.held.release(direction),
            }
            return;
        }

        if event.kind != KeyEventKind::Press {
            return;
        }

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char('q' | 'Q') => self.quit = true,
            KeyCode::Char('e' | 'E') => self.interact = true,
            KeyCode::Esc => self.close_panel = true,
            KeyCode::Enter => self.acknowledge_victory = true,
            KeyCode::PageUp => self.scroll -= 1,
            KeyCode::PageDown => self.scroll += 1,
            KeyCode::Char(character) => {
                if self.panel_action.is_none() {
                    self.panel_action = action_for_hotkey(character);
                }
            }
            _ => {}
        }
    }

    /// Records a click on the map at `world`.
    pub fn click_map(&mut self, world: Vec2) {
        self.pointer_world = Some(world);
        self.pointer_activate = true;
    }

    /// Records a click on a panel action row.
    pub fn click_action(&mut self, index: usize) {
        let _ = self.panel_action.get_or_insert(index);
    }

    /// Whether quitting was requested.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Returns and clears the accumulated panel scroll in lines.
    pub fn take_scroll(&mut self) -> i32 {
        std::mem::take(&mut self.scroll)
    }

    /// Consumes the latched edges and samples the held directions at `now`.
    pub fn take_frame_input(&mut self, now: Instant) -> FrameInput {
        FrameInput {
            intent: self.held.intent(now),
            interact: std::mem::take(&mut self.interact),
            close_panel: std::mem::take(&mut self.close_panel),
            panel_action: self.panel_action.take(),
            pointer_world: self.pointer_world.take(),
            pointer_activate: std::mem::take(&mut self.pointer_activate),
            acknowledge_victory: std::mem::take(&mut self.acknowledge_victory),
        }
    }
}

fn arrow_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}
