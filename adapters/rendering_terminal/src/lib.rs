#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering adapter for Campus Quest built on crossterm.
//!
//! The adapter keeps a mirror of what the terminal shows and repaints only the
//! cells that changed. Key and mouse events arrive asynchronously; they only
//! set latches in an [`InputTranslator`] which the shared tick drains once per
//! frame. Every mirror is discarded when the scene's generation changes.

mod buffer;
mod input;
mod view;

use std::{
    io::{self, BufWriter, Stdout},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use campus_quest_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::ResetColor,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use tracing::debug;

use self::{
    buffer::CellBuffer,
    view::{ActionHits, TerminalLayout},
};

pub use self::input::{InputTranslator, HOLD_WINDOW};

/// Rendering backend drawing into the controlling terminal.
#[derive(Clone, Copy, Debug)]
pub struct TerminalBackend {
    frame_interval: Duration,
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl TerminalBackend {
    /// Returns a backend targeting sixty frames per second.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Adapter state derived from earlier frames.
#[derive(Debug, Default)]
struct ScreenMirror {
    generation: Option<u64>,
    panel_title: Option<String>,
    panel_scroll: usize,
}

impl ScreenMirror {
    /// Discards stale mirrors. Returns whether the generation changed.
    fn sync(&mut self, scene: &Scene, back: &mut CellBuffer) -> bool {
        let reset = self.generation != Some(scene.generation);
        if reset {
            back.invalidate();
            self.generation = Some(scene.generation);
            self.panel_scroll = 0;
        }

        let title = scene.panel.as_ref().map(|panel| panel.title.as_str());
        if title != self.panel_title.as_deref() {
            self.panel_title = title.map(str::to_owned);
            self.panel_scroll = 0;
        }
        reset
    }

    fn scroll(&mut self, delta: i32) {
        let lines = delta.unsigned_abs() as usize;
        self.panel_scroll = if delta < 0 {
            self.panel_scroll.saturating_sub(lines)
        } else {
            self.panel_scroll.saturating_add(lines)
        };
    }
}

/// Raw-mode alternate screen restored on drop.
struct TerminalScreen {
    out: BufWriter<Stdout>,
    front: CellBuffer,
    back: CellBuffer,
    release_events: bool,
    active: bool,
}

impl TerminalScreen {
    fn begin() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let (columns, rows) = terminal::size().unwrap_or((80, 24));
        let mut screen = Self {
            out: BufWriter::new(io::stdout()),
            front: CellBuffer::new(columns, rows),
            back: CellBuffer::new(columns, rows),
            release_events: false,
            active: true,
        };
        screen.back.invalidate();

        execute!(
            screen.out,
            EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            Clear(ClearType::All)
        )
        .context("failed to enter the alternate screen")?;

        screen.release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if screen.release_events {
            execute!(
                screen.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .context("failed to request key release events")?;
            debug!("terminal reports key releases");
        } else {
            debug!(window = ?HOLD_WINDOW, "terminal omits key releases, holding presses");
        }
        Ok(screen)
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.front = CellBuffer::new(columns, rows);
        self.back = CellBuffer::new(columns, rows);
        self.back.invalidate();
    }

    fn end(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if self.release_events {
            queue!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;

        let mut screen = TerminalScreen::begin().context("failed to prepare the terminal")?;
        execute!(screen.out, SetTitle(&window_title)).context("failed to set the title")?;

        let outcome = run_loop(&mut screen, scene, &mut update_scene, self.frame_interval);
        let restored = screen.end().context("failed to restore the terminal");
        outcome.and(restored)
    }
}

fn run_loop<F>(
    screen: &mut TerminalScreen,
    mut scene: Scene,
    update_scene: &mut F,
    frame_interval: Duration,
) -> Result<()>
where
    F: FnMut(Duration, FrameInput, &mut Scene),
{
    let mut translator = InputTranslator::new(screen.release_events);
    let mut mirror = ScreenMirror::default();
    let mut hits = ActionHits::default();
    let mut layout = None;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => translator.key(key, Instant::now()),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    if let Some(index) = hits.at(column, row) {
                        translator.click_action(index);
                    } else if let Some(world) = layout
                        .as_ref()
                        .and_then(|layout: &TerminalLayout| layout.cell_to_world(column, row))
                    {
                        translator.click_map(world);
                    }
                }
                Event::Resize(columns, rows) => screen.resize(columns, rows),
                _ => {}
            }
        }
        if translator.quit_requested() {
            return Ok(());
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;
        update_scene(dt, translator.take_frame_input(now), &mut scene);

        if mirror.sync(&scene, &mut screen.back) {
            debug!(generation = scene.generation, "screen mirror discarded");
        }
        mirror.scroll(translator.take_scroll());
        layout = TerminalLayout::compute(scene.map_size, screen.front.width(), screen.front.height());
        hits = view::compose(&scene, layout.as_ref(), &mut mirror.panel_scroll, &mut screen.front);
        let _ = buffer::present(&mut screen.out, &screen.front, &mut screen.back)
            .context("failed to draw the frame")?;

        if let Some(remaining) = frame_interval.checked_sub(frame_start.elapsed()) {
            let _ = event::poll(remaining)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_quest_rendering::PanelPresentation;
    use glam::Vec2;

    fn scene_with_panel(title: &str, generation: u64) -> Scene {
        let mut scene = Scene::new(Vec2::new(880.0, 560.0));
        scene.generation = generation;
        scene.panel = Some(PanelPresentation {
            title: title.to_owned(),
            lines: Vec::new(),
        });
        scene
    }

    #[test]
    fn generation_change_discards_the_mirror() {
        let mut mirror = ScreenMirror::default();
        let mut back = CellBuffer::new(4, 2);
        let scene = scene_with_panel("Library", 0);
        assert!(mirror.sync(&scene, &mut back));

        let mut out = Vec::new();
        let front = CellBuffer::new(4, 2);
        assert_eq!(buffer::present(&mut out, &front, &mut back).expect("write"), 8);

        mirror.scroll(3);
        assert!(!mirror.sync(&scene, &mut back));
        assert_eq!(mirror.panel_scroll, 3);
        assert_eq!(buffer::present(&mut out, &front, &mut back).expect("write"), 0);

        let reset = scene_with_panel("Library", 1);
        assert!(mirror.sync(&reset, &mut back));
        assert_eq!(mirror.panel_scroll, 0);
        assert_eq!(buffer::present(&mut out, &front, &mut back).expect("write"), 8);
    }

    #[test]
    fn switching_panels_resets_the_scroll() {
        let mut mirror = ScreenMirror::default();
        let mut back = CellBuffer::new(1, 1);
        let _ = mirror.sync(&scene_with_panel("Library", 0), &mut back);
        mirror.scroll(5);
        mirror.scroll(-2);
        assert_eq!(mirror.panel_scroll, 3);
        mirror.scroll(-10);
        assert_eq!(mirror.panel_scroll, 0);

        mirror.scroll(2);
        let _ = mirror.sync(&scene_with_panel("Cafeteria", 0), &mut back);
        assert_eq!(mirror.panel_scroll, 0);
    }
}
