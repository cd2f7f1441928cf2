#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Campus Quest.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without its default `audio` feature.
//!
//! The map is drawn with plain shapes. Panels, the HUD and the victory overlay
//! use Macroquad's immediate-mode UI; every UI call lives in the local `ui`
//! module so Macroquad UI types stay out of the renderer.

mod ui;

use self::ui::{draw_hud, draw_panel, draw_victory, PanelUiResult};
use anyhow::Result;
use campus_quest_core::{Direction, InputIntent};
use campus_quest_rendering::{
    action_for_hotkey, Color, FrameInput, Presentation, PromptPresentation, RenderingBackend,
    Scene, Viewport,
};
use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, BLACK, WHITE, YELLOW},
    input::{
        get_char_pressed, is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position,
        KeyCode, MouseButton,
    },
    math::vec2,
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
    ui::root_ui,
};
use std::time::Duration;
use tracing::info;

/// Width of the HUD column on the right of the window.
const SIDEBAR_WIDTH: f32 = 300.0;
const MARGIN: f32 = 16.0;
const LABEL_SIZE: f32 = 20.0;
const TOAST_SIZE: f32 = 24.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PanelInputState {
    action_latched: Option<usize>,
    close_latched: bool,
    acknowledge_latched: bool,
}

impl PanelInputState {
    /// Records a panel button press. The first press of a frame wins.
    pub fn register_action(&mut self, index: usize) {
        let _ = self.action_latched.get_or_insert(index);
    }

    /// Returns the latched panel action and clears it so it fires once.
    pub fn take_action(&mut self) -> Option<usize> {
        self.action_latched.take()
    }

    /// Records that the panel's close button was pressed.
    pub fn register_close(&mut self) {
        self.close_latched = true;
    }

    /// Returns whether a close was latched and clears the latch.
    pub fn take_close(&mut self) -> bool {
        std::mem::take(&mut self.close_latched)
    }

    /// Records that the victory overlay was dismissed.
    pub fn register_acknowledge(&mut self) {
        self.acknowledge_latched = true;
    }

    /// Returns whether an acknowledgement was latched and clears the latch.
    pub fn take_acknowledge(&mut self) -> bool {
        std::mem::take(&mut self.acknowledge_latched)
    }
}

/// Device state observed at the start of a frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceSnapshot {
    /// Arrow keys currently held.
    pub intent: InputIntent,
    /// `E` pressed this frame.
    pub interact: bool,
    /// `Escape` pressed this frame.
    pub escape: bool,
    /// `Enter` pressed this frame.
    pub enter: bool,
    /// Characters typed this frame.
    pub typed: Vec<char>,
    /// Pointer in world units when it hovers the map.
    pub pointer_world: Option<Vec2>,
    /// Left button pressed this frame outside any UI window.
    pub pointer_pressed: bool,
}

impl DeviceSnapshot {
    fn poll(layout: Option<&Layout>, over_ui: bool) -> Self {
        let intent = Direction::ALL
            .iter()
            .fold(InputIntent::NONE, |intent, direction| {
                intent.with(*direction, is_key_down(arrow_key(*direction)))
            });

        let mut typed = Vec::new();
        while let Some(character) = get_char_pressed() {
            typed.push(character);
        }

        let (x, y) = mouse_position();
        let pointer_world = layout
            .filter(|_| !over_ui)
            .map(|layout| layout.to_world(Vec2::new(x, y)));

        Self {
            intent,
            interact: is_key_pressed(KeyCode::E),
            escape: is_key_pressed(KeyCode::Escape),
            enter: is_key_pressed(KeyCode::Enter),
            typed,
            pointer_world,
            pointer_pressed: !over_ui && is_mouse_button_pressed(MouseButton::Left),
        }
    }

    /// Merges the snapshot with latched UI interactions into one frame input.
    pub fn frame_input(&self, latch: &mut PanelInputState) -> FrameInput {
        let button_action = latch.take_action();
        let button_close = latch.take_close();
        let button_acknowledge = latch.take_acknowledge();

        let panel_action = button_action.or_else(|| {
            self.typed
                .iter()
                .find_map(|character| action_for_hotkey(*character))
        });

        FrameInput {
            intent: self.intent,
            interact: self.interact,
            close_panel: self.escape || button_close,
            panel_action,
            pointer_world: self.pointer_world,
            pointer_activate: self.pointer_pressed && self.pointer_world.is_some(),
            acknowledge_victory: self.enter || button_acknowledge,
        }
    }
}

fn arrow_key(direction: Direction) -> KeyCode {
    match direction {
        Direction::Up => KeyCode::Up,
        Direction::Down => KeyCode::Down,
        Direction::Left => KeyCode::Left,
        Direction::Right => KeyCode::Right,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Screen placement of the map and the HUD column.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    origin: Vec2,
    viewport: Viewport,
    sidebar_origin: Vec2,
    sidebar_size: Vec2,
}

impl Layout {
    fn compute(map_size: Vec2, screen: Vec2) -> Option<Self> {
        let origin = Vec2::splat(MARGIN);
        let map_area = Vec2::new(
            screen.x - SIDEBAR_WIDTH - MARGIN * 3.0,
            screen.y - MARGIN * 2.0,
        );
        let viewport = Viewport::fit(map_size, map_area, 1.0).ok()?;

        Some(Self {
            origin,
            viewport,
            sidebar_origin: Vec2::new(screen.x - SIDEBAR_WIDTH - MARGIN, MARGIN),
            sidebar_size: Vec2::new(SIDEBAR_WIDTH, (screen.y - MARGIN * 2.0).max(0.0)),
        })
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        self.origin + self.viewport.to_surface(world)
    }

    fn extent(&self, extent: Vec2) -> Vec2 {
        self.viewport.extent_to_surface(extent)
    }

    fn to_world(&self, screen: Vec2) -> Vec2 {
        self.viewport.to_world(screen - self.origin)
    }

    /// Panel window placement centred over the map.
    fn panel_rect(&self, map_size: Vec2) -> (Vec2, Vec2) {
        let top_left = self.to_screen(Vec2::ZERO);
        let extent = self.extent(map_size);
        let size = Vec2::new((extent.x * 0.7).max(320.0), (extent.y * 0.85).max(240.0));
        (top_left + (extent - size) * 0.5, size)
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1240,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut latch = PanelInputState::default();

            loop {
                if is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(background);
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let layout_before = Layout::compute(scene.map_size, screen);
                let (mouse_x, mouse_y) = mouse_position();
                let over_ui = root_ui().is_mouse_over(vec2(mouse_x, mouse_y));
                let snapshot = DeviceSnapshot::poll(layout_before.as_ref(), over_ui);
                let frame_input = snapshot.frame_input(&mut latch);

                update_scene(frame_dt, frame_input, &mut scene);

                let Some(layout) = Layout::compute(scene.map_size, screen) else {
                    macroquad::window::next_frame().await;
                    continue;
                };
                draw_map(&scene, &layout);
                draw_avatar(&scene, &layout);
                if let Some(prompt) = &scene.prompt {
                    draw_prompt(prompt, &layout);
                }
                draw_toasts(&scene.toasts, &layout);

                {
                    let mut ui = root_ui();
                    draw_hud(&mut ui, &scene.hud, layout.sidebar_origin, layout.sidebar_size);

                    if let Some(victory) = &scene.victory {
                        let (origin, size) = layout.panel_rect(scene.map_size);
                        if draw_victory(&mut ui, victory, origin, size) {
                            latch.register_acknowledge();
                        }
                    } else if let Some(panel) = &scene.panel {
                        let (origin, size) = layout.panel_rect(scene.map_size);
                        let PanelUiResult { action, close } =
                            draw_panel(&mut ui, panel, origin, size);
                        if let Some(index) = action {
                            latch.register_action(index);
                        }
                        if close {
                            latch.register_close();
                        }
                    }
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!("frame rate: {per_second:.1} fps");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_map(scene: &Scene, layout: &Layout) {
    let top_left = layout.to_screen(Vec2::ZERO);
    let extent = layout.extent(scene.map_size);
    draw_rectangle(
        top_left.x,
        top_left.y,
        extent.x,
        extent.y,
        MacroquadColor::from_rgba(226, 236, 214, 255),
    );

    for location in &scene.locations {
        let position = layout.to_screen(location.position);
        let size = layout.extent(location.size);
        let fill = if location.focused {
            location.color.lighten(0.35)
        } else {
            location.color
        };
        draw_rectangle(
            position.x,
            position.y,
            size.x,
            size.y,
            to_macroquad_color(fill),
        );
        if location.focused {
            draw_rectangle_lines(position.x, position.y, size.x, size.y, 3.0, YELLOW);
        }
        let _ = draw_text(
            &location.name,
            position.x + 6.0,
            position.y + LABEL_SIZE,
            LABEL_SIZE,
            BLACK,
        );
    }
}

fn draw_avatar(scene: &Scene, layout: &Layout) {
    let position = layout.to_screen(scene.avatar.position);
    let size = layout.extent(scene.avatar.size);
    draw_rectangle(
        position.x,
        position.y,
        size.x,
        size.y,
        MacroquadColor::from_rgba(40, 80, 200, 255),
    );
    draw_rectangle_lines(position.x, position.y, size.x, size.y, 2.0, BLACK);
}

fn draw_prompt(prompt: &PromptPresentation, layout: &Layout) {
    let anchor = layout.to_screen(prompt.anchor);
    let dimensions = measure_text(&prompt.text, None, LABEL_SIZE as u16, 1.0);
    let x = anchor.x - dimensions.width * 0.5;
    let y = anchor.y - 8.0;
    draw_rectangle(
        x - 4.0,
        y - dimensions.height - 4.0,
        dimensions.width + 8.0,
        dimensions.height + 8.0,
        MacroquadColor::from_rgba(0, 0, 0, 180),
    );
    let _ = draw_text(&prompt.text, x, y, LABEL_SIZE, WHITE);
}

fn draw_toasts(toasts: &[String], layout: &Layout) {
    let top_left = layout.to_screen(Vec2::ZERO);
    for (row, toast) in toasts.iter().enumerate() {
        let y = top_left.y + TOAST_SIZE * (row as f32 + 1.5);
        let _ = draw_text(toast, top_left.x + 12.0, y, TOAST_SIZE, BLACK);
    }
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}
