#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Campus Quest adapters.

use anyhow::Result as AnyResult;
use campus_quest_core::{InputIntent, LocationId};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Keys bound to panel actions, in action order. `e` and `q` are left out
/// because they interact and quit.
pub const ACTION_HOTKEYS: &str = "123456789abcdfghijklmnoprstuvwxyz";

/// Hotkey bound to the panel action at `index`.
#[must_use]
pub fn hotkey_for_action(index: usize) -> Option<char> {
    ACTION_HOTKEYS.chars().nth(index)
}

/// Panel action index bound to `key`, ignoring case.
#[must_use]
pub fn action_for_hotkey(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    ACTION_HOTKEYS.chars().position(|candidate| candidate == key)
}

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Channels quantised to bytes, alpha dropped.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            quantise(self.red),
            quantise(self.green),
            quantise(self.blue),
        )
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn quantise(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directions held during this frame.
    pub intent: InputIntent,
    /// Whether the interact key was pressed on this frame.
    pub interact: bool,
    /// Whether the close key was pressed on this frame.
    pub close_panel: bool,
    /// Panel action selected on this frame.
    pub panel_action: Option<usize>,
    /// Pointer position in world units, when the pointer is over the map.
    pub pointer_world: Option<Vec2>,
    /// Whether the pointer was pressed on this frame.
    pub pointer_activate: bool,
    /// Whether the victory surface was acknowledged on this frame.
    pub acknowledge_victory: bool,
}

/// Location drawn on the campus map.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLocation {
    /// Identifier of the location.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Extent in world units.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
    /// Whether the location is the active location.
    pub focused: bool,
}

impl SceneLocation {
    /// Reports whether `point` lies inside the location, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.position + self.size;
        point.x >= self.position.x && point.y >= self.position.y && point.x <= max.x && point.y <= max.y
    }
}

/// Player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneAvatar {
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Extent in world units.
    pub size: Vec2,
}

/// "Press to interact" affordance shown above the avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptPresentation {
    /// World position the prompt is centred on.
    pub anchor: Vec2,
    /// Prompt caption.
    pub text: String,
}

/// Line of a presented panel.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelLine {
    /// Section title.
    Heading(String),
    /// Informational line.
    Text(String),
    /// Activatable element.
    Action {
        /// Action index used by [`FrameInput::panel_action`].
        index: usize,
        /// Key bound to the action, if any.
        hotkey: Option<char>,
        /// Button caption.
        label: String,
        /// Whether the action can currently be activated.
        enabled: bool,
    },
}

/// Modal panel of the active location.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelPresentation {
    /// Panel title.
    pub title: String,
    /// Content in display order.
    pub lines: Vec<PanelLine>,
}

/// Quest checklist entry.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestLine {
    /// Checklist label.
    pub label: String,
    /// Whether the quest is complete.
    pub complete: bool,
}

/// Heads-up display of the player's progression.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Accumulated experience.
    pub experience: u32,
    /// Rank label.
    pub rank: String,
    /// Energy in `0..=100`.
    pub energy: u8,
    /// Inventory item names.
    pub inventory: Vec<String>,
    /// Quest checklist in declaration order.
    pub quests: Vec<QuestLine>,
}

/// Victory overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct VictoryPresentation {
    /// Bonus experience that was granted.
    pub bonus: u32,
    /// Final experience.
    pub experience: u32,
}

/// Scene description combining the campus map, the avatar and the overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Extent of the walkable map in world units.
    pub map_size: Vec2,
    /// Locations in declaration order.
    pub locations: Vec<SceneLocation>,
    /// Player avatar.
    pub avatar: SceneAvatar,
    /// Interaction prompt, when visible.
    pub prompt: Option<PromptPresentation>,
    /// Open panel, when any.
    pub panel: Option<PanelPresentation>,
    /// Progression summary.
    pub hud: HudPresentation,
    /// Live notifications, oldest first.
    pub toasts: Vec<String>,
    /// Victory overlay, when visible.
    pub victory: Option<VictoryPresentation>,
    /// Session counter; retained adapters discard mirrors when it changes.
    pub generation: u64,
}

impl Scene {
    /// Creates an empty scene for a map of the provided size.
    #[must_use]
    pub fn new(map_size: Vec2) -> Self {
        Self {
            map_size,
            locations: Vec::new(),
            avatar: SceneAvatar {
                position: Vec2::ZERO,
                size: Vec2::ZERO,
            },
            prompt: None,
            panel: None,
            hud: HudPresentation::default(),
            toasts: Vec::new(),
            victory: None,
            generation: 0,
        }
    }

    /// Location under `point`, first declared wins.
    #[must_use]
    pub fn location_at(&self, point: Vec2) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|location| location.contains(point))
            .map(|location| location.id)
    }
}

/// Uniform mapping between world units and an adapter surface.
///
/// The map is scaled to fit the surface while preserving its aspect ratio.
/// `cell_aspect` is the height of one surface unit divided by its width, which
/// is 1.0 for pixels and roughly 2.0 for terminal cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: Vec2,
    offset: Vec2,
    surface: Vec2,
}

impl Viewport {
    /// Fits a map of `map_size` world units onto a surface of `surface` units.
    pub fn fit(map_size: Vec2, surface: Vec2, cell_aspect: f32) -> Result<Self, RenderingError> {
        if !(map_size.x > 0.0 && map_size.y > 0.0) {
            return Err(RenderingError::EmptyMap);
        }
        if !(surface.x >= 1.0 && surface.y >= 1.0 && cell_aspect > 0.0) {
            return Err(RenderingError::SurfaceTooSmall {
                width: surface.x,
                height: surface.y,
            });
        }

        let horizontal = surface.x / map_size.x;
        let vertical = surface.y * cell_aspect / map_size.y;
        let uniform = horizontal.min(vertical);
        let scale = Vec2::new(uniform, uniform / cell_aspect);
        let used = map_size * scale;
        let offset = ((surface - used) * 0.5).max(Vec2::ZERO);

        Ok(Self {
            scale,
            offset,
            surface,
        })
    }

    /// Converts a world position into surface units.
    #[must_use]
    pub fn to_surface(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    /// Converts a world extent into surface units.
    #[must_use]
    pub fn extent_to_surface(&self, extent: Vec2) -> Vec2 {
        extent * self.scale
    }

    /// Converts a surface position back into world units.
    #[must_use]
    pub fn to_world(&self, surface: Vec2) -> Vec2 {
        (surface - self.offset) / self.scale
    }

    /// Extent of the surface the viewport was fitted to.
    #[must_use]
    pub const fn surface(&self) -> Vec2 {
        self.surface
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Campus Quest scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the per-frame input captured by the adapter, and rewrites the scene
    /// before it is rendered. Adapters never simulate on their own.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The map has no area to draw.
    EmptyMap,
    /// The drawing surface cannot hold a single unit.
    SurfaceTooSmall {
        /// Surface width.
        width: f32,
        /// Surface height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "map must have a positive width and height"),
            Self::SurfaceTooSmall { width, height } => {
                write!(f, "surface of {width}x{height} is too small to draw on")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkeys_round_trip_and_skip_reserved_keys() {
        assert_eq!(hotkey_for_action(0), Some('1'));
        assert_eq!(hotkey_for_action(9), Some('a'));
        assert_eq!(action_for_hotkey('A'), Some(9));
        assert_eq!(action_for_hotkey('e'), None);
        assert_eq!(action_for_hotkey('q'), None);
        assert_eq!(hotkey_for_action(ACTION_HOTKEYS.len()), None);
    }

    #[test]
    fn viewport_preserves_aspect_on_pixels() {
        let viewport =
            Viewport::fit(Vec2::new(880.0, 560.0), Vec2::new(1760.0, 1400.0), 1.0).expect("fits");
        assert_eq!(viewport.to_surface(Vec2::ZERO), Vec2::new(0.0, 140.0));
        assert_eq!(
            viewport.to_surface(Vec2::new(880.0, 560.0)),
            Vec2::new(1760.0, 1260.0)
        );
        assert_eq!(
            viewport.to_world(Vec2::new(880.0, 700.0)),
            Vec2::new(440.0, 280.0)
        );
    }

    #[test]
    fn viewport_compensates_for_tall_cells() {
        let viewport =
            Viewport::fit(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), 2.0).expect("fits");
        let extent = viewport.extent_to_surface(Vec2::new(100.0, 100.0));
        assert_eq!(extent, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn viewport_rejects_degenerate_inputs() {
        assert_eq!(
            Viewport::fit(Vec2::ZERO, Vec2::new(10.0, 10.0), 1.0),
            Err(RenderingError::EmptyMap)
        );
        assert!(matches!(
            Viewport::fit(Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0), 1.0),
            Err(RenderingError::SurfaceTooSmall { .. })
        ));
    }

    #[test]
    fn location_lookup_uses_declaration_order() {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        for (id, x) in [(LocationId::Library, 0.0), (LocationId::Admin, 10.0)] {
            scene.locations.push(SceneLocation {
                id,
                name: id.key().to_owned(),
                position: Vec2::new(x, 0.0),
                size: Vec2::new(20.0, 20.0),
                color: Color::from_rgb_u8(0, 0, 0),
                focused: false,
            });
        }
        assert_eq!(scene.location_at(Vec2::new(15.0, 5.0)), Some(LocationId::Library));
        assert_eq!(scene.location_at(Vec2::new(25.0, 5.0)), Some(LocationId::Admin));
        assert_eq!(scene.location_at(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn color_quantises_channels() {
        assert_eq!(Color::from_rgb_u8(10, 20, 30).to_rgb_u8(), (10, 20, 30));
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).to_rgb_u8(), (255, 0, 128));
    }
}
