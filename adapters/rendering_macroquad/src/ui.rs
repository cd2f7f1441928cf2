//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use campus_quest_rendering::{HudPresentation, PanelLine, PanelPresentation, VictoryPresentation};
use glam::Vec2;
use macroquad::{
    color::{Color, WHITE},
    math::{vec2, RectOffset},
    ui::{hash, Skin, Ui},
};

/// Buttons pressed inside the location panel this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PanelUiResult {
    /// Index of the first action button pressed.
    pub(crate) action: Option<usize>,
    /// Whether the close button was pressed.
    pub(crate) close: bool,
}

fn campus_skin(ui: &mut Ui) -> Skin {
    let background = Color::from_rgba(32, 36, 48, 235);
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    skin.window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .color_selected(background)
        .color_selected_hovered(background)
        .color_inactive(background)
        .text_color(WHITE)
        .margin(RectOffset::new(14.0, 14.0, 14.0, 14.0))
        .build();

    skin.label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 3.0, 3.0))
        .build();

    skin.button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(58, 92, 150, 255))
        .color_hovered(Color::from_rgba(78, 118, 186, 255))
        .color_clicked(Color::from_rgba(44, 70, 116, 255))
        .color_selected(Color::from_rgba(58, 92, 150, 255))
        .color_selected_hovered(Color::from_rgba(78, 118, 186, 255))
        .color_inactive(Color::from_rgba(60, 60, 60, 200))
        .margin(RectOffset::new(6.0, 6.0, 6.0, 6.0))
        .build();

    skin
}

fn action_caption(hotkey: Option<char>, label: &str) -> String {
    match hotkey {
        Some(key) => format!("[{key}] {label}"),
        None => label.to_owned(),
    }
}

/// Renders the modal panel of the active location.
pub(crate) fn draw_panel(
    ui: &mut Ui,
    panel: &PanelPresentation,
    origin: Vec2,
    size: Vec2,
) -> PanelUiResult {
    let skin = campus_skin(ui);
    ui.push_skin(&skin);

    let mut result = PanelUiResult::default();
    let _ = ui.window(
        hash!("location_panel"),
        vec2(origin.x, origin.y),
        vec2(size.x, size.y),
        |ui| {
            ui.label(None, &panel.title);
            for line in &panel.lines {
                match line {
                    PanelLine::Heading(text) => {
                        ui.separator();
                        ui.label(None, &format!("== {text} =="));
                    }
                    PanelLine::Text(text) => ui.label(None, text),
                    PanelLine::Action {
                        index,
                        hotkey,
                        label,
                        enabled,
                    } => {
                        let caption = action_caption(*hotkey, label);
                        if !*enabled {
                            ui.label(None, &format!("   {caption}"));
                        } else if ui.button(None, caption.as_str()) {
                            let _ = result.action.get_or_insert(*index);
                        }
                    }
                }
            }
            ui.separator();
            if ui.button(None, "Close [Esc]") {
                result.close = true;
            }
        },
    );

    ui.pop_skin();
    result
}

/// Renders experience, rank, energy, inventory and the quest checklist.
pub(crate) fn draw_hud(ui: &mut Ui, hud: &HudPresentation, origin: Vec2, size: Vec2) {
    let skin = campus_skin(ui);
    ui.push_skin(&skin);

    let _ = ui.window(
        hash!("hud"),
        vec2(origin.x, origin.y),
        vec2(size.x, size.y),
        |ui| {
            ui.label(None, &format!("XP: {}", hud.experience));
            ui.label(None, &format!("Rank: {}", hud.rank));
            ui.label(None, &format!("Energy: {}", hud.energy));

            ui.separator();
            ui.label(None, "Inventory");
            if hud.inventory.is_empty() {
                ui.label(None, "  (empty)");
            }
            for item in &hud.inventory {
                ui.label(None, &format!("  {item}"));
            }

            ui.separator();
            ui.label(None, "Quests");
            for quest in &hud.quests {
                let mark = if quest.complete { "x" } else { " " };
                ui.label(None, &format!("[{mark}] {}", quest.label));
            }
        },
    );

    ui.pop_skin();
}

/// Renders the victory overlay and reports whether it was dismissed.
pub(crate) fn draw_victory(
    ui: &mut Ui,
    victory: &VictoryPresentation,
    origin: Vec2,
    size: Vec2,
) -> bool {
    let skin = campus_skin(ui);
    ui.push_skin(&skin);

    let mut dismissed = false;
    let _ = ui.window(
        hash!("victory"),
        vec2(origin.x, origin.y),
        vec2(size.x, size.y),
        |ui| {
            ui.label(None, "Victory! Every quest complete.");
            ui.label(None, &format!("Bonus: +{} XP", victory.bonus));
            ui.label(None, &format!("Total XP: {}", victory.experience));
            ui.separator();
            dismissed = ui.button(None, "Play Again [Enter]");
        },
    );

    ui.pop_skin();
    dismissed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions_show_the_bound_key() {
        assert_eq!(action_caption(Some('3'), "Eat Meal"), "[3] Eat Meal");
        assert_eq!(action_caption(None, "Eat Meal"), "Eat Meal");
    }
}
