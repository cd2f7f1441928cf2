//! Composition of a [`Scene`] into terminal cells.

use campus_quest_rendering::{
    Color, HudPresentation, PanelLine, PanelPresentation, Scene, VictoryPresentation, Viewport,
};
use crossterm::style::Color as TermColor;
use glam::Vec2;

use crate::buffer::{Cell, CellBuffer, BACKGROUND};

/// Columns reserved on the right for the HUD.
pub(crate) const SIDEBAR_WIDTH: u16 = 30;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
const STATUS: &str = "Arrows move  E interact  Esc close  1-9/a-z act  PgUp/PgDn scroll  Q quit";

const GROUND: TermColor = TermColor::Rgb {
    r: 58,
    g: 82,
    b: 52,
};
const PANEL_BG: TermColor = TermColor::Rgb {
    r: 32,
    g: 36,
    b: 48,
};

/// Placement of the map, the HUD column and the status row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TerminalLayout {
    viewport: Viewport,
    map_columns: u16,
    map_rows: u16,
    sidebar_x: u16,
    status_row: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRect {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

impl TerminalLayout {
    pub(crate) fn compute(map_size: Vec2, columns: u16, rows: u16) -> Option<Self> {
        let map_columns = columns.checked_sub(SIDEBAR_WIDTH + 1)?;
        let map_rows = rows.checked_sub(1)?;
        let surface = Vec2::new(f32::from(map_columns), f32::from(map_rows));
        let viewport = Viewport::fit(map_size, surface, CELL_ASPECT).ok()?;

        Some(Self {
            viewport,
            map_columns,
            map_rows,
            sidebar_x: map_columns + 1,
            status_row: map_rows,
        })
    }

    /// World position under the centre of a map cell.
    pub(crate) fn cell_to_world(&self, column: u16, row: u16) -> Option<Vec2> {
        (column < self.map_columns && row < self.map_rows).then(|| {
            self.viewport
                .to_world(Vec2::new(f32::from(column) + 0.5, f32::from(row) + 0.5))
        })
    }

    fn cell_rect(&self, position: Vec2, size: Vec2) -> CellRect {
        let start = self.viewport.to_surface(position);
        let end = self.viewport.to_surface(position + size);
        let x = to_cell(start.x.floor());
        let y = to_cell(start.y.floor());
        CellRect {
            x,
            y,
            width: to_cell(end.x.ceil()).saturating_sub(x).max(1),
            height: to_cell(end.y.ceil()).saturating_sub(y).max(1),
        }
    }

    fn cell_at(&self, world: Vec2) -> (u16, u16) {
        let surface = self.viewport.to_surface(world);
        (to_cell(surface.x.floor()), to_cell(surface.y.floor()))
    }
}

fn to_cell(value: f32) -> u16 {
    value.clamp(0.0, f32::from(u16::MAX)) as u16
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb_u8();
    TermColor::Rgb { r, g, b }
}

/// Screen rows of panel actions, used to resolve mouse clicks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ActionHits {
    rows: Vec<(u16, u16, u16, usize)>,
}

impl ActionHits {
    pub(crate) fn at(&self, column: u16, row: u16) -> Option<usize> {
        self.rows
            .iter()
            .find(|(hit_row, start, end, _)| *hit_row == row && (*start..*end).contains(&column))
            .map(|(_, _, _, index)| *index)
    }
}

/// Rewrites `buffer` from `scene`. `panel_scroll` is clamped to the panel's
/// content.
pub(crate) fn compose(
    scene: &Scene,
    layout: Option<&TerminalLayout>,
    panel_scroll: &mut usize,
    buffer: &mut CellBuffer,
) -> ActionHits {
    buffer.clear();
    let Some(layout) = layout else {
        let message = "Enlarge the terminal to play Campus Quest";
        let row = buffer.height() / 2;
        let column = buffer.width().saturating_sub(message.len() as u16) / 2;
        buffer.text(column, row, message, buffer.width(), TermColor::Yellow, BACKGROUND);
        return ActionHits::default();
    };

    draw_map(scene, layout, buffer);
    draw_avatar(scene, layout, buffer);
    if let Some(prompt) = &scene.prompt {
        let (column, row) = layout.cell_at(prompt.anchor);
        let half = (prompt.text.chars().count() / 2) as u16;
        buffer.text(
            column.saturating_sub(half),
            row.saturating_sub(1),
            &prompt.text,
            layout.map_columns,
            TermColor::White,
            TermColor::Black,
        );
    }
    for (row, toast) in scene.toasts.iter().enumerate() {
        buffer.text(
            1,
            row as u16,
            toast,
            layout.map_columns.saturating_sub(1),
            TermColor::Yellow,
            TermColor::Black,
        );
    }
    draw_hud(&scene.hud, layout, buffer);
    buffer.text(
        0,
        layout.status_row,
        STATUS,
        buffer.width(),
        TermColor::DarkGrey,
        BACKGROUND,
    );

    if let Some(victory) = &scene.victory {
        draw_victory(victory, layout, buffer);
        return ActionHits::default();
    }
    match &scene.panel {
        Some(panel) => draw_panel(panel, layout, panel_scroll, buffer),
        None => ActionHits::default(),
    }
}

fn draw_map(scene: &Scene, layout: &TerminalLayout, buffer: &mut CellBuffer) {
    let map = layout.cell_rect(Vec2::ZERO, scene.map_size);
    let ground = Cell {
        ch: ' ',
        fg: TermColor::White,
        bg: GROUND,
    };
    buffer.fill(map.x, map.y, map.width, map.height, ground);

    for location in &scene.locations {
        let rect = layout.cell_rect(location.position, location.size);
        let fill = if location.focused {
            location.color.lighten(0.35)
        } else {
            location.color
        };
        let cell = Cell {
            ch: ' ',
            fg: TermColor::Black,
            bg: term_color(fill),
        };
        buffer.fill(rect.x, rect.y, rect.width, rect.height, cell);
        if location.focused {
            let edge = Cell {
                ch: '=',
                fg: TermColor::Yellow,
                bg: term_color(fill),
            };
            buffer.fill(rect.x, rect.y, rect.width, 1, edge);
            buffer.fill(rect.x, rect.y + rect.height - 1, rect.width, 1, edge);
        }
        let name: String = location.name.chars().take(usize::from(rect.width)).collect();
        buffer.overlay_text(
            rect.x,
            rect.y + u16::from(rect.height > 2),
            &name,
            TermColor::Black,
        );
    }
}

fn draw_avatar(scene: &Scene, layout: &TerminalLayout, buffer: &mut CellBuffer) {
    let rect = layout.cell_rect(scene.avatar.position, scene.avatar.size);
    let cell = Cell {
        ch: '@',
        fg: TermColor::White,
        bg: TermColor::Rgb {
            r: 40,
            g: 80,
            b: 200,
        },
    };
    buffer.fill(rect.x, rect.y, rect.width, rect.height, cell);
}

fn draw_hud(hud: &HudPresentation, layout: &TerminalLayout, buffer: &mut CellBuffer) {
    let filled = usize::from(hud.energy / 10);
    let mut lines = vec![
        ("Campus Quest".to_owned(), TermColor::Cyan),
        (format!("XP {}  Rank {}", hud.experience, hud.rank), TermColor::White),
        (
            format!(
                "Energy {:>3} [{}{}]",
                hud.energy,
                "#".repeat(filled),
                " ".repeat(10 - filled.min(10))
            ),
            TermColor::White,
        ),
        (String::new(), TermColor::White),
        ("Inventory".to_owned(), TermColor::Cyan),
    ];
    if hud.inventory.is_empty() {
        lines.push(("  (empty)".to_owned(), TermColor::DarkGrey));
    }
    lines.extend(
        hud.inventory
            .iter()
            .map(|item| (format!("  {item}"), TermColor::White)),
    );
    lines.push((String::new(), TermColor::White));
    lines.push(("Quests".to_owned(), TermColor::Cyan));
    lines.extend(hud.quests.iter().map(|quest| {
        if quest.complete {
            (format!("[x] {}", quest.label), TermColor::Green)
        } else {
            (format!("[ ] {}", quest.label), TermColor::White)
        }
    }));

    for (row, (text, color)) in lines.iter().enumerate().take(usize::from(layout.map_rows)) {
        buffer.text(
            layout.sidebar_x,
            row as u16,
            text,
            SIDEBAR_WIDTH,
            *color,
            BACKGROUND,
        );
    }
}

/// Bordered box centred over the map, with a title and a footer row.
fn draw_box(
    title: &str,
    footer: &str,
    content_rows: usize,
    layout: &TerminalLayout,
    buffer: &mut CellBuffer,
) -> CellRect {
    let width = layout.map_columns.saturating_sub(4).min(64);
    let wanted = u16::try_from(content_rows + 3).unwrap_or(u16::MAX);
    let height = wanted.min(layout.map_rows.saturating_sub(2)).max(3);
    let rect = CellRect {
        x: (layout.map_columns - width) / 2,
        y: layout.map_rows.saturating_sub(height) / 2,
        width,
        height,
    };

    let background = Cell {
        ch: ' ',
        fg: TermColor::White,
        bg: PANEL_BG,
    };
    buffer.fill(rect.x, rect.y, rect.width, rect.height, background);
    let border = Cell {
        ch: '-',
        fg: TermColor::Grey,
        bg: PANEL_BG,
    };
    buffer.fill(rect.x, rect.y, rect.width, 1, border);
    buffer.fill(rect.x, rect.y + rect.height - 1, rect.width, 1, border);
    buffer.text(
        rect.x + 2,
        rect.y,
        &format!(" {title} "),
        rect.width.saturating_sub(4),
        TermColor::Cyan,
        PANEL_BG,
    );
    buffer.text(
        rect.x + 2,
        rect.y + rect.height - 2,
        footer,
        rect.width.saturating_sub(4),
        TermColor::DarkGrey,
        PANEL_BG,
    );
    rect
}

fn draw_panel(
    panel: &PanelPresentation,
    layout: &TerminalLayout,
    panel_scroll: &mut usize,
    buffer: &mut CellBuffer,
) -> ActionHits {
    let lines: Vec<(String, TermColor, Option<usize>)> = panel
        .lines
        .iter()
        .map(|line| match line {
            PanelLine::Heading(text) => (format!("== {text} =="), TermColor::Cyan, None),
            PanelLine::Text(text) => (text.clone(), TermColor::White, None),
            PanelLine::Action {
                index,
                hotkey,
                label,
                enabled,
            } => {
                let key = hotkey.map_or_else(|| " ".to_owned(), |key| key.to_string());
                let text = format!("[{key}] {label}");
                if *enabled {
                    (text, TermColor::White, Some(*index))
                } else {
                    (text, TermColor::DarkGrey, None)
                }
            }
        })
        .collect();

    let rect = draw_box(
        &panel.title,
        "[Esc] close",
        lines.len(),
        layout,
        buffer,
    );
    let visible = usize::from(rect.height.saturating_sub(3));
    *panel_scroll = (*panel_scroll).min(lines.len().saturating_sub(visible));

    let mut hits = ActionHits::default();
    let inner = rect.width.saturating_sub(4);
    for (offset, (text, color, action)) in lines.iter().skip(*panel_scroll).take(visible).enumerate()
    {
        let row = rect.y + 1 + offset as u16;
        buffer.text(rect.x + 2, row, text, inner, *color, PANEL_BG);
        if let Some(index) = action {
            hits.rows.push((row, rect.x + 2, rect.x + 2 + inner, *index));
        }
    }

    if *panel_scroll > 0 {
        buffer.text(rect.x + rect.width - 2, rect.y + 1, "^", 1, TermColor::Yellow, PANEL_BG);
    }
    if *panel_scroll + visible < lines.len() {
        buffer.text(
            rect.x + rect.width - 2,
            rect.y + rect.height - 3,
            "v",
            1,
            TermColor::Yellow,
            PANEL_BG,
        );
    }
    hits
}

fn draw_victory(victory: &VictoryPresentation, layout: &TerminalLayout, buffer: &mut CellBuffer) {
    let lines = [
        "Victory! Every quest complete.".to_owned(),
        format!("Bonus: +{} XP", victory.bonus),
        format!("Total XP: {}", victory.experience),
    ];
    let rect = draw_box("Victory", "[Enter] play again", lines.len(), layout, buffer);
    for (offset, text) in lines.iter().enumerate() {
        buffer.text(
            rect.x + 2,
            rect.y + 1 + offset as u16,
            text,
            rect.width.saturating_sub(4),
            TermColor::Yellow,
            PANEL_BG,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_quest_core::LocationId;
    use campus_quest_rendering::{SceneAvatar, SceneLocation};

    fn scene() -> Scene {
        let mut scene = Scene::new(Vec2::new(880.0, 560.0));
        scene.locations.push(SceneLocation {
            id: LocationId::Dorm,
            name: "Dormitory".to_owned(),
            position: Vec2::new(40.0, 420.0),
            size: Vec2::new(160.0, 120.0),
            color: Color::from_rgb_u8(200, 180, 140),
            focused: true,
        });
        scene.avatar = SceneAvatar {
            position: Vec2::new(100.0, 470.0),
            size: Vec2::new(22.0, 22.0),
        };
        scene.hud.rank = "Rookie".to_owned();
        scene.hud.energy = 80;
        scene
    }

    fn panel(actions: usize) -> PanelPresentation {
        let mut lines = vec![PanelLine::Heading("Room".to_owned())];
        lines.extend((0..actions).map(|index| PanelLine::Action {
            index,
            hotkey: campus_quest_rendering::hotkey_for_action(index),
            label: format!("Action {index}"),
            enabled: index != 1,
        }));
        PanelPresentation {
            title: "Dormitory".to_owned(),
            lines,
        }
    }

    fn rows(buffer: &CellBuffer) -> Vec<String> {
        (0..buffer.height()).map(|row| buffer.row_text(row)).collect()
    }

    #[test]
    fn layout_needs_room_for_the_sidebar() {
        assert!(TerminalLayout::compute(Vec2::new(880.0, 560.0), 20, 30).is_none());
        assert!(TerminalLayout::compute(Vec2::new(880.0, 560.0), 120, 36).is_some());
    }

    #[test]
    fn cells_map_back_into_the_world() {
        let layout = TerminalLayout::compute(Vec2::new(880.0, 560.0), 120, 36).expect("fits");
        let (column, row) = layout.cell_at(Vec2::new(120.0, 480.0));
        let world = layout.cell_to_world(column, row).expect("inside map");
        assert!((world.x - 120.0).abs() < 15.0);
        assert!((world.y - 480.0).abs() < 30.0);
        assert!(layout.cell_to_world(119, 0).is_none());
    }

    #[test]
    fn map_hud_and_status_are_drawn() {
        let scene = scene();
        let layout = TerminalLayout::compute(scene.map_size, 120, 36);
        let mut buffer = CellBuffer::new(120, 36);
        let mut scroll = 0;
        let hits = compose(&scene, layout.as_ref(), &mut scroll, &mut buffer);

        let text = rows(&buffer).join("\n");
        assert!(text.contains('@'));
        assert!(text.contains("Dormitory"));
        assert!(text.contains("Rank Rookie"));
        assert!(rows(&buffer)[35].starts_with("Arrows move"));
        assert_eq!(hits, ActionHits::default());
    }

    #[test]
    fn small_terminals_show_a_hint() {
        let scene = scene();
        let mut buffer = CellBuffer::new(40, 10);
        let mut scroll = 0;
        let _ = compose(&scene, None, &mut scroll, &mut buffer);
        assert!(rows(&buffer)[5].contains("Enlarge the terminal"));
    }

    #[test]
    fn enabled_panel_actions_are_clickable() {
        let mut scene = scene();
        scene.panel = Some(panel(3));
        let layout = TerminalLayout::compute(scene.map_size, 120, 36);
        let mut buffer = CellBuffer::new(120, 36);
        let mut scroll = 0;
        let hits = compose(&scene, layout.as_ref(), &mut scroll, &mut buffer);

        let lines = rows(&buffer);
        let row = lines
            .iter()
            .position(|line| line.contains("[3] Action 2"))
            .expect("action drawn") as u16;
        let column = lines[usize::from(row)].find("[3]").expect("column") as u16;
        assert_eq!(hits.at(column, row), Some(2));

        let disabled = lines
            .iter()
            .position(|line| line.contains("[2] Action 1"))
            .expect("disabled action drawn") as u16;
        assert_eq!(hits.at(column, disabled), None);
    }

    #[test]
    fn long_panels_scroll_and_clamp() {
        let mut scene = scene();
        scene.panel = Some(panel(40));
        let layout = TerminalLayout::compute(scene.map_size, 120, 24);
        let mut buffer = CellBuffer::new(120, 24);

        let mut scroll = 1_000;
        let _ = compose(&scene, layout.as_ref(), &mut scroll, &mut buffer);
        assert!(scroll > 0 && scroll < 41);
        let text = rows(&buffer).join("\n");
        assert!(text.contains("Action 39"));
        assert!(!text.contains("== Room =="));
    }

    #[test]
    fn victory_hides_the_panel() {
        let mut scene = scene();
        scene.panel = Some(panel(2));
        scene.victory = Some(VictoryPresentation {
            bonus: 100,
            experience: 260,
        });
        let layout = TerminalLayout::compute(scene.map_size, 120, 36);
        let mut buffer = CellBuffer::new(120, 36);
        let mut scroll = 0;
        let hits = compose(&scene, layout.as_ref(), &mut scroll, &mut buffer);

        let text = rows(&buffer).join("\n");
        assert!(text.contains("Victory! Every quest complete."));
        assert!(text.contains("Total XP: 260"));
        assert_eq!(hits, ActionHits::default());
    }
}
