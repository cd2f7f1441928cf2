//! Rewrites the rendering scene from the world after every tick.

use campus_quest_core::{LocationId, Position, QuestId, Size};
use campus_quest_rendering::{
    hotkey_for_action, Color, HudPresentation, PanelLine, PanelPresentation, PromptPresentation,
    QuestLine, Scene, SceneAvatar, SceneLocation, VictoryPresentation,
};
use campus_quest_system_panels::{Panel, PanelDeck, PanelEntry};
use campus_quest_world::{query, World};
use glam::Vec2;

use crate::toasts::ToastQueue;

/// Caption of the interaction prompt.
pub const PROMPT_TEXT: &str = "Press E to interact";

pub(crate) fn populate(
    world: &World,
    deck: &PanelDeck,
    toasts: &ToastQueue,
    victory_bonus: u32,
    scene: &mut Scene,
) {
    let interaction = query::interaction(world);
    let avatar = query::avatar(world);
    let progression = query::progression(world);

    scene.map_size = size_to_vec(query::map_size(world));
    scene.locations.clear();
    scene
        .locations
        .extend(query::locations(world).iter().map(|location| SceneLocation {
            id: location.id,
            name: location.name.clone(),
            position: position_to_vec(location.bounds.origin()),
            size: size_to_vec(location.bounds.size()),
            color: location_color(location.id),
            focused: interaction.highlighted() == Some(location.id),
        }));

    scene.avatar = SceneAvatar {
        position: position_to_vec(avatar.position),
        size: size_to_vec(avatar.size),
    };
    scene.prompt = interaction.prompt_visible().then(|| PromptPresentation {
        anchor: Vec2::new(
            avatar.position.x + avatar.size.width * 0.5,
            avatar.position.y,
        ),
        text: PROMPT_TEXT.to_owned(),
    });
    scene.panel = interaction
        .open_panel()
        .and_then(|location| deck.present(world, location))
        .map(|panel| present_panel(&panel));

    scene.hud = HudPresentation {
        experience: progression.experience(),
        rank: progression.rank().label().to_owned(),
        energy: progression.energy(),
        inventory: progression.inventory().map(str::to_owned).collect(),
        quests: QuestId::ALL
            .iter()
            .map(|quest| QuestLine {
                label: quest.label().to_owned(),
                complete: progression.quest_complete(*quest),
            })
            .collect(),
    };
    scene.toasts.clear();
    scene.toasts.extend(toasts.texts().map(str::to_owned));
    scene.victory = progression
        .victory_awarded()
        .then(|| VictoryPresentation {
            bonus: victory_bonus,
            experience: progression.experience(),
        });
    scene.generation = query::generation(world);
}

/// Flattens a panel into presentation lines with action indices and hotkeys.
pub fn present_panel(panel: &Panel) -> PanelPresentation {
    let mut index = 0;
    let lines = panel
        .entries()
        .iter()
        .map(|entry| match entry {
            PanelEntry::Heading(text) => PanelLine::Heading(text.clone()),
            PanelEntry::Text(text) => PanelLine::Text(text.clone()),
            PanelEntry::Action(action) => {
                let line = PanelLine::Action {
                    index,
                    hotkey: hotkey_for_action(index),
                    label: action.label.clone(),
                    enabled: action.enabled,
                };
                index += 1;
                line
            }
        })
        .collect();

    PanelPresentation {
        title: panel.title().to_owned(),
        lines,
    }
}

fn location_color(id: LocationId) -> Color {
    match id {
        LocationId::Dorm => Color::from_rgb_u8(0x6d, 0x8f, 0xd4),
        LocationId::Classroom => Color::from_rgb_u8(0xe0, 0xa4, 0x58),
        LocationId::Library => Color::from_rgb_u8(0x8f, 0x6b, 0xc9),
        LocationId::Cafeteria => Color::from_rgb_u8(0x5c, 0xb8, 0x7a),
        LocationId::Admin => Color::from_rgb_u8(0xc9, 0x5f, 0x6b),
    }
}

fn position_to_vec(position: Position) -> Vec2 {
    Vec2::new(position.x, position.y)
}

fn size_to_vec(size: Size) -> Vec2 {
    Vec2::new(size.width, size.height)
}
