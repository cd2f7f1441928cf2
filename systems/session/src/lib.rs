#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The single authoritative per-frame tick shared by every rendering adapter.
//!
//! Adapters only translate device input into a [`FrameInput`] and paint the
//! resulting [`Scene`]. Everything in between happens in
//! [`Session::advance`]:
//!
//! 1. victory acknowledgement, panel close, panel actions and open requests;
//! 2. the held intent replaces the world's intent;
//! 3. the movement system proposes a step and the world writes it back;
//! 4. the interaction trigger scans the location registry when needed;
//! 5. notifications are collected and the scene is rewritten.

mod scene;
mod toasts;

use std::time::Duration;

use campus_quest_core::{Command, Event, InputIntent, Position};
use campus_quest_rendering::{FrameInput, Scene};
use campus_quest_system_interaction::InteractionTrigger;
use campus_quest_system_movement::Movement;
use campus_quest_system_panels::PanelDeck;
use campus_quest_world::{self as world, query, Campus, World};
use glam::Vec2;
use tracing::{debug, info};

pub use scene::{present_panel, PROMPT_TEXT};
pub use toasts::{ToastQueue, TOAST_LIFETIME};

/// Owns the world and every system that drives it.
#[derive(Debug)]
pub struct Session {
    world: World,
    movement: Movement,
    trigger: InteractionTrigger,
    deck: PanelDeck,
    toasts: ToastQueue,
    victory_bonus: u32,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Creates a session for `campus` with the default presenters.
    #[must_use]
    pub fn new(campus: Campus) -> Self {
        Self::with_deck(campus, PanelDeck::default())
    }

    /// Creates a session with a custom presenter deck.
    ///
    /// Locations without a presenter never open a panel.
    #[must_use]
    pub fn with_deck(campus: Campus, deck: PanelDeck) -> Self {
        let campus = campus.restrict_panels(|location| deck.serves(location));
        let world = World::with_campus(campus);
        let mut toasts = ToastQueue::default();
        toasts.push(query::welcome_banner(&world));

        Self {
            world,
            movement: Movement::default(),
            trigger: InteractionTrigger::default(),
            deck,
            toasts,
            victory_bonus: 0,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Builds a scene reflecting the current world without advancing it.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(Vec2::ZERO);
        scene::populate(
            &self.world,
            &self.deck,
            &self.toasts,
            self.victory_bonus,
            &mut scene,
        );
        scene
    }

    /// Runs one tick and rewrites `scene`.
    pub fn advance(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.events.clear();
        self.toasts.advance(dt);

        let victory_visible = query::progression(&self.world).victory_awarded();
        if victory_visible {
            if input.acknowledge_victory {
                self.execute(Command::AcknowledgeVictory);
            }
        } else {
            self.handle_panel_input(&input);
        }

        let intent = if query::progression(&self.world).victory_awarded() {
            InputIntent::NONE
        } else {
            input.intent
        };
        self.execute(Command::SetIntent { intent });

        self.movement.handle(
            &query::avatar(&self.world),
            query::map_size(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.trigger.handle(
            &self.events,
            query::avatar(&self.world).bounds(),
            query::locations(&self.world),
            query::overlap_stale(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.observe_events();
        scene::populate(
            &self.world,
            &self.deck,
            &self.toasts,
            self.victory_bonus,
            scene,
        );
    }

    fn handle_panel_input(&mut self, input: &FrameInput) {
        let interaction = query::interaction(&self.world);

        if let Some(location) = interaction.open_panel() {
            if input.close_panel {
                self.execute(Command::ClosePanel);
                return;
            }
            let Some(index) = input.panel_action else {
                return;
            };
            let Some(panel) = self.deck.present(&self.world, location) else {
                return;
            };
            match panel.activate(index) {
                Some(commands) => {
                    debug!(%location, index, "panel action");
                    self.commands.extend_from_slice(commands);
                    self.flush_commands();
                }
                None => debug!(%location, index, "panel action unavailable"),
            }
            return;
        }

        if input.interact {
            self.execute(Command::RequestPanel);
            return;
        }

        if input.pointer_activate {
            let on_active = interaction.active_location().is_some_and(|active| {
                let pointer = input.pointer_world;
                query::campus(&self.world)
                    .location(active)
                    .zip(pointer)
                    .is_some_and(|(location, point)| {
                        location.bounds.contains(Position::new(point.x, point.y))
                    })
            });
            if on_active {
                self.execute(Command::RequestPanel);
            }
        }
    }

    fn execute(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn observe_events(&mut self) {
        for event in &self.events {
            match event {
                Event::ExperienceGranted { amount, .. } => {
                    self.toasts.push(format!("+{amount} XP"));
                }
                Event::ItemGranted { name } => self.toasts.push(format!("Item: {name}")),
                Event::VictoryAwarded { bonus } => {
                    self.victory_bonus = *bonus;
                    info!(bonus, "every quest complete");
                    self.toasts.push("Victory! Every quest complete.");
                }
                Event::PanelOpened { location } => info!(%location, "panel opened"),
                Event::PanelClosed { location } => info!(%location, "panel closed"),
                Event::SessionReset { generation } => {
                    info!(generation, "session reset");
                    self.victory_bonus = 0;
                    self.toasts = ToastQueue::default();
                    self.toasts.push(query::welcome_banner(&self.world));
                }
                _ => {}
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Campus::default())
    }
}
