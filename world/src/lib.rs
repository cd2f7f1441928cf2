#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Campus Quest.
//!
//! The [`World`] is the single owner of every mutable field of a session. It is
//! only ever changed through [`apply`], which executes one [`Command`] and
//! reports the resulting [`Event`]s. Read access goes through [`query`].

mod campus;
mod progression;

use std::collections::BTreeSet;

use campus_quest_core::{
    Command, CourseLedger, DepartmentId, DepartmentSelection, Event, FlagId, InputIntent,
    InteractionState, Position, QuestId, SchoolId, WELCOME_BANNER,
};
use tracing::debug;

pub use campus::{Campus, CampusError, Catalog, Department, School};

/// Progression bookkeeping that is not a plain quest or flag.
#[derive(Clone, Debug, Default, PartialEq)]
struct Meta {
    school: Option<SchoolId>,
    department: Option<DepartmentSelection>,
    program: CourseLedger<SchoolId>,
    departments: CourseLedger<(SchoolId, DepartmentId)>,
    books_read: u32,
}

/// Represents the complete state of a campus session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    campus: Campus,
    position: Position,
    intent: InputIntent,
    energy: u8,
    experience: u32,
    inventory: BTreeSet<String>,
    quests: BTreeSet<QuestId>,
    flags: BTreeSet<FlagId>,
    meta: Meta,
    interaction: InteractionState,
    victory_awarded: bool,
    generation: u64,
    overlap_stale: bool,
}

impl World {
    /// Creates a world using the built-in campus.
    #[must_use]
    pub fn new() -> Self {
        Self::with_campus(Campus::default())
    }

    /// Creates a world for the provided campus.
    #[must_use]
    pub fn with_campus(campus: Campus) -> Self {
        Self {
            banner: WELCOME_BANNER,
            position: campus.spawn(),
            intent: InputIntent::NONE,
            energy: campus.initial_energy(),
            experience: 0,
            inventory: BTreeSet::new(),
            quests: BTreeSet::new(),
            flags: BTreeSet::new(),
            meta: Meta::default(),
            interaction: InteractionState::Idle,
            victory_awarded: false,
            generation: 0,
            overlap_stale: true,
            campus,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let generation = self.generation.wrapping_add(1);
        let campus = std::mem::take(&mut self.campus);
        *self = Self::with_campus(campus);
        self.generation = generation;
        out_events.push(Event::SessionReset { generation });
    }

    fn transition(&mut self, next: InteractionState, out_events: &mut Vec<Event>) {
        let previous = self.interaction;
        if previous == next {
            return;
        }
        self.interaction = next;
        out_events.push(Event::InteractionChanged {
            from: previous,
            to: next,
        });

        match (previous.open_panel(), next.open_panel()) {
            (Some(closed), Some(opened)) if closed != opened => {
                out_events.push(Event::PanelClosed { location: closed });
                out_events.push(Event::PanelOpened { location: opened });
            }
            (Some(closed), None) => out_events.push(Event::PanelClosed { location: closed }),
            (None, Some(opened)) => out_events.push(Event::PanelOpened { location: opened }),
            _ => {}
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes the provided command against the world.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetIntent { intent } => {
            if world.intent != intent {
                world.intent = intent;
                out_events.push(Event::IntentChanged { intent });
            }
        }
        Command::MoveAvatar { to } => {
            let clamped = to.clamp_within(world.campus.map(), world.campus.avatar());
            if clamped != world.position {
                let from = world.position;
                world.position = clamped;
                world.overlap_stale = true;
                out_events.push(Event::AvatarMoved { from, to: clamped });
            }
        }
        Command::ObserveOverlap { location } => {
            let campus = &world.campus;
            let next = world
                .interaction
                .observe(location, |id| campus.hosts_panel(id));
            world.overlap_stale = false;
            world.transition(next, out_events);
        }
        Command::RequestPanel => {
            let campus = &world.campus;
            let next = world
                .interaction
                .request_panel(|id| campus.hosts_panel(id));
            if next == world.interaction {
                debug!(state = ?world.interaction, "panel request ignored");
            }
            world.overlap_stale = true;
            world.transition(next, out_events);
        }
        Command::ClosePanel => {
            let next = world.interaction.close_panel();
            if next == world.interaction {
                debug!(state = ?world.interaction, "close request ignored");
            }
            world.overlap_stale = true;
            world.transition(next, out_events);
        }
        Command::GrantExperience { amount } => {
            progression::grant_experience(world, amount, out_events);
        }
        Command::GrantItem { name } => progression::grant_item(world, name, out_events),
        Command::SetEnergy { value } => progression::set_energy(world, value, out_events),
        Command::CompleteQuest { quest } => {
            progression::complete_quest(world, quest, out_events);
        }
        Command::RaiseFlag { flag } => progression::raise_flag(world, flag, out_events),
        Command::RecordBookRead => progression::record_book_read(world, out_events),
        Command::SelectSchool { school } => {
            progression::select_school(world, school, out_events);
        }
        Command::CompleteProgramCourse { school, index } => {
            progression::complete_program_course(world, &school, index, out_events);
        }
        Command::SelectDepartment { school, department } => {
            progression::select_department(world, school, department, out_events);
        }
        Command::CompleteDepartmentCourse {
            school,
            department,
            index,
        } => {
            progression::complete_department_course(world, school, department, index, out_events);
        }
        Command::CheckVictory => progression::check_victory(world, out_events),
        Command::AcknowledgeVictory => {
            if world.victory_awarded {
                world.reset(out_events);
            } else {
                debug!("victory acknowledgement ignored before victory");
            }
        }
        Command::Reset => world.reset(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use campus_quest_core::{
        BoundingBox, DepartmentId, FlagId, InputIntent, InteractionState, Location, Position,
        QuestId, Rank, SchoolId, Size,
    };

    use super::{Campus, Catalog, Department, School, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the campus configuration.
    #[must_use]
    pub fn campus(world: &World) -> &Campus {
        &world.campus
    }

    /// Extent of the walkable map.
    #[must_use]
    pub fn map_size(world: &World) -> Size {
        world.campus.map()
    }

    /// Location registry in declaration order.
    #[must_use]
    pub fn locations(world: &World) -> &[Location] {
        world.campus.locations()
    }

    /// Captures the avatar's movement-relevant state.
    #[must_use]
    pub fn avatar(world: &World) -> AvatarView {
        AvatarView {
            position: world.position,
            size: world.campus.avatar(),
            speed: world.campus.speed(),
            intent: world.intent,
        }
    }

    /// Current interaction state.
    #[must_use]
    pub fn interaction(world: &World) -> InteractionState {
        world.interaction
    }

    /// Whether the overlap must be re-evaluated even without movement.
    #[must_use]
    pub fn overlap_stale(world: &World) -> bool {
        world.overlap_stale
    }

    /// Session counter incremented by every reset.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Read-only view over the player's progression.
    #[must_use]
    pub fn progression(world: &World) -> ProgressionView<'_> {
        ProgressionView { world }
    }

    /// Snapshot of the avatar used by movement and overlap detection.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AvatarView {
        /// Top-left corner of the avatar.
        pub position: Position,
        /// Extent of the avatar bounding box.
        pub size: Size,
        /// Displacement per tick.
        pub speed: f32,
        /// Held directional intent.
        pub intent: InputIntent,
    }

    impl AvatarView {
        /// Bounding box of the avatar.
        #[must_use]
        pub fn bounds(&self) -> BoundingBox {
            BoundingBox::new(self.position, self.size)
        }
    }

    /// Borrowed view over every progression field of the world.
    #[derive(Clone, Copy, Debug)]
    pub struct ProgressionView<'a> {
        world: &'a World,
    }

    impl<'a> ProgressionView<'a> {
        /// Accumulated experience.
        #[must_use]
        pub fn experience(&self) -> u32 {
            self.world.experience
        }

        /// Rank derived from the accumulated experience.
        #[must_use]
        pub fn rank(&self) -> Rank {
            Rank::for_experience(self.world.experience)
        }

        /// Energy in `0..=100`.
        #[must_use]
        pub fn energy(&self) -> u8 {
            self.world.energy
        }

        /// Inventory item names in sorted order.
        pub fn inventory(&self) -> impl Iterator<Item = &'a str> + 'a {
            self.world.inventory.iter().map(String::as_str)
        }

        /// Whether the inventory contains `name`.
        #[must_use]
        pub fn has_item(&self, name: &str) -> bool {
            self.world.inventory.contains(name)
        }

        /// Whether `quest` is complete.
        #[must_use]
        pub fn quest_complete(&self, quest: QuestId) -> bool {
            self.world.quests.contains(&quest)
        }

        /// Whether every quest is complete.
        #[must_use]
        pub fn all_quests_complete(&self) -> bool {
            QuestId::ALL
                .iter()
                .all(|quest| self.world.quests.contains(quest))
        }

        /// Whether `flag` was raised.
        #[must_use]
        pub fn flag_raised(&self, flag: FlagId) -> bool {
            self.world.flags.contains(&flag)
        }

        /// Number of books read at the library.
        #[must_use]
        pub fn books_read(&self) -> u32 {
            self.world.meta.books_read
        }

        /// Whether the victory bonus has been granted this session.
        #[must_use]
        pub fn victory_awarded(&self) -> bool {
            self.world.victory_awarded
        }

        /// Curriculum catalog.
        #[must_use]
        pub fn catalog(&self) -> &'a Catalog {
            self.world.campus.catalog()
        }

        /// Selected school, if any.
        #[must_use]
        pub fn school(&self) -> Option<&'a School> {
            let id = self.world.meta.school.as_ref()?;
            self.world.campus.catalog().school(id)
        }

        /// Selected school identifier, if any.
        #[must_use]
        pub fn school_id(&self) -> Option<&'a SchoolId> {
            self.world.meta.school.as_ref()
        }

        /// Selected department, if any.
        #[must_use]
        pub fn department(&self) -> Option<&'a Department> {
            let selection = self.world.meta.department.as_ref()?;
            self.world
                .campus
                .catalog()
                .school(&selection.school)?
                .department(&selection.id)
        }

        /// Whether program course `index` of `school` is complete.
        #[must_use]
        pub fn program_course_complete(&self, school: &SchoolId, index: usize) -> bool {
            self.world.meta.program.is_complete(school, index)
        }

        /// Next completable program course of the selected school.
        #[must_use]
        pub fn program_next_unlocked(&self) -> Option<usize> {
            let school = self.school()?;
            let len = school.program().len();
            let next = self.world.meta.program.next_unlocked(school.id(), len);
            (next < len).then_some(next)
        }

        /// Whether course `index` of the department is complete.
        #[must_use]
        pub fn department_course_complete(
            &self,
            school: &SchoolId,
            department: &DepartmentId,
            index: usize,
        ) -> bool {
            self.world
                .meta
                .departments
                .is_complete(&(school.clone(), department.clone()), index)
        }

        /// Next completable course of the selected department.
        #[must_use]
        pub fn department_next_unlocked(&self) -> Option<usize> {
            let selection = self.world.meta.department.as_ref()?;
            let len = self.department()?.courses().len();
            let next = self
                .world
                .meta
                .departments
                .next_unlocked(&(selection.school.clone(), selection.id.clone()), len);
            (next < len).then_some(next)
        }

        /// Number of completed courses of the selected department.
        #[must_use]
        pub fn department_completed_count(&self) -> usize {
            let Some(selection) = self.world.meta.department.as_ref() else {
                return 0;
            };
            let len = self.department().map_or(0, |department| department.courses().len());
            self.world
                .meta
                .departments
                .completed_count(&(selection.school.clone(), selection.id.clone()), len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_quest_core::LocationId;

    fn run(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command, &mut events);
        }
        events
    }

    #[test]
    fn fresh_world_matches_documented_initial_values() {
        let world = World::new();
        let avatar = query::avatar(&world);
        let progression = query::progression(&world);

        assert_eq!(avatar.position, Position::new(100.0, 470.0));
        assert_eq!(avatar.speed, 3.0);
        assert!(avatar.intent.is_idle());
        assert_eq!(progression.energy(), 80);
        assert_eq!(progression.experience(), 0);
        assert_eq!(progression.inventory().count(), 0);
        assert!(QuestId::ALL
            .iter()
            .all(|quest| !progression.quest_complete(*quest)));
        assert!(progression.school().is_none());
        assert_eq!(query::interaction(&world), InteractionState::Idle);
        assert!(query::overlap_stale(&world));
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn move_avatar_is_clamped_to_the_map() {
        let mut world = World::new();
        let events = run(
            &mut world,
            vec![Command::MoveAvatar {
                to: Position::new(-40.0, 9_000.0),
            }],
        );

        assert_eq!(
            query::avatar(&world).position,
            Position::new(0.0, 560.0 - 22.0)
        );
        assert!(matches!(events.as_slice(), [Event::AvatarMoved { .. }]));
    }

    #[test]
    fn overlap_observations_drive_panel_events() {
        let mut world = World::new();
        let events = run(
            &mut world,
            vec![Command::ObserveOverlap {
                location: Some(LocationId::Dorm),
            }],
        );
        assert!(events.contains(&Event::PanelOpened {
            location: LocationId::Dorm
        }));
        assert!(!query::overlap_stale(&world));

        let events = run(&mut world, vec![Command::ClosePanel]);
        assert!(events.contains(&Event::PanelClosed {
            location: LocationId::Dorm
        }));
        assert_eq!(
            query::interaction(&world),
            InteractionState::Suppressed(LocationId::Dorm)
        );
        assert!(query::overlap_stale(&world));
    }

    #[test]
    fn unchanged_intent_emits_nothing() {
        let mut world = World::new();
        let events = run(
            &mut world,
            vec![Command::SetIntent {
                intent: InputIntent::NONE,
            }],
        );
        assert!(events.is_empty());
    }

    #[test]
    fn reset_restores_initial_state_and_bumps_generation() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            vec![
                Command::GrantExperience { amount: 40 },
                Command::GrantItem {
                    name: "Dorm Key".to_owned(),
                },
                Command::MoveAvatar {
                    to: Position::new(500.0, 200.0),
                },
                Command::ObserveOverlap { location: None },
            ],
        );

        let events = run(&mut world, vec![Command::Reset]);

        assert_eq!(events, vec![Event::SessionReset { generation: 1 }]);
        assert_eq!(query::generation(&world), 1);
        assert_eq!(query::progression(&world).experience(), 0);
        assert!(!query::progression(&world).has_item("Dorm Key"));
        assert_eq!(
            query::avatar(&world).position,
            Position::new(100.0, 470.0)
        );
        assert!(query::overlap_stale(&world));
    }

    #[test]
    fn victory_acknowledgement_requires_victory() {
        let mut world = World::new();
        let events = run(&mut world, vec![Command::AcknowledgeVictory]);
        assert!(events.is_empty());
        assert_eq!(query::generation(&world), 0);
    }
}
