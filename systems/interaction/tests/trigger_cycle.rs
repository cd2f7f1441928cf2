use campus_quest_core::{Command, Direction, Event, InputIntent, InteractionState, LocationId};
use campus_quest_system_interaction::InteractionTrigger;
use campus_quest_system_movement::Movement;
use campus_quest_world::{self as world, query, Campus, World};

struct Harness {
    world: World,
    movement: Movement,
    trigger: InteractionTrigger,
}

impl Harness {
    fn new(world: World) -> Self {
        Self {
            world,
            movement: Movement::default(),
            trigger: InteractionTrigger::default(),
        }
    }

    fn tick(&mut self, intent: InputIntent, requests: &[Command]) -> Vec<Event> {
        let mut events = Vec::new();
        for request in requests {
            world::apply(&mut self.world, request.clone(), &mut events);
        }
        world::apply(&mut self.world, Command::SetIntent { intent }, &mut events);

        let mut commands = Vec::new();
        self.movement.handle(
            &query::avatar(&self.world),
            query::map_size(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.trigger.handle(
            &events,
            query::avatar(&self.world).bounds(),
            query::locations(&self.world),
            query::overlap_stale(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    fn state(&self) -> InteractionState {
        query::interaction(&self.world)
    }
}

fn opened(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::PanelOpened { .. }))
        .count()
}

fn right() -> InputIntent {
    InputIntent::NONE.with(Direction::Right, true)
}

fn left() -> InputIntent {
    InputIntent::NONE.with(Direction::Left, true)
}

#[test]
fn spawning_inside_the_dorm_opens_its_panel_once() {
    let mut harness = Harness::new(World::new());
    let first = harness.tick(InputIntent::NONE, &[]);
    assert_eq!(
        first
            .iter()
            .filter(|event| matches!(
                event,
                Event::PanelOpened {
                    location: LocationId::Dorm
                }
            ))
            .count(),
        1
    );

    for _ in 0..5 {
        assert_eq!(opened(&harness.tick(InputIntent::NONE, &[])), 0);
    }
    assert_eq!(harness.state().open_panel(), Some(LocationId::Dorm));
}

#[test]
fn closing_suppresses_until_the_avatar_leaves_and_returns() {
    let mut harness = Harness::new(World::new());
    let _ = harness.tick(InputIntent::NONE, &[]);

    let _ = harness.tick(InputIntent::NONE, &[Command::ClosePanel]);
    assert_eq!(harness.state(), InteractionState::Suppressed(LocationId::Dorm));

    for _ in 0..10 {
        assert_eq!(opened(&harness.tick(right(), &[])), 0);
        assert!(!harness.state().prompt_visible());
    }

    let mut left_dorm = false;
    for _ in 0..40 {
        let _ = harness.tick(right(), &[]);
        if harness.state() == InteractionState::Idle {
            left_dorm = true;
            break;
        }
    }
    assert!(left_dorm, "avatar never left the dorm");

    let mut reopened = 0;
    for _ in 0..20 {
        reopened += opened(&harness.tick(left(), &[]));
    }
    for _ in 0..20 {
        reopened += opened(&harness.tick(InputIntent::NONE, &[]));
    }
    assert_eq!(reopened, 1);
    assert_eq!(harness.state().open_panel(), Some(LocationId::Dorm));
}

#[test]
fn interact_reopens_a_suppressed_panel() {
    let mut harness = Harness::new(World::new());
    let _ = harness.tick(InputIntent::NONE, &[]);
    let _ = harness.tick(InputIntent::NONE, &[Command::ClosePanel]);

    let events = harness.tick(InputIntent::NONE, &[Command::RequestPanel]);
    assert_eq!(opened(&events), 1);
    assert_eq!(harness.state().open_panel(), Some(LocationId::Dorm));
}

#[test]
fn standing_on_a_location_without_a_panel_keeps_it_focused() {
    let campus = Campus::from_toml_str(
        r#"
        version = 1

        [[locations]]
        id = "admin"
        name = "Notice Board"
        bounds = { x = 40, y = 420, width = 160, height = 120 }
        hosts_panel = false
        "#,
    )
    .expect("valid campus");
    let mut harness = Harness::new(World::with_campus(campus));

    for _ in 0..5 {
        assert_eq!(opened(&harness.tick(InputIntent::NONE, &[])), 0);
        assert_eq!(harness.state(), InteractionState::Focused(LocationId::Admin));
        assert!(harness.state().prompt_visible());
    }

    let events = harness.tick(InputIntent::NONE, &[Command::RequestPanel]);
    assert_eq!(opened(&events), 0);
}
