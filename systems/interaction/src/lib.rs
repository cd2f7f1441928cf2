#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interaction trigger that maps the avatar position onto the location
//! registry and feeds the interaction state machine.

use campus_quest_core::{BoundingBox, Command, Event, Location, LocationId};

/// Pure system that scans the location registry whenever the overlap may have
/// changed.
#[derive(Debug, Default)]
pub struct InteractionTrigger;

impl InteractionTrigger {
    /// Emits an `ObserveOverlap` command when the avatar moved this tick or the
    /// world flagged its overlap as stale.
    pub fn handle(
        &mut self,
        events: &[Event],
        avatar: BoundingBox,
        locations: &[Location],
        overlap_stale: bool,
        out: &mut Vec<Command>,
    ) {
        let moved = events
            .iter()
            .any(|event| matches!(event, Event::AvatarMoved { .. }));
        if !(moved || overlap_stale) {
            return;
        }

        out.push(Command::ObserveOverlap {
            location: first_overlap(avatar, locations),
        });
    }
}

/// First location in declaration order whose bounds intersect the avatar.
///
/// When two locations overlap geometrically the one declared first wins. That
/// ordering is a policy of the registry, not of the geometry.
#[must_use]
pub fn first_overlap(avatar: BoundingBox, locations: &[Location]) -> Option<LocationId> {
    locations
        .iter()
        .find(|location| location.bounds.intersects(&avatar))
        .map(|location| location.id)
}
