#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that turns held intent into avatar steps.

use campus_quest_core::{Command, Direction, InputIntent, Position, Size};
use campus_quest_world::query::AvatarView;

/// Pure system that proposes one avatar displacement per tick.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Emits a `MoveAvatar` command when the held intent produces a step.
    ///
    /// Nothing is emitted for idle or fully cancelled intent, or when the avatar
    /// is already pressed against the map edge in every held direction.
    pub fn handle(&mut self, avatar: &AvatarView, map: Size, out: &mut Vec<Command>) {
        let next = resolve(avatar.position, avatar.intent, avatar.speed, map, avatar.size);
        if next != avatar.position {
            out.push(Command::MoveAvatar { to: next });
        }
    }
}

/// Unit-free direction vector for the held intent.
///
/// Each axis is -1, 0 or +1 and opposite keys cancel. The vector is not
/// normalised.
#[must_use]
pub fn direction_vector(intent: InputIntent) -> (f32, f32) {
    let axis = |negative: Direction, positive: Direction| -> f32 {
        let mut value = 0.0;
        if intent.is_held(negative) {
            value -= 1.0;
        }
        if intent.is_held(positive) {
            value += 1.0;
        }
        value
    };
    (
        axis(Direction::Left, Direction::Right),
        axis(Direction::Up, Direction::Down),
    )
}

/// Resolves the next avatar position for one tick.
///
/// Diagonal movement is normalised so a single tick never travels further than
/// `speed`. The result is clamped so the avatar box stays inside `map`.
#[must_use]
pub fn resolve(
    position: Position,
    intent: InputIntent,
    speed: f32,
    map: Size,
    avatar: Size,
) -> Position {
    let (dx, dy) = direction_vector(intent);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return position;
    }
    let scale = speed / length;
    position
        .offset(dx * scale, dy * scale)
        .clamp_within(map, avatar)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: Size = Size::new(880.0, 560.0);
    const AVATAR: Size = Size::new(22.0, 22.0);

    fn held(directions: &[Direction]) -> InputIntent {
        directions
            .iter()
            .fold(InputIntent::NONE, |intent, direction| {
                intent.with(*direction, true)
            })
    }

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!(
            direction_vector(held(&[Direction::Left, Direction::Right])),
            (0.0, 0.0)
        );
        assert_eq!(
            direction_vector(held(&[Direction::Up, Direction::Down, Direction::Right])),
            (1.0, 0.0)
        );
    }

    #[test]
    fn diagonal_step_has_speed_magnitude() {
        let start = Position::new(300.0, 300.0);
        for intent in [
            held(&[Direction::Up, Direction::Left]),
            held(&[Direction::Up, Direction::Right]),
            held(&[Direction::Down, Direction::Left]),
            held(&[Direction::Down, Direction::Right]),
        ] {
            let next = resolve(start, intent, 3.0, MAP, AVATAR);
            assert!((start.distance(next) - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn straight_step_moves_exactly_speed() {
        let next = resolve(
            Position::new(10.0, 10.0),
            held(&[Direction::Right]),
            3.0,
            MAP,
            AVATAR,
        );
        assert_eq!(next, Position::new(13.0, 10.0));
    }

    #[test]
    fn idle_intent_is_a_no_op() {
        let mut movement = Movement;
        let mut out = Vec::new();
        let avatar = AvatarView {
            position: Position::new(5.0, 5.0),
            size: AVATAR,
            speed: 3.0,
            intent: InputIntent::NONE,
        };
        movement.handle(&avatar, MAP, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn blocked_intent_emits_nothing() {
        let mut movement = Movement;
        let mut out = Vec::new();
        let avatar = AvatarView {
            position: Position::new(0.0, 0.0),
            size: AVATAR,
            speed: 3.0,
            intent: held(&[Direction::Up, Direction::Left]),
        };
        movement.handle(&avatar, MAP, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn every_intent_combination_stays_in_bounds() {
        let corners = [
            Position::new(0.0, 0.0),
            Position::new(MAP.width - AVATAR.width, 0.0),
            Position::new(0.0, MAP.height - AVATAR.height),
            Position::new(MAP.width - AVATAR.width, MAP.height - AVATAR.height),
            Position::new(1.0, 1.0),
        ];
        for bits in 0_u8..16 {
            let intent = Direction::ALL
                .iter()
                .enumerate()
                .fold(InputIntent::NONE, |intent, (bit, direction)| {
                    intent.with(*direction, bits & (1 << bit) != 0)
                });
            for corner in corners {
                for speed in [3.0, 50.0, 10_000.0] {
                    let next = resolve(corner, intent, speed, MAP, AVATAR);
                    assert!(next.x >= 0.0 && next.x <= MAP.width - AVATAR.width);
                    assert!(next.y >= 0.0 && next.y <= MAP.height - AVATAR.height);
                }
            }
        }
    }
}
