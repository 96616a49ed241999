//! Bot decision making
//!
//! Each tick a bot picks one behavior (chase, flee or idle) and nudges its
//! velocity. The physics pass integrates the result on the next tick.

use rand::Rng;

use super::state::{Character, CharacterId};
use crate::consts::{CANVAS_WIDTH, JUMP_FORCE, MOVE_SPEED};

/// Horizontal velocity added per tick while chasing or fleeing
const ACCEL: f32 = 1.0;
/// Chase target must be this much higher before the bot jumps after it
const JUMP_HEIGHT_TRIGGER: f32 = 50.0;
/// Bots run from a holder closer than this
const SAFE_ZONE: f32 = 250.0;
/// Bots jump away from a holder closer than this
const PANIC_ZONE: f32 = 100.0;
/// Per-tick chance of picking a new patrol direction
const PATROL_CHANCE: f32 = 0.02;
const PATROL_SPEED_FACTOR: f32 = 0.6;
/// Per-tick chance of a random hop while grounded
const HOP_CHANCE: f32 = 0.01;
/// Distance from a world edge that counts as "against the wall"
const WALL_MARGIN: f32 = 10.0;

/// What a bot is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Chase(CharacterId),
    Flee(CharacterId),
    Idle,
}

/// Nearest living character other than `npc`, by Manhattan distance
///
/// Ties go to the first candidate in roster order.
pub fn nearest_living(characters: &[Character], npc: CharacterId) -> Option<CharacterId> {
    let me = characters.get(npc)?;
    let mut best: Option<(CharacterId, f32)> = None;
    for other in characters.iter().filter(|c| c.id != npc && c.is_alive()) {
        let dist = (other.pos.x - me.pos.x).abs() + (other.pos.y - me.pos.y).abs();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((other.id, dist));
        }
    }
    best.map(|(id, _)| id)
}

/// Pick a behavior in priority order: forced target, holding the bomb, fleeing
pub fn choose_behavior(
    characters: &[Character],
    npc: CharacterId,
    bomb_holder: Option<CharacterId>,
    forced_target: Option<CharacterId>,
) -> Behavior {
    let alive = |id: CharacterId| characters.get(id).is_some_and(|c| c.is_alive());

    if let Some(target) = forced_target.filter(|&t| t != npc && alive(t)) {
        return Behavior::Chase(target);
    }

    match bomb_holder {
        Some(holder) if holder == npc => nearest_living(characters, npc)
            .map(Behavior::Chase)
            .unwrap_or(Behavior::Idle),
        Some(holder) if alive(holder) => Behavior::Flee(holder),
        _ => Behavior::Idle,
    }
}

/// Run one tick of bot logic for `npc`
///
/// Callers skip dead, frozen and human characters.
pub fn decide<R: Rng + ?Sized>(
    characters: &mut [Character],
    npc: CharacterId,
    bomb_holder: Option<CharacterId>,
    forced_target: Option<CharacterId>,
    rng: &mut R,
) {
    let behavior = choose_behavior(characters, npc, bomb_holder, forced_target);
    let other_pos = match behavior {
        Behavior::Chase(id) | Behavior::Flee(id) => Some(characters[id].pos),
        Behavior::Idle => None,
    };
    let me = &mut characters[npc];

    match (behavior, other_pos) {
        (Behavior::Chase(_), Some(target)) => {
            if target.x > me.pos.x {
                me.vel.x += ACCEL;
                me.facing_right = true;
            } else {
                me.vel.x -= ACCEL;
                me.facing_right = false;
            }
            if target.y < me.pos.y - JUMP_HEIGHT_TRIGGER && me.grounded {
                me.vel.y = JUMP_FORCE;
            }
        }
        (Behavior::Flee(_), Some(holder)) => {
            let offset = holder - me.pos;
            let dist = offset.length();
            if dist < SAFE_ZONE {
                if offset.x > 0.0 {
                    me.vel.x -= ACCEL;
                    me.facing_right = false;
                } else {
                    me.vel.x += ACCEL;
                    me.facing_right = true;
                }
                if dist < PANIC_ZONE && me.grounded {
                    me.vel.y = JUMP_FORCE;
                }
            } else if rng.random::<f32>() < PATROL_CHANCE {
                let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                me.vel.x = dir * MOVE_SPEED * PATROL_SPEED_FACTOR;
            }
        }
        _ => {}
    }

    if me.grounded {
        let width = me.size().x;
        let at_left_wall = me.pos.x <= WALL_MARGIN;
        let at_right_wall = me.pos.x >= CANVAS_WIDTH - width - WALL_MARGIN;
        if (at_left_wall && me.vel.x < 0.0) || (at_right_wall && me.vel.x > 0.0) {
            me.vel.y = JUMP_FORCE;
        }
        if rng.random::<f32>() < HOP_CHANCE {
            me.vel.y = JUMP_FORCE;
        }
    }

    me.vel.x = me.vel.x.clamp(-MOVE_SPEED, MOVE_SPEED);
}
