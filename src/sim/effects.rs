//! Applies admin directives to the match
//!
//! Directives naming a character that is out of range or already dead are
//! dropped without complaint.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::directive::{BARRAGE_SIZE, Directive};
use super::state::{
    Barrage, CharacterId, FLIGHT_BURST_COLOR, FallingBomb, GameState, IMPACT_COLOR,
    SWAP_BURST_COLOR,
};
use crate::consts::{CANVAS_HEIGHT, FALL_RECOVERY_MARGIN, GRAVITY};

pub const GIANT_SCALE: f32 = 2.0;
pub const TINY_SCALE: f32 = 0.5;

/// Gap between two barrage drops
pub const BARRAGE_INTERVAL_MS: f64 = 700.0;
/// Barrage drops start this far above the target
const DROP_HEIGHT: f32 = 300.0;
/// Initial fall speed of a dropped bomb
const DROP_SPEED: f32 = 5.0;
/// Horizontal offset range from the target's center (either side)
const DROP_OFFSET_MIN: f32 = 60.0;
const DROP_OFFSET_SPREAD: f32 = 60.0;

/// Apply one directive; returns false if it was dropped
pub fn apply_directive(state: &mut GameState, directive: Directive, now_ms: f64) -> bool {
    match directive {
        Directive::Close(id) => {
            let Some(c) = state.living_character_mut(id) else {
                return false;
            };
            c.flying = true;
            let at = c.pos;
            state.spawn_burst(at, FLIGHT_BURST_COLOR);
        }
        Directive::Target(id) => {
            if state.living_character(id).is_none() {
                return false;
            }
            state.forced_target = Some(id);
        }
        Directive::Bomb(id) => {
            if state.living_character(id).is_none() {
                return false;
            }
            state.barrage = Some(Barrage {
                target: id,
                remaining: BARRAGE_SIZE,
                next_spawn_ms: now_ms,
            });
        }
        Directive::Giant(id) => return set_scale(state, id, GIANT_SCALE),
        Directive::Tiny(id) => return set_scale(state, id, TINY_SCALE),
        Directive::Freeze(id) => return set_frozen(state, id, true),
        Directive::Unfreeze(id) => return set_frozen(state, id, false),
        Directive::Swap => swap_positions(state),
    }
    log::debug!("Applied {directive:?}");
    true
}

fn set_scale(state: &mut GameState, id: CharacterId, scale: f32) -> bool {
    match state.living_character_mut(id) {
        Some(c) => {
            c.scale = scale;
            true
        }
        None => false,
    }
}

fn set_frozen(state: &mut GameState, id: CharacterId, frozen: bool) -> bool {
    match state.living_character_mut(id) {
        Some(c) => {
            c.frozen = frozen;
            true
        }
        None => false,
    }
}

/// Randomly permute the positions of all living characters
fn swap_positions(state: &mut GameState) {
    let ids: Vec<CharacterId> = state.living().map(|c| c.id).collect();
    let mut positions: Vec<Vec2> = ids.iter().map(|&id| state.characters[id].pos).collect();
    positions.shuffle(&mut state.rng);

    for (&id, &pos) in ids.iter().zip(&positions) {
        state.characters[id].pos = pos;
        state.spawn_burst(pos, SWAP_BURST_COLOR);
    }
}

/// Drop the next barrage bomb if one is due
///
/// The barrage ends early once its target is gone.
pub fn update_barrage(state: &mut GameState, now_ms: f64) {
    let Some(mut barrage) = state.barrage else {
        return;
    };
    if now_ms < barrage.next_spawn_ms {
        return;
    }
    let Some(target) = state.living_character(barrage.target) else {
        state.barrage = None;
        return;
    };
    let (pos, width) = (target.pos, target.size().x);

    let side = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let offset = side * (DROP_OFFSET_MIN + state.rng.random::<f32>() * DROP_OFFSET_SPREAD);
    state.falling_bombs.push(FallingBomb {
        pos: Vec2::new(pos.x + width / 2.0 + offset, pos.y - DROP_HEIGHT),
        vy: DROP_SPEED,
    });

    barrage.remaining -= 1;
    barrage.next_spawn_ms = now_ms + BARRAGE_INTERVAL_MS;
    state.barrage = (barrage.remaining > 0).then_some(barrage);
}

/// Move falling bombs; burst and remove those that hit a platform or leave the world
pub fn update_falling_bombs(state: &mut GameState) {
    let platforms = state.platforms();
    let mut impacts = Vec::new();
    state.falling_bombs.retain_mut(|bomb| {
        bomb.pos.y += bomb.vy;
        bomb.vy += GRAVITY;
        let hit = bomb.pos.y > CANVAS_HEIGHT + FALL_RECOVERY_MARGIN
            || platforms.iter().any(|p| p.contains(bomb.pos));
        if hit {
            impacts.push(bomb.pos);
        }
        !hit
    });
    for at in impacts {
        state.spawn_burst(at, IMPACT_COLOR);
    }
}
