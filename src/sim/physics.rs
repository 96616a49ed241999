//! Per-character physics: gravity, integration, friction, bounds, platforms
//!
//! One call advances one character by one frame. Velocities are in world
//! units per tick (explicit Euler, no dt scaling).

use glam::Vec2;

use super::collision::{CollisionSide, Platform, collision_side, snap_to_side};
use super::state::Character;
use crate::consts::*;

/// Gravity multiplier for scaled-up characters
pub const GIANT_GRAVITY_FACTOR: f32 = 1.2;
/// Flight-mode drag per tick
pub const FLIGHT_DRAG_Y: f32 = 0.9;
pub const FLIGHT_DRAG_X: f32 = 0.93;

/// Held movement keys for one human slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Jump when grounded, climb in flight mode
    pub up: bool,
}

/// One movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldKey {
    Left,
    Right,
    Up,
}

impl Controls {
    pub fn set(&mut self, key: HeldKey, down: bool) {
        match key {
            HeldKey::Left => self.left = down,
            HeldKey::Right => self.right = down,
            HeldKey::Up => self.up = down,
        }
    }
}

/// Keyboard layout: P1 on WASD, P2 on the arrows, P3 on IJKL
///
/// Takes a DOM `KeyboardEvent.code` (physical key, so layout and modifiers
/// can't make press and release disagree); returns the human slot and key.
pub fn key_binding(code: &str) -> Option<(usize, HeldKey)> {
    let binding = match code {
        "KeyA" => (0, HeldKey::Left),
        "KeyD" => (0, HeldKey::Right),
        "KeyW" => (0, HeldKey::Up),
        "ArrowLeft" => (1, HeldKey::Left),
        "ArrowRight" => (1, HeldKey::Right),
        "ArrowUp" => (1, HeldKey::Up),
        "KeyJ" => (2, HeldKey::Left),
        "KeyL" => (2, HeldKey::Right),
        "KeyI" => (2, HeldKey::Up),
        _ => return None,
    };
    Some(binding)
}

/// Gravity applied to a character this tick
#[inline]
pub fn gravity_for(character: &Character) -> f32 {
    if character.scale > 1.0 {
        GRAVITY * GIANT_GRAVITY_FACTOR
    } else {
        GRAVITY
    }
}

/// Walking speed after flight and size modifiers (0 when frozen)
pub fn move_speed_for(character: &Character) -> f32 {
    if character.frozen {
        return 0.0;
    }
    let mut speed = if character.flying {
        MOVE_SPEED * 2.0
    } else {
        MOVE_SPEED
    };
    if character.scale > 1.0 {
        speed *= 0.8; // Giants are slow
    }
    if character.scale < 1.0 {
        speed *= 1.2; // Tiny is quick
    }
    speed
}

/// Jump impulse (tiny characters jump lower)
pub fn jump_force_for(character: &Character) -> f32 {
    if character.scale < 1.0 {
        JUMP_FORCE * 0.8
    } else {
        JUMP_FORCE
    }
}

/// Turn held keys into velocity for a human character
pub fn apply_controls(character: &mut Character, controls: Controls) {
    if character.dead {
        return;
    }
    let speed = move_speed_for(character);
    if controls.left {
        character.vel.x = -speed;
        character.facing_right = false;
    }
    if controls.right {
        character.vel.x = speed;
        character.facing_right = true;
    }
    if controls.up {
        if character.flying {
            character.vel.y = -speed;
        } else if character.grounded && !character.frozen {
            character.vel.y = jump_force_for(character);
        }
    }
}

/// Advance one living character by one tick against the map's platforms
pub fn advance(character: &mut Character, platforms: &[Platform]) {
    debug_assert!(!character.dead, "physics on a dead character");

    if character.frozen {
        character.vel = Vec2::ZERO;
        return;
    }

    let size = character.size();

    if character.flying {
        character.vel.y *= FLIGHT_DRAG_Y;
        character.vel.x *= FLIGHT_DRAG_X;
    } else {
        character.vel.y += gravity_for(character);
    }

    character.pos += character.vel;

    if !character.flying {
        character.vel.x *= if character.grounded {
            GROUND_FRICTION
        } else {
            AIR_RESISTANCE
        };
    }

    // World bounds
    if character.pos.x < 0.0 {
        character.pos.x = 0.0;
        character.vel.x = 0.0;
    }
    if character.pos.x + size.x > CANVAS_WIDTH {
        character.pos.x = CANVAS_WIDTH - size.x;
        character.vel.x = 0.0;
    }
    if character.pos.y < 0.0 {
        character.pos.y = 0.0;
        character.vel.y = 0.0;
    }
    // Fell through a gap: drop back in from the top
    if character.pos.y > CANVAS_HEIGHT + FALL_RECOVERY_MARGIN {
        character.pos = Vec2::new(CANVAS_WIDTH / 2.0, 0.0);
        character.vel.y = 0.0;
    }

    character.grounded = false;
    for platform in platforms {
        let body = character.bounds();
        let Some(side) = collision_side(&body, platform) else {
            continue;
        };
        character.pos = snap_to_side(&body, platform, side);
        if side.is_vertical() {
            character.vel.y = 0.0;
        } else {
            character.vel.x = 0.0;
        }
        if side == CollisionSide::Top {
            character.grounded = true;
        }
    }
}
