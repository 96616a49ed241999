//! Bomb Tag - hot-potato platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, bots, bomb rules, directives, camera)
//! - `session`: Tick scheduler context (input buffering, snapshots, teardown)
//! - `config`: Match setup from the menu shell

pub mod config;
pub mod session;
pub mod sim;

pub use config::{HumanCount, MatchConfig};
pub use session::Session;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World / viewport dimensions (world units == canvas pixels at zoom 1)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Per-tick downward acceleration (one tick = one frame)
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity set on jump (negative is up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Horizontal speed cap for walking characters
    pub const MOVE_SPEED: f32 = 5.0;
    pub const AIR_RESISTANCE: f32 = 0.95;
    pub const GROUND_FRICTION: f32 = 0.8;

    /// Unscaled character hitbox
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;

    /// Round length before the bomb goes off
    pub const BOMB_DURATION_SECS: f32 = 13.0;
    /// Minimum gap between two bomb passes
    pub const BOMB_TRANSFER_COOLDOWN_MS: f64 = 500.0;

    /// Characters per match (humans fill the first slots, bots the rest)
    pub const ROSTER_SIZE: usize = 5;
    /// Spawn points per roster slot
    pub const SPAWN_POINTS: [(f32, f32); ROSTER_SIZE] = [
        (100.0, 100.0),
        (350.0, 100.0),
        (600.0, 100.0),
        (850.0, 100.0),
        (1100.0, 100.0),
    ];
    /// Body colors per roster slot (0xRRGGBB)
    pub const PLAYER_COLORS: [u32; ROSTER_SIZE] = [
        0xef4444, // Red (P1)
        0x3b82f6, // Blue (P2)
        0x22c55e, // Green (P3)
        0xeab308, // Yellow
        0xa855f7, // Purple
    ];

    /// Falling out below this depth teleports the character back to the top
    pub const FALL_RECOVERY_MARGIN: f32 = 100.0;
}

/// Move `current` a fraction `t` of the way to `target`
#[inline]
pub fn lerp(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
