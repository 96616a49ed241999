//! Match state and core simulation types
//!
//! `GameState` is the whole simulation context: roster, bomb bookkeeping,
//! active map, admin directives, transient effects and the camera. It is owned
//! by the tick scheduler and passed by reference into every phase.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::{Platform, Rect};
use super::maps::{MAP_PRESETS, MapPreset};
use crate::config::MatchConfig;
use crate::consts::*;
use crate::direction;

/// Index into the roster (0-based; directives are 1-based)
pub type CharacterId = usize;

/// Label reported when a match ends with nobody standing
pub const NO_WINNER_LABEL: &str = "Nobody";

/// Particle colors (0xRRGGBB)
pub const EXPLOSION_COLOR: u32 = 0xff4500;
pub const FLIGHT_BURST_COLOR: u32 = 0xffffff;
pub const SWAP_BURST_COLOR: u32 = 0x00ffff;
pub const IMPACT_COLOR: u32 = 0x333333;

/// Particles spawned per burst
pub const BURST_PARTICLES: usize = 20;
/// Maximum live particles (oldest are dropped first)
pub const MAX_PARTICLES: usize = 512;

/// Who drives a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    Human,
    Bot,
}

/// A player or bot in the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub kind: CharacterKind,
    /// "P1".."P3" for humans, "NPC" for bots
    pub label: String,
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 normal, 2.0 giant, 0.5 tiny
    pub scale: f32,
    pub facing_right: bool,
    pub color: u32,
    pub grounded: bool,
    /// Admin flight: no gravity, drag instead
    pub flying: bool,
    pub frozen: bool,
    pub dead: bool,
}

impl Character {
    pub fn new(id: CharacterId, kind: CharacterKind, spawn: Vec2) -> Self {
        let label = match kind {
            CharacterKind::Human => format!("P{}", id + 1),
            CharacterKind::Bot => "NPC".to_string(),
        };
        Self {
            id,
            kind,
            label,
            pos: spawn,
            vel: Vec2::ZERO,
            scale: 1.0,
            facing_right: true,
            color: PLAYER_COLORS[id % PLAYER_COLORS.len()],
            grounded: false,
            flying: false,
            frozen: false,
            dead: false,
        }
    }

    /// Hitbox size after scaling
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT) * self.scale
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    #[inline]
    pub fn is_bot(&self) -> bool {
        self.kind == CharacterKind::Bot
    }
}

/// Cosmetic projectile dropped by a barrage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallingBomb {
    pub pos: Vec2,
    pub vy: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub color: u32,
}

/// Pending falling-bomb barrage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrage {
    pub target: CharacterId,
    pub remaining: u32,
    pub next_spawn_ms: f64,
}

/// Match phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    /// Terminal
    GameOver { winner: String },
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32, map: &'static str },
    BombPassed { from: CharacterId, to: CharacterId },
    Exploded { victim: CharacterId },
    /// Fired once per match, never in test mode
    MatchEnded { winner: String },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub config: MatchConfig,
    pub phase: MatchPhase,
    /// Round counter (1-based, increments on every reset)
    pub round: u32,
    /// Fixed-size roster, index == id
    pub characters: Vec<Character>,
    /// Index into `MAP_PRESETS`
    pub map_index: usize,
    /// Always a living character while playing (None only with nobody alive)
    pub bomb_holder: Option<CharacterId>,
    /// Wall-clock time of the last bomb pass
    pub last_transfer_ms: Option<f64>,
    /// Wall-clock start of the current round
    pub round_started_ms: f64,
    /// Seconds left on the bomb (recomputed each tick)
    pub time_left: f32,
    /// Admin override: every bot chases this character
    pub forced_target: Option<CharacterId>,
    pub barrage: Option<Barrage>,
    pub falling_bombs: Vec<FallingBomb>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub camera: Camera,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a match: fresh roster on a randomly chosen map
    pub fn new(seed: u64, config: MatchConfig, now_ms: f64) -> Self {
        let mut state = Self {
            seed,
            config,
            phase: MatchPhase::Playing,
            round: 0,
            characters: Vec::with_capacity(ROSTER_SIZE),
            map_index: 0,
            bomb_holder: None,
            last_transfer_ms: None,
            round_started_ms: now_ms,
            time_left: BOMB_DURATION_SECS,
            forced_target: None,
            barrage: None,
            falling_bombs: Vec::new(),
            particles: Vec::new(),
            camera: Camera::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.initialize_round(false, now_ms);
        state
    }

    /// Respawn the roster and re-arm the bomb
    ///
    /// Characters are rebuilt at their spawn points with default modifiers;
    /// anyone already dead this match stays dead. `keep_map = false` also
    /// samples a new arena.
    pub fn initialize_round(&mut self, keep_map: bool, now_ms: f64) {
        if !keep_map {
            self.map_index = self.rng.random_range(0..MAP_PRESETS.len());
        }

        let humans = self.config.human_count.get();
        let roster: Vec<Character> = (0..ROSTER_SIZE)
            .map(|id| {
                let (x, y) = SPAWN_POINTS[id];
                let kind = if id < humans {
                    CharacterKind::Human
                } else {
                    CharacterKind::Bot
                };
                let mut character = Character::new(id, kind, Vec2::new(x, y));
                character.frozen = self.config.is_test_mode && kind == CharacterKind::Bot;
                character.dead = self.characters.get(id).is_some_and(|c| c.dead);
                character
            })
            .collect();
        self.characters = roster;

        self.forced_target = None;
        self.barrage = None;
        self.falling_bombs.clear();

        let alive: Vec<CharacterId> = self.living().map(|c| c.id).collect();
        self.bomb_holder = if alive.is_empty() {
            None
        } else {
            Some(alive[self.rng.random_range(0..alive.len())])
        };
        self.last_transfer_ms = None;
        self.round_started_ms = now_ms;
        self.time_left = BOMB_DURATION_SECS;
        self.phase = MatchPhase::Playing;
        self.round += 1;

        let map = self.map().name;
        log::info!(
            "Round {} on {} (seed {}): {} alive, bomb starts with {:?}",
            self.round,
            map,
            self.seed,
            alive.len(),
            self.bomb_holder
        );
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            map,
        });
    }

    /// Bring every character back (test-mode sandbox loop)
    pub fn revive_all(&mut self) {
        for character in &mut self.characters {
            character.dead = false;
        }
    }

    pub fn map(&self) -> &'static MapPreset {
        &MAP_PRESETS[self.map_index]
    }

    pub fn platforms(&self) -> &'static [Platform] {
        self.map().platforms
    }

    pub fn living(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| c.is_alive())
    }

    pub fn survivors(&self) -> usize {
        self.living().count()
    }

    /// Living character by id (None if out of range or dead)
    pub fn living_character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id).filter(|c| c.is_alive())
    }

    pub fn living_character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id).filter(|c| c.is_alive())
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::GameOver { .. })
    }

    /// Seconds left on the bomb at wall-clock time `now_ms`
    pub fn countdown(&self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.round_started_ms) / 1000.0;
        (BOMB_DURATION_SECS as f64 - elapsed).max(0.0) as f32
    }

    /// Radial burst of particles
    pub fn spawn_burst(&mut self, at: Vec2, color: u32) {
        for _ in 0..BURST_PARTICLES {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = self.rng.random::<f32>() * 5.0 + 2.0;
            self.particles.push(Particle {
                pos: at,
                vel: direction(angle) * speed,
                life: 1.0,
                color,
            });
        }
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
