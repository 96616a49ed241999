//! Deterministic match simulation
//!
//! All gameplay logic lives here. Given the same seed, inputs and frame
//! timestamps, a match plays out identically:
//! - One tick per frame, per-tick velocities
//! - Seeded RNG only
//! - Stable iteration order (roster order)
//! - No browser or rendering dependencies

pub mod camera;
pub mod collision;
pub mod directive;
pub mod effects;
pub mod maps;
pub mod npc;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{CollisionSide, Platform, Rect};
pub use directive::{Directive, parse as parse_directive};
pub use maps::{MAP_PRESETS, MapPreset};
pub use physics::{Controls, HeldKey, key_binding};
pub use snapshot::Snapshot;
pub use state::{Character, CharacterId, CharacterKind, GameEvent, GameState, MatchPhase};
pub use tick::{MAX_HUMANS, TickInput, tick};
