//! Read-only view of a tick for the presentation layer

use serde::Serialize;

use super::camera::Camera;
use super::collision::Platform;
use super::state::{Character, CharacterId, FallingBomb, GameState, MatchPhase, Particle};

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub seed: u64,
    pub round: u32,
    pub map_name: &'static str,
    pub platforms: &'static [Platform],
    /// Full roster; dead characters are flagged, not removed
    pub characters: &'a [Character],
    pub bomb_holder: Option<CharacterId>,
    /// Seconds left on the bomb
    pub time_left: f32,
    pub falling_bombs: &'a [FallingBomb],
    pub particles: &'a [Particle],
    pub camera: Camera,
    pub phase: &'a MatchPhase,
    pub is_test_mode: bool,
}

impl<'a> Snapshot<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            seed: state.seed,
            round: state.round,
            map_name: state.map().name,
            platforms: state.platforms(),
            characters: &state.characters,
            bomb_holder: state.bomb_holder,
            time_left: state.time_left,
            falling_bombs: &state.falling_bombs,
            particles: &state.particles,
            camera: state.camera,
            phase: &state.phase,
            is_test_mode: state.config.is_test_mode,
        }
    }

    /// Whole-seconds countdown as shown on the HUD
    pub fn countdown_label(&self) -> String {
        format!("{}", self.time_left.ceil() as u32)
    }

    /// Characters still in the match
    pub fn alive_count(&self) -> usize {
        self.characters.iter().filter(|c| c.is_alive()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
