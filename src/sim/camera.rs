//! Smoothed camera framing all living characters
//!
//! Derived display state only; nothing in the simulation reads it back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Character;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::lerp;

/// Padding around the characters' bounding box
const PADDING_X: f32 = 300.0;
const PADDING_Y: f32 = 200.0;
pub const MIN_ZOOM: f32 = 0.6;
pub const MAX_ZOOM: f32 = 1.5;
/// Fraction of the remaining distance covered each tick
const SMOOTHING: f32 = 0.05;

/// World-space viewport origin plus zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Where the camera wants to be, or None with nobody alive
    pub fn target(characters: &[Character]) -> Option<Camera> {
        let mut living = characters.iter().filter(|c| c.is_alive()).peekable();
        living.peek()?;

        let (min, max) = living.fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), c| (min.min(c.pos), max.max(c.pos + c.size())),
        );
        let min = min - Vec2::new(PADDING_X, PADDING_Y);
        let max = max + Vec2::new(PADDING_X, PADDING_Y);
        let extent = max - min;

        let zoom = (CANVAS_WIDTH / extent.x)
            .min(CANVAS_HEIGHT / extent.y)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        let center = (min + max) / 2.0;

        Some(Camera {
            x: center.x - (CANVAS_WIDTH / 2.0) / zoom,
            y: center.y - (CANVAS_HEIGHT / 2.0) / zoom,
            zoom,
        })
    }

    /// Ease toward the frame around living characters; holds still if none
    pub fn follow(&mut self, characters: &[Character]) {
        let Some(target) = Self::target(characters) else {
            return;
        };
        self.zoom = lerp(self.zoom, target.zoom, SMOOTHING);
        self.x = lerp(self.x, target.x, SMOOTHING);
        self.y = lerp(self.y, target.y, SMOOTHING);
    }
}
