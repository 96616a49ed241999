//! Fixed catalog of arenas
//!
//! A match samples one of these on a full reset and keeps it for every
//! sudden-death round that follows.

use serde::Serialize;

use super::collision::Platform;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Thickness of the ground slab along the bottom of most maps
const FLOOR_HEIGHT: f32 = 40.0;
const FLOOR_Y: f32 = CANVAS_HEIGHT - FLOOR_HEIGHT;

/// A named set of static platforms
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapPreset {
    pub name: &'static str,
    pub platforms: &'static [Platform],
}

pub const MAP_PRESETS: &[MapPreset] = &[
    MapPreset {
        name: "Classic Arena",
        platforms: &[
            Platform::new(0.0, FLOOR_Y, CANVAS_WIDTH, FLOOR_HEIGHT),
            Platform::new(50.0, 420.0, 200.0, 20.0),
            Platform::new(950.0, 420.0, 200.0, 20.0),
            Platform::new(350.0, 320.0, 500.0, 20.0),
            Platform::new(100.0, 180.0, 150.0, 20.0),
            Platform::new(525.0, 150.0, 150.0, 20.0),
            Platform::new(950.0, 180.0, 150.0, 20.0),
            Platform::new(280.0, 250.0, 50.0, 20.0),
            Platform::new(870.0, 250.0, 50.0, 20.0),
        ],
    },
    MapPreset {
        name: "The Gap",
        platforms: &[
            // Floor with a hole in the middle
            Platform::new(0.0, FLOOR_Y, 400.0, FLOOR_HEIGHT),
            Platform::new(800.0, FLOOR_Y, 400.0, FLOOR_HEIGHT),
            // Island over the hole
            Platform::new(500.0, 500.0, 200.0, 20.0),
            Platform::new(200.0, 400.0, 150.0, 20.0),
            Platform::new(850.0, 400.0, 150.0, 20.0),
            // High bridge
            Platform::new(300.0, 200.0, 600.0, 20.0),
            Platform::new(50.0, 150.0, 100.0, 20.0),
            Platform::new(1050.0, 150.0, 100.0, 20.0),
        ],
    },
    MapPreset {
        name: "Twin Towers",
        platforms: &[
            Platform::new(0.0, FLOOR_Y, CANVAS_WIDTH, FLOOR_HEIGHT),
            // Left tower
            Platform::new(100.0, 450.0, 200.0, 20.0),
            Platform::new(100.0, 300.0, 200.0, 20.0),
            Platform::new(100.0, 150.0, 200.0, 20.0),
            // Right tower
            Platform::new(900.0, 450.0, 200.0, 20.0),
            Platform::new(900.0, 300.0, 200.0, 20.0),
            Platform::new(900.0, 150.0, 200.0, 20.0),
            // Center bridges
            Platform::new(400.0, 380.0, 400.0, 20.0),
            Platform::new(550.0, 220.0, 100.0, 20.0),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_inside_world() {
        for preset in MAP_PRESETS {
            assert!(!preset.platforms.is_empty(), "{} has no platforms", preset.name);
            for p in preset.platforms {
                assert!(p.x >= 0.0 && p.right() <= CANVAS_WIDTH, "{}: {:?}", preset.name, p);
                assert!(p.y >= 0.0 && p.bottom() <= CANVAS_HEIGHT, "{}: {:?}", preset.name, p);
            }
        }
    }
}
