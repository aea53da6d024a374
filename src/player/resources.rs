//! Player domain: tuning, content and input resources.

use bevy::prelude::*;

use crate::masks::MaskLibrary;
use crate::motion::MotionConfig;

/// Render pixels per simulation meter.
pub const PIXELS_PER_METER: f32 = 48.0;

/// Directory holding `motion.ron` and `masks.ron`.
pub const DATA_DIR: &str = "assets/data";

#[derive(Resource, Debug, Clone, Default)]
pub struct MotionSettings(pub MotionConfig);

#[derive(Resource, Debug, Clone)]
pub struct MaskCatalog {
    pub library: MaskLibrary,
    /// Masks unlocked when the player spawns.
    pub starting_unlocks: usize,
}

impl Default for MaskCatalog {
    fn default() -> Self {
        Self {
            library: MaskLibrary::starter(),
            starting_unlocks: 4,
        }
    }
}

/// Keyboard state sampled once per frame.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    pub axis: Vec2,
    pub jump_just_pressed: bool,
    pub jump_just_released: bool,
    pub sprint_held: bool,
    /// Library index requested this frame.
    pub mask_select: Option<usize>,
    pub dump_trace: bool,
}

#[cfg(feature = "dev-tools")]
#[derive(Resource, Debug, Default)]
pub struct MotionTraceLog(pub crate::motion::MotionTrace);
