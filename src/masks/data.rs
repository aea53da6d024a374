//! Mask definitions as stored in `assets/data/masks.ron`.

use serde::{Deserialize, Serialize};

use crate::motion::{BounceProfile, JumpProfile, StrategyKind};

/// Wrapper for list data files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

/// Mask identity. Numeric tags match the mask numbering used by level data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MaskId {
    Ball,
    Pyramid,
    Cube,
    Rock,
}

impl MaskId {
    pub fn tag(self) -> i32 {
        match self {
            MaskId::Ball => 0,
            MaskId::Pyramid => 1,
            MaskId::Cube => 2,
            MaskId::Rock => 3,
        }
    }

    /// `-1` (no mask) and unknown tags map to `None`.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(MaskId::Ball),
            1 => Some(MaskId::Pyramid),
            2 => Some(MaskId::Cube),
            3 => Some(MaskId::Rock),
            _ => None,
        }
    }
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MaskDef {
    pub id: MaskId,
    pub display_name: String,
    #[serde(default = "one")]
    pub speed_multiplier: f32,
    #[serde(default = "one")]
    pub gravity_multiplier: f32,
    /// Overrides the configured ball radius for the roll visual.
    #[serde(default)]
    pub rolling_radius: Option<f32>,
    #[serde(default)]
    pub enable_bounce: bool,
    #[serde(default)]
    pub enable_wall_stick: bool,
    #[serde(default)]
    pub enable_smash: bool,
    /// `None` keeps the configured default profile.
    #[serde(default)]
    pub jump: Option<JumpProfile>,
}

impl MaskDef {
    /// Form selected by the ability flags. Bounce wins over wall stick,
    /// wall stick over smash.
    pub fn strategy(&self) -> StrategyKind {
        if self.enable_bounce {
            StrategyKind::Ball
        } else if self.enable_wall_stick {
            StrategyKind::Cube
        } else if self.enable_smash {
            StrategyKind::Rock
        } else {
            StrategyKind::Default
        }
    }

    /// The profile this mask hands to the core. A bouncing mask without an
    /// explicit bounce gets the default one.
    pub fn jump_profile(&self, fallback: &JumpProfile) -> JumpProfile {
        let mut profile = self.jump.unwrap_or(*fallback);
        if self.enable_bounce && profile.bounce.is_none() {
            profile.bounce = Some(BounceProfile::default());
        }
        if !self.enable_bounce {
            profile.bounce = None;
        }
        profile
    }
}

/// Ordered list of masks. Order is the selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskLibrary {
    masks: Vec<MaskDef>,
}

impl MaskLibrary {
    pub fn new(masks: Vec<MaskDef>) -> Self {
        Self { masks }
    }

    /// Built-in masks used when `masks.ron` cannot be loaded.
    pub fn starter() -> Self {
        let mask = |id, display_name: &str| MaskDef {
            id,
            display_name: display_name.to_string(),
            speed_multiplier: 1.0,
            gravity_multiplier: 1.0,
            rolling_radius: None,
            enable_bounce: false,
            enable_wall_stick: false,
            enable_smash: false,
            jump: None,
        };

        Self::new(vec![
            MaskDef {
                speed_multiplier: 1.15,
                enable_bounce: true,
                ..mask(MaskId::Ball, "Ball")
            },
            MaskDef {
                enable_wall_stick: true,
                ..mask(MaskId::Cube, "Cube")
            },
            MaskDef {
                speed_multiplier: 0.8,
                gravity_multiplier: 1.3,
                enable_smash: true,
                ..mask(MaskId::Rock, "Rock")
            },
            mask(MaskId::Pyramid, "Pyramid"),
        ])
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn get_by_index(&self, index: usize) -> Option<&MaskDef> {
        self.masks.get(index)
    }

    /// Index of the first mask with `id`.
    pub fn find(&self, id: MaskId) -> Option<usize> {
        self.masks.iter().position(|mask| mask.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaskDef> {
        self.masks.iter()
    }
}
