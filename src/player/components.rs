//! Player domain: components and physics layers for the host scene.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::masks::MaskLoadout;
use crate::motion::{self, MotionCore};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms, ramps)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Ground that shatters under a smash
    Breakable,
    /// Damageable props and enemies
    Enemy,
    /// Sensors (triggers) - never hit by motion queries
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

/// The locomotion core driving this entity.
#[derive(Component, Debug)]
pub struct MotionBody(pub MotionCore);

/// Worn mask and unlock progress.
#[derive(Component, Debug, Default)]
pub struct Loadout(pub MaskLoadout);

/// Child sprite rotated by the ball form's roll.
#[derive(Component, Debug)]
pub struct RollSprite;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

#[derive(Component, Debug)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

impl motion::Damageable for Health {
    fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Ground section that shatters into debris when smashed.
#[derive(Component, Debug)]
pub struct Breakable {
    pub broken: bool,
    pub debris_pieces: u8,
}

impl Default for Breakable {
    fn default() -> Self {
        Self {
            broken: false,
            debris_pieces: 6,
        }
    }
}

impl motion::Breakable for Breakable {
    fn break_apart(&mut self) {
        self.broken = true;
    }
}

/// Cosmetic fragment left behind by a broken section.
#[derive(Component, Debug)]
pub struct Debris {
    pub velocity: Vec2,
    pub spin: f32,
    pub lifetime: Timer,
}
