//! Motion domain: vertical wall probing and the cube's wall-stick response.

use bevy::math::{Dir2, Vec2};
use serde::Serialize;

use super::config::{MotionConfig, WallFriction, WallStickConfig};
use super::world::MotionWorld;

/// Steering below this magnitude does not count as pushing into a wall.
pub const STEER_DEADZONE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WallSide {
    #[default]
    None,
    Left,
    Right,
}

impl WallSide {
    /// -1 for left, +1 for right, 0 for none.
    pub fn sign(self) -> f32 {
        match self {
            WallSide::None => 0.0,
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }

    /// Whether horizontal steering `steer_x` pushes toward this side.
    pub fn is_steered_into(self, steer_x: f32) -> bool {
        match self {
            WallSide::None => false,
            WallSide::Left => steer_x < -STEER_DEADZONE,
            WallSide::Right => steer_x > STEER_DEADZONE,
        }
    }
}

/// A stickable wall found this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub side: WallSide,
    pub normal: Vec2,
}

/// Two opposed probes from chest height. Left is checked first.
#[derive(Debug, Clone, Copy)]
pub struct WallContactSensor {
    config: WallStickConfig,
    reach: f32,
}

impl WallContactSensor {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            config: config.wall,
            reach: config.wall_probe_distance(),
        }
    }

    pub fn reach(&self) -> f32 {
        self.reach
    }

    /// Rejects hits whose normal leans toward a floor or ceiling.
    pub fn is_vertical_wall(&self, normal: Vec2) -> bool {
        normal.y.abs() <= self.config.max_normal_y
    }

    pub fn probe<W: MotionWorld>(&self, world: &W) -> Option<WallContact> {
        let origin = world.position().truncate() + Vec2::new(0.0, self.config.chest_offset);

        [(WallSide::Left, Dir2::NEG_X), (WallSide::Right, Dir2::X)]
            .into_iter()
            .find_map(|(side, direction)| {
                world
                    .cast_ray(origin, direction, self.reach, self.config.mask)
                    .filter(|hit| self.is_vertical_wall(hit.normal))
                    .map(|hit| WallContact {
                        side,
                        normal: hit.normal,
                    })
            })
    }
}

/// Persistent stick state. Only the side survives between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallStick {
    side: WallSide,
}

impl WallStick {
    pub fn is_sticking(&self) -> bool {
        self.side != WallSide::None
    }

    pub fn side(&self) -> WallSide {
        self.side
    }

    pub fn stick(&mut self, side: WallSide) {
        self.side = side;
    }

    pub fn clear(&mut self) {
        self.side = WallSide::None;
    }
}

/// New vertical velocity while clinging to a wall. Only a fall is slowed;
/// upward velocity passes through untouched.
pub fn apply_wall_friction(config: &WallStickConfig, vertical_velocity: f32, dt: f32) -> f32 {
    if vertical_velocity >= 0.0 {
        return vertical_velocity;
    }
    let target = -config.slide_speed.abs();
    match config.friction {
        WallFriction::HardClamp => vertical_velocity.max(target),
        WallFriction::EasedSlide { rate } => {
            let step = rate.abs() * dt;
            if (vertical_velocity - target).abs() <= step {
                target
            } else {
                vertical_velocity + step.copysign(target - vertical_velocity)
            }
        }
    }
}

/// Lateral displacement pressing the body into the wall for one tick.
pub fn contact_push(config: &WallStickConfig, contact: &WallContact, dt: f32) -> Vec2 {
    Vec2::new(-contact.normal.x * config.contact_push * dt, 0.0)
}
