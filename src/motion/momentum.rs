//! Motion domain: ball momentum and the cosmetic roll it drives.

use super::config::{BallConfig, MIN_ROLLING_RADIUS};
use super::wall::STEER_DEADZONE;

/// Smoothed horizontal velocity for the rolling form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BallMomentum {
    velocity: f32,
}

impl BallMomentum {
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }

    /// Advance toward `steer_x * speed` and return the tick's displacement.
    pub fn step(&mut self, config: &BallConfig, steer_x: f32, speed: f32, dt: f32) -> f32 {
        if steer_x.abs() > STEER_DEADZONE {
            let target = steer_x.clamp(-1.0, 1.0) * speed;
            self.velocity = move_towards(self.velocity, target, config.acceleration.max(0.0) * dt);
        } else {
            self.velocity = move_towards(self.velocity, 0.0, config.deceleration.max(0.0) * dt);
            if self.velocity.abs() < config.snap_threshold {
                self.velocity = 0.0;
            }
        }
        self.velocity * dt
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(target - current)
    }
}

/// Roll state for the ball visual. Never read back by physics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollVisual {
    pub active: bool,
    /// Accumulated rotation about the roll axis, in degrees.
    pub angle_degrees: f32,
}

impl RollVisual {
    /// Rotate for one tick. Rolling toward +x turns clockwise (negative angle).
    pub fn advance(&mut self, velocity: f32, rolling_radius: f32, dt: f32) {
        if !self.active {
            return;
        }
        self.angle_degrees -= roll_degrees(velocity, rolling_radius, dt);
        self.angle_degrees %= 360.0;
    }
}

/// Degrees turned in one tick by a ball of `rolling_radius` moving at `velocity`.
pub fn roll_degrees(velocity: f32, rolling_radius: f32, dt: f32) -> f32 {
    (velocity / rolling_radius.max(MIN_ROLLING_RADIUS)).to_degrees() * dt
}
