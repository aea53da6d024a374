//! Motion domain: tuning data for locomotion and the per-form jump profile.
//!
//! Everything here deserializes from `assets/data/motion.ron`. Every struct
//! uses `#[serde(default)]` so a data file only has to name the fields it
//! overrides.

use serde::{Deserialize, Serialize};

/// Smallest gravity magnitude / jump height accepted before a square root.
pub const MIN_JUMP_TERM: f32 = 0.01;

/// Smallest rolling radius accepted before dividing by it.
pub const MIN_ROLLING_RADIUS: f32 = 0.01;

/// Bit mask naming the collision layers a query should hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn contains(self, other: CollisionMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Optional landing bounce carried by a jump profile (ball form).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BounceProfile {
    /// Fall speed at landing that triggers a bounce.
    pub min_fall_speed: f32,
    /// Upward velocity after the bounce.
    pub velocity: f32,
}

impl Default for BounceProfile {
    fn default() -> Self {
        Self {
            min_fall_speed: 5.0,
            velocity: 10.0,
        }
    }
}

/// Jump tuning supplied by the equipped form.
///
/// Profiles are swapped wholesale, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JumpProfile {
    /// Apex height in meters.
    pub jump_height: f32,
    /// Seconds after leaving ground during which a jump still fires.
    pub coyote_time: f32,
    /// Seconds an early jump press is remembered.
    pub jump_buffer_time: f32,
    /// Extra gravity while descending (>1 = snappier fall).
    pub fall_gravity_multiplier: f32,
    /// Extra gravity while ascending with jump released (>1 = short hop).
    pub low_jump_gravity_multiplier: f32,
    pub bounce: Option<BounceProfile>,
}

impl Default for JumpProfile {
    fn default() -> Self {
        Self {
            jump_height: 1.5,
            coyote_time: 0.15,
            jump_buffer_time: 0.1,
            fall_gravity_multiplier: 1.5,
            low_jump_gravity_multiplier: 2.0,
            bounce: None,
        }
    }
}

impl JumpProfile {
    /// Clamp every field into its usable range.
    ///
    /// Non-finite values fall back to the default for that field.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        Self {
            jump_height: finite_or(self.jump_height, defaults.jump_height).max(MIN_JUMP_TERM),
            coyote_time: finite_or(self.coyote_time, defaults.coyote_time).max(0.0),
            jump_buffer_time: finite_or(self.jump_buffer_time, defaults.jump_buffer_time).max(0.0),
            fall_gravity_multiplier: finite_or(
                self.fall_gravity_multiplier,
                defaults.fall_gravity_multiplier,
            )
            .max(1.0),
            low_jump_gravity_multiplier: finite_or(
                self.low_jump_gravity_multiplier,
                defaults.low_jump_gravity_multiplier,
            )
            .max(1.0),
            bounce: self.bounce.map(|bounce| BounceProfile {
                min_fall_speed: finite_or(bounce.min_fall_speed, 0.0).max(0.0),
                velocity: finite_or(bounce.velocity, 0.0).max(0.0),
            }),
        }
    }
}

/// How vertical speed is tamed while clinging to a wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub enum WallFriction {
    /// Vertical speed is clamped into `[-slide_speed, 0]` every tick.
    #[default]
    HardClamp,
    /// Vertical speed moves toward `-slide_speed` by `rate` m/s per second.
    EasedSlide { rate: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WallStickConfig {
    pub mask: CollisionMask,
    /// Probe length; raised to `body_radius + 0.05` if shorter.
    pub check_distance: f32,
    pub body_radius: f32,
    /// Probe origin height above the body center.
    pub chest_offset: f32,
    /// Largest `|normal.y|` still treated as a vertical wall.
    pub max_normal_y: f32,
    pub slide_speed: f32,
    pub friction: WallFriction,
    /// Lateral speed pushing the body into the wall while sticking.
    pub contact_push: f32,
    pub jump_up_velocity: f32,
    pub jump_push: f32,
}

impl Default for WallStickConfig {
    fn default() -> Self {
        Self {
            mask: CollisionMask::ALL,
            check_distance: 0.6,
            body_radius: 0.5,
            chest_offset: 0.3,
            max_normal_y: 0.2,
            slide_speed: 1.0,
            friction: WallFriction::HardClamp,
            contact_push: 0.5,
            jump_up_velocity: 8.0,
            jump_push: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BallConfig {
    pub acceleration: f32,
    pub deceleration: f32,
    /// Below this speed with no steering, momentum snaps to zero.
    pub snap_threshold: f32,
    pub rolling_radius: f32,
    /// Minimum airborne time before a landing may bounce.
    pub min_air_time: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            acceleration: 18.0,
            deceleration: 14.0,
            snap_threshold: 0.05,
            rolling_radius: 0.5,
            min_air_time: 0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RockConfig {
    /// Applied to the profile's jump height while in rock form.
    pub jump_height_factor: f32,
    pub min_air_time: f32,
    pub min_fall_speed: f32,
    pub smash_radius: f32,
    pub smash_mask: CollisionMask,
    /// Vertical offset of the smash center from the body center.
    pub smash_offset_y: f32,
    pub damage: u32,
    /// Upward velocity after a smash; zero keeps the normal ground snap.
    pub recoil_velocity: f32,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            jump_height_factor: 0.45,
            min_air_time: 0.15,
            min_fall_speed: 9.0,
            smash_radius: 1.5,
            smash_mask: CollisionMask::ALL,
            smash_offset_y: -0.5,
            damage: 1,
            recoil_velocity: 0.0,
        }
    }
}

/// Top-level tuning for the motion core.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Signed gravity used for integration (negative = down).
    pub gravity: f32,
    /// Positive magnitude used only by the jump-height formula.
    pub jump_gravity_magnitude: f32,
    /// Vertical velocity held while standing on ground.
    pub ground_snap_velocity: f32,
    /// Keep the depth coordinate fixed at its first sampled value.
    pub lock_lane: bool,
    /// Profile used until a form supplies one, and when it supplies none.
    pub default_jump: JumpProfile,
    pub wall: WallStickConfig,
    pub ball: BallConfig,
    pub rock: RockConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.5,
            sprint_speed: 7.0,
            gravity: -25.0,
            jump_gravity_magnitude: 25.0,
            ground_snap_velocity: -2.0,
            lock_lane: true,
            default_jump: JumpProfile::default(),
            wall: WallStickConfig::default(),
            ball: BallConfig::default(),
            rock: RockConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Initial jump velocity `sqrt(2 * g * h)` with degenerate inputs floored.
    pub fn jump_velocity(&self, jump_height: f32) -> f32 {
        let g = self.jump_gravity_magnitude.max(MIN_JUMP_TERM);
        (2.0 * g * jump_height.max(MIN_JUMP_TERM)).sqrt()
    }

    pub fn wall_probe_distance(&self) -> f32 {
        self.wall.check_distance.max(self.wall.body_radius + 0.05)
    }
}
