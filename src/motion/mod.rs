//! Motion domain: engine-agnostic locomotion core.
//!
//! [`MotionCore`] owns the character's motion state and steps it once per
//! fixed tick against a host-provided [`MotionWorld`]. Forms (default, ball,
//! cube, rock) are selected through [`StrategyKind`]; discrete events are
//! collected in an outbox and drained with [`MotionCore::drain_events`].

mod config;
mod controller;
mod impact;
mod momentum;
mod strategy;
#[cfg(test)]
mod tests;
mod timing;
#[cfg(feature = "dev-tools")]
mod trace;
mod wall;
mod world;

pub use config::{
    BallConfig, BounceProfile, CollisionMask, JumpProfile, MIN_JUMP_TERM, MIN_ROLLING_RADIUS,
    MotionConfig, RockConfig, WallFriction, WallStickConfig,
};
pub use controller::{MotionCore, MotionEvent, MotionInput, MotionState};
pub use impact::{ImpactAccumulator, ImpactThresholds};
pub use momentum::{BallMomentum, RollVisual, roll_degrees};
pub use strategy::{StrategyKind, UnknownStrategyTag};
pub use timing::JumpTimer;
#[cfg(feature = "dev-tools")]
pub use trace::{MotionSnapshot, MotionTrace};
pub use wall::{STEER_DEADZONE, WallContact, WallContactSensor, WallSide, WallStick};
pub use world::{Breakable, Damageable, MotionWorld, RayContact};
