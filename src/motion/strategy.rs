//! Motion domain: the per-form movement state machine.
//!
//! Forms are a closed set, so dispatch is a `match` over [`StrategyKind`].
//! Every hook operates on the shared [`MotionCore`] state; enter/exit hooks
//! may run against stale sub-state and must leave it consistent for the new
//! form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::controller::{MotionCore, VerticalStep};
use super::world::MotionWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum StrategyKind {
    #[default]
    Default,
    Ball,
    Cube,
    Rock,
}

/// A form name that matches none of the known strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategyTag {
    pub tag: String,
}

impl fmt::Display for UnknownStrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown movement strategy '{}'", self.tag)
    }
}

impl std::error::Error for UnknownStrategyTag {}

impl FromStr for StrategyKind {
    type Err = UnknownStrategyTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(StrategyKind::Default),
            "ball" => Ok(StrategyKind::Ball),
            "cube" => Ok(StrategyKind::Cube),
            "rock" => Ok(StrategyKind::Rock),
            _ => Err(UnknownStrategyTag { tag: s.to_string() }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Default => "default",
            StrategyKind::Ball => "ball",
            StrategyKind::Cube => "cube",
            StrategyKind::Rock => "rock",
        };
        f.write_str(name)
    }
}

impl StrategyKind {
    pub(crate) fn on_enter(self, core: &mut MotionCore) {
        match self {
            StrategyKind::Default => {
                core.set_roll_visual(false);
                core.clear_wall_stick();
                core.reset_ball_bookkeeping();
                core.reset_smash_bookkeeping();
            }
            StrategyKind::Ball => {
                core.clear_wall_stick();
                core.reset_ball_bookkeeping();
                core.reset_smash_bookkeeping();
                core.set_roll_visual(true);
            }
            StrategyKind::Cube => {
                core.set_roll_visual(false);
                core.reset_ball_bookkeeping();
                core.reset_smash_bookkeeping();
                core.clear_wall_stick();
            }
            StrategyKind::Rock => {
                core.set_roll_visual(false);
                core.clear_wall_stick();
                core.reset_ball_bookkeeping();
                core.reset_smash_bookkeeping();
                core.set_rock_mode(true);
            }
        }
    }

    pub(crate) fn on_exit(self, core: &mut MotionCore) {
        match self {
            StrategyKind::Default => {}
            StrategyKind::Ball => {
                core.set_roll_visual(false);
                core.reset_ball_bookkeeping();
            }
            StrategyKind::Cube => core.clear_wall_stick(),
            StrategyKind::Rock => {
                core.reset_smash_bookkeeping();
            }
        }
    }

    pub(crate) fn tick<W: MotionWorld>(
        self,
        core: &mut MotionCore,
        world: &mut W,
        dt: f32,
        grounded: bool,
    ) {
        match self {
            StrategyKind::Default => {
                core.move_horizontal_immediate(world, dt);
                core.integrate_vertical(world, dt, grounded, VerticalStep::Normal);
            }
            StrategyKind::Ball => {
                core.move_horizontal_ball(world, dt);
                let step = match core.check_bounce(grounded, dt) {
                    Some(velocity) => VerticalStep::LandingOverride(velocity),
                    None => VerticalStep::Normal,
                };
                core.integrate_vertical(world, dt, grounded, step);
                core.advance_roll(dt);
            }
            StrategyKind::Cube => {
                core.move_horizontal_immediate(world, dt);
                if grounded {
                    core.clear_wall_stick();
                } else {
                    core.handle_wall_stick(world, dt);
                }
                core.integrate_vertical(world, dt, grounded, VerticalStep::AllowStick);
            }
            StrategyKind::Rock => {
                core.move_horizontal_immediate(world, dt);
                let step = match core.update_rock_smash(world, grounded, dt) {
                    Some(velocity) => VerticalStep::LandingOverride(velocity),
                    None => VerticalStep::Normal,
                };
                core.integrate_vertical(world, dt, grounded, step);
            }
        }
    }
}
