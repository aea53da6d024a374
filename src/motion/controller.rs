//! Motion domain: the motion controller, its shared state and per-tick pipeline.

use std::collections::HashSet;

use bevy::log::debug;
use bevy::math::Vec2;
use serde::Serialize;

use super::config::{JumpProfile, MIN_ROLLING_RADIUS, MotionConfig};
use super::impact::{ImpactAccumulator, ImpactThresholds};
use super::momentum::{BallMomentum, RollVisual};
use super::strategy::{StrategyKind, UnknownStrategyTag};
use super::timing::JumpTimer;
use super::wall::{self, WallContactSensor, WallSide, WallStick};
use super::world::MotionWorld;

/// Horizontal input below this magnitude is treated as no input.
const MOVE_EPSILON: f32 = 0.01;

/// Discrete motion events, drained by the host after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MotionEvent {
    Jump { velocity: f32, from_wall: bool },
    Land,
    Smash { impact_speed: f32 },
    Bounce { velocity: f32, impact_speed: f32 },
    FormChanged { from: StrategyKind, to: StrategyKind },
}

/// State shared by every form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub vertical_velocity: f32,
    pub momentum: BallMomentum,
    pub grounded: bool,
    pub was_grounded: bool,
    pub jump_held: bool,
    pub strategy: StrategyKind,
}

/// Steering inputs, overwritten by the host before each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionInput {
    pub move_axis: Vec2,
    pub sprint_held: bool,
}

/// How the final vertical integration treats this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum VerticalStep {
    Normal,
    /// Replace the ground snap with this velocity (bounce, recoil).
    LandingOverride(f32),
    /// Wall stick suspends gravity once the body stops rising.
    AllowStick,
}

/// Fixed-timestep locomotion simulator for one character.
#[derive(Debug, Clone)]
pub struct MotionCore {
    config: MotionConfig,
    sensor: WallContactSensor,
    profile: JumpProfile,
    input: MotionInput,
    speed_multiplier: f32,
    gravity_multiplier: f32,
    rolling_radius: f32,
    state: MotionState,
    timer: JumpTimer,
    wall: WallStick,
    bounce: ImpactAccumulator,
    smash: ImpactAccumulator,
    roll: RollVisual,
    rock_mode: bool,
    /// Lateral speed from a wall jump, applied on the next tick.
    pending_push: f32,
    lane_depth: Option<f32>,
    tick_count: u64,
    events: Vec<MotionEvent>,
}

impl Default for MotionCore {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionCore {
    pub fn new(config: MotionConfig) -> Self {
        let profile = config.default_jump.sanitized();
        let rolling_radius = config.ball.rolling_radius.max(MIN_ROLLING_RADIUS);
        Self {
            sensor: WallContactSensor::new(&config),
            config,
            profile,
            input: MotionInput::default(),
            speed_multiplier: 1.0,
            gravity_multiplier: 1.0,
            rolling_radius,
            state: MotionState::default(),
            timer: JumpTimer::new(),
            wall: WallStick::default(),
            bounce: ImpactAccumulator::default(),
            smash: ImpactAccumulator::default(),
            roll: RollVisual::default(),
            rock_mode: false,
            pending_push: 0.0,
            lane_depth: None,
            tick_count: 0,
            events: Vec::new(),
        }
    }

    // ===== External setters =====

    pub fn set_move_input(&mut self, move_axis: Vec2) {
        self.input.move_axis = if move_axis.is_finite() {
            move_axis
        } else {
            Vec2::ZERO
        };
    }

    pub fn set_sprint_held(&mut self, held: bool) {
        self.input.sprint_held = held;
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = sanitize_multiplier(multiplier);
    }

    pub fn set_gravity_multiplier(&mut self, multiplier: f32) {
        self.gravity_multiplier = sanitize_multiplier(multiplier);
    }

    pub fn set_jump_profile(&mut self, profile: JumpProfile) {
        self.profile = profile.sanitized();
    }

    pub fn set_rolling_radius(&mut self, radius: f32) {
        self.rolling_radius = if radius.is_finite() {
            radius.max(MIN_ROLLING_RADIUS)
        } else {
            self.config.ball.rolling_radius.max(MIN_ROLLING_RADIUS)
        };
    }

    /// Swap forms, running the old form's exit hook before the new one's
    /// enter hook. Selecting the active form does nothing.
    pub fn set_active_strategy(&mut self, next: StrategyKind) {
        let current = self.state.strategy;
        if current == next {
            return;
        }

        current.on_exit(self);
        self.state.strategy = next;
        next.on_enter(self);

        debug!("Strategy switch: {} -> {}", current, next);
        self.events.push(MotionEvent::FormChanged {
            from: current,
            to: next,
        });
    }

    /// Switch by name. Unknown names leave the current form untouched.
    pub fn request_strategy(&mut self, tag: &str) -> Result<StrategyKind, UnknownStrategyTag> {
        let next = tag.parse::<StrategyKind>()?;
        self.set_active_strategy(next);
        Ok(next)
    }

    pub fn jump_pressed(&mut self) {
        self.state.jump_held = true;

        if self.wall.is_sticking() {
            self.wall_jump();
            return;
        }

        self.timer.arm_buffer(self.profile.jump_buffer_time);
        self.try_consume_jump();
    }

    pub fn jump_released(&mut self) {
        self.state.jump_held = false;
    }

    // ===== Tick =====

    /// Advance one fixed step against `world`.
    pub fn tick<W: MotionWorld>(&mut self, dt: f32, world: &mut W) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.tick_count += 1;

        if self.config.lock_lane && self.lane_depth.is_none() {
            self.lane_depth = Some(world.position().z);
        }

        let grounded = world.is_grounded();
        let was_grounded = if self.tick_count == 1 {
            grounded
        } else {
            self.state.was_grounded
        };
        self.state.grounded = grounded;

        self.timer
            .refresh_coyote(grounded, self.profile.coyote_time, dt);
        self.timer.decay_buffer(dt);
        self.try_consume_jump();

        if self.pending_push != 0.0 {
            world.move_by(Vec2::new(self.pending_push * dt, 0.0));
            self.pending_push = 0.0;
        }

        let strategy = self.state.strategy;
        strategy.tick(self, world, dt, grounded);

        if grounded && !was_grounded {
            self.events.push(MotionEvent::Land);
        }

        if let Some(depth) = self.lane_depth {
            world.constrain_depth(depth);
        }

        self.state.was_grounded = grounded;
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, MotionEvent> {
        self.events.drain(..)
    }

    // ===== Accessors =====

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn input(&self) -> &MotionInput {
        &self.input
    }

    pub fn profile(&self) -> &JumpProfile {
        &self.profile
    }

    pub fn strategy(&self) -> StrategyKind {
        self.state.strategy
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    pub fn ball_velocity(&self) -> f32 {
        self.state.momentum.velocity()
    }

    pub fn timer(&self) -> &JumpTimer {
        &self.timer
    }

    pub fn is_sticking(&self) -> bool {
        self.wall.is_sticking()
    }

    pub fn wall_side(&self) -> WallSide {
        self.wall.side()
    }

    pub fn roll_visual(&self) -> &RollVisual {
        &self.roll
    }

    pub fn is_rock_mode(&self) -> bool {
        self.rock_mode
    }

    pub fn bounce_tracker(&self) -> &ImpactAccumulator {
        &self.bounce
    }

    pub fn smash_tracker(&self) -> &ImpactAccumulator {
        &self.smash
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn gravity_multiplier(&self) -> f32 {
        self.gravity_multiplier
    }

    pub fn rolling_radius(&self) -> f32 {
        self.rolling_radius
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Walk or sprint speed scaled by the form's speed multiplier.
    pub fn current_speed(&self) -> f32 {
        let base = if self.input.sprint_held {
            self.config.sprint_speed
        } else {
            self.config.walk_speed
        };
        base * self.speed_multiplier
    }

    /// Initial velocity a ground jump would get right now.
    pub fn jump_velocity(&self) -> f32 {
        let mut height = self.profile.jump_height;
        if self.rock_mode {
            height *= self.config.rock.jump_height_factor.max(0.0);
        }
        self.config.jump_velocity(height)
    }

    // ===== Jump =====

    fn try_consume_jump(&mut self) -> bool {
        if !self.timer.try_consume() {
            return false;
        }

        let velocity = self.jump_velocity();
        self.state.vertical_velocity = velocity;
        debug!(
            "Jump triggered: velocity={:.2}, strategy={}",
            velocity, self.state.strategy
        );
        self.events.push(MotionEvent::Jump {
            velocity,
            from_wall: false,
        });
        true
    }

    fn wall_jump(&mut self) {
        let side = self.wall.side();
        let velocity = self.config.wall.jump_up_velocity;

        self.state.vertical_velocity = velocity;
        self.pending_push = -side.sign() * self.config.wall.jump_push;
        self.wall.clear();
        self.timer.clear();

        debug!("Wall jump off {:?}: velocity={:.2}", side, velocity);
        self.events.push(MotionEvent::Jump {
            velocity,
            from_wall: true,
        });
    }

    // ===== Strategy building blocks =====

    pub(crate) fn set_roll_visual(&mut self, active: bool) {
        self.roll.active = active;
    }

    pub(crate) fn set_rock_mode(&mut self, enabled: bool) {
        self.rock_mode = enabled;
    }

    pub(crate) fn clear_wall_stick(&mut self) {
        if self.wall.is_sticking() {
            debug!("Wall stick released from {:?}", self.wall.side());
        }
        self.wall.clear();
    }

    pub(crate) fn reset_ball_bookkeeping(&mut self) {
        self.state.momentum.reset();
        self.bounce.reset();
    }

    pub(crate) fn reset_smash_bookkeeping(&mut self) {
        self.smash.reset();
        self.rock_mode = false;
    }

    pub(crate) fn move_horizontal_immediate<W: MotionWorld>(&mut self, world: &mut W, dt: f32) {
        let steer_x = self.input.move_axis.x;
        if steer_x.abs() > MOVE_EPSILON {
            world.move_by(Vec2::new(steer_x.signum() * self.current_speed() * dt, 0.0));
        }
    }

    pub(crate) fn move_horizontal_ball<W: MotionWorld>(&mut self, world: &mut W, dt: f32) {
        let speed = self.current_speed();
        let dx = self
            .state
            .momentum
            .step(&self.config.ball, self.input.move_axis.x, speed, dt);
        if dx != 0.0 {
            world.move_by(Vec2::new(dx, 0.0));
        }
    }

    pub(crate) fn advance_roll(&mut self, dt: f32) {
        self.roll
            .advance(self.state.momentum.velocity(), self.rolling_radius, dt);
    }

    /// Bounce velocity on the one landing tick that qualifies.
    pub(crate) fn check_bounce(&mut self, grounded: bool, dt: f32) -> Option<f32> {
        let bounce = self.profile.bounce?;
        let thresholds = ImpactThresholds {
            min_air_time: self.config.ball.min_air_time,
            min_fall_speed: bounce.min_fall_speed,
        };
        let impact_speed =
            self.bounce
                .observe(grounded, self.state.vertical_velocity, dt, thresholds)?;

        if bounce.velocity <= 0.0 {
            return None;
        }
        // A jump consumed on this landing tick takes precedence.
        if self.state.vertical_velocity > 0.0 {
            debug!("Ball bounce skipped: jump already launched");
            return None;
        }

        debug!(
            "Ball bounce: impact={:.2}, velocity={:.2}",
            impact_speed, bounce.velocity
        );
        self.events.push(MotionEvent::Bounce {
            velocity: bounce.velocity,
            impact_speed,
        });
        Some(bounce.velocity)
    }

    /// Emits a smash and strikes everything near the feet on the one
    /// landing tick that qualifies. Returns a recoil velocity if configured.
    pub(crate) fn update_rock_smash<W: MotionWorld>(
        &mut self,
        world: &mut W,
        grounded: bool,
        dt: f32,
    ) -> Option<f32> {
        let rock = self.config.rock;
        let thresholds = ImpactThresholds {
            min_air_time: rock.min_air_time,
            min_fall_speed: rock.min_fall_speed,
        };
        let impact_speed =
            self.smash
                .observe(grounded, self.state.vertical_velocity, dt, thresholds)?;

        self.events.push(MotionEvent::Smash { impact_speed });

        let center = world.position().truncate() + Vec2::new(0.0, rock.smash_offset_y);
        let mut seen = HashSet::new();
        let targets: Vec<W::Target> = world
            .overlap_sphere(center, rock.smash_radius.max(0.0), rock.smash_mask)
            .into_iter()
            .filter(|target| seen.insert(*target))
            .collect();

        let mut damaged = 0;
        let mut broken = 0;
        for target in targets {
            if let Some(damageable) = world.damageable(target) {
                damageable.take_damage(rock.damage);
                damaged += 1;
            }
            if let Some(breakable) = world.breakable(target) {
                breakable.break_apart();
                broken += 1;
            }
        }

        debug!(
            "Rock smash: impact={:.2}, damaged={}, broken={}",
            impact_speed, damaged, broken
        );

        let launched = self.state.vertical_velocity > 0.0;
        (rock.recoil_velocity > 0.0 && !launched).then_some(rock.recoil_velocity)
    }

    /// Cube wall-stick detection and response for one airborne tick.
    pub(crate) fn handle_wall_stick<W: MotionWorld>(&mut self, world: &mut W, dt: f32) {
        let steer_x = self.input.move_axis.x;
        let contact = self
            .sensor
            .probe(world)
            .filter(|contact| contact.side.is_steered_into(steer_x));

        let Some(contact) = contact else {
            self.clear_wall_stick();
            return;
        };

        if self.wall.side() != contact.side {
            debug!("Wall stick on {:?}", contact.side);
        }
        self.wall.stick(contact.side);
        self.state.vertical_velocity =
            wall::apply_wall_friction(&self.config.wall, self.state.vertical_velocity, dt);
        world.move_by(wall::contact_push(&self.config.wall, &contact, dt));
    }

    /// Ground snap, gravity, and the vertical displacement commit.
    pub(crate) fn integrate_vertical<W: MotionWorld>(
        &mut self,
        world: &mut W,
        dt: f32,
        grounded: bool,
        step: VerticalStep,
    ) {
        if grounded {
            if let VerticalStep::LandingOverride(velocity) = step {
                self.state.vertical_velocity = velocity;
            } else if self.state.vertical_velocity < 0.0 {
                self.state.vertical_velocity = self.config.ground_snap_velocity;
            }
        }

        // Gravity is suspended only while sliding; a rising body still decelerates.
        if step == VerticalStep::AllowStick
            && self.wall.is_sticking()
            && self.state.vertical_velocity <= 0.0
        {
            world.move_by(Vec2::new(0.0, self.state.vertical_velocity * dt));
            return;
        }

        let mut extra = 1.0;
        if !grounded {
            if self.state.vertical_velocity < 0.0 {
                extra = self.profile.fall_gravity_multiplier;
            } else if !self.state.jump_held {
                extra = self.profile.low_jump_gravity_multiplier;
            }
        }

        self.state.vertical_velocity += self.config.gravity * self.gravity_multiplier * extra * dt;
        world.move_by(Vec2::new(0.0, self.state.vertical_velocity * dt));
    }
}

fn sanitize_multiplier(multiplier: f32) -> f32 {
    if multiplier.is_finite() {
        multiplier.max(0.0)
    } else {
        1.0
    }
}
