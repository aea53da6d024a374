//! Motion domain: unit tests for timers, forms, contacts and landing effects.

use std::collections::HashMap;

use bevy::math::{Dir2, Vec2, Vec3};

use super::{
    BallConfig, BallMomentum, BounceProfile, Breakable, CollisionMask, Damageable,
    ImpactAccumulator, ImpactThresholds, JumpProfile, JumpTimer, MotionConfig, MotionCore,
    MotionEvent, MotionWorld, RayContact, RollVisual, StrategyKind, WallContactSensor,
    WallFriction, WallSide, roll_degrees,
};

const DT: f32 = 0.02;
const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// -----------------------------------------------------------------------------
// Scripted world
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Dummy {
    damage_taken: u32,
}

impl Damageable for Dummy {
    fn take_damage(&mut self, amount: u32) {
        self.damage_taken += amount;
    }
}

#[derive(Debug, Default)]
struct Crate {
    breaks: u32,
}

impl Breakable for Crate {
    fn break_apart(&mut self) {
        self.breaks += 1;
    }
}

#[derive(Debug, Default)]
struct Target {
    health: Option<Dummy>,
    breakable: Option<Crate>,
}

#[derive(Debug, Default)]
struct ScriptedWorld {
    grounded: bool,
    position: Vec3,
    /// Normal of the surface hit by the left probe.
    left_wall: Option<Vec2>,
    /// Normal of the surface hit by the right probe.
    right_wall: Option<Vec2>,
    overlaps: Vec<u32>,
    overlap_queries: std::cell::Cell<usize>,
    targets: HashMap<u32, Target>,
    moves: Vec<Vec2>,
}

impl MotionWorld for ScriptedWorld {
    type Target = u32;

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn cast_ray(
        &self,
        _origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayContact> {
        if !mask.contains(CollisionMask(1)) {
            return None;
        }
        let normal = if direction.x < 0.0 {
            self.left_wall
        } else {
            self.right_wall
        }?;
        let distance = 0.45;
        (distance <= max_distance).then_some(RayContact { distance, normal })
    }

    fn overlap_sphere(&self, _center: Vec2, _radius: f32, _mask: CollisionMask) -> Vec<u32> {
        self.overlap_queries.set(self.overlap_queries.get() + 1);
        self.overlaps.clone()
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta.extend(0.0);
        self.moves.push(delta);
    }

    fn constrain_depth(&mut self, depth: f32) {
        self.position.z = depth;
    }

    fn damageable(&mut self, target: u32) -> Option<&mut dyn Damageable> {
        self.targets
            .get_mut(&target)
            .and_then(|t| t.health.as_mut())
            .map(|d| d as &mut dyn Damageable)
    }

    fn breakable(&mut self, target: u32) -> Option<&mut dyn Breakable> {
        self.targets
            .get_mut(&target)
            .and_then(|t| t.breakable.as_mut())
            .map(|b| b as &mut dyn Breakable)
    }
}

fn run(core: &mut MotionCore, world: &mut ScriptedWorld, ticks: usize) -> Vec<MotionEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        core.tick(DT, world);
        events.extend(core.drain_events());
    }
    events
}

fn count_jumps(events: &[MotionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MotionEvent::Jump { .. }))
        .count()
}

fn count_smashes(events: &[MotionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MotionEvent::Smash { .. }))
        .count()
}

fn count_bounces(events: &[MotionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MotionEvent::Bounce { .. }))
        .count()
}

fn bouncy_profile() -> JumpProfile {
    JumpProfile {
        bounce: Some(BounceProfile::default()),
        ..JumpProfile::default()
    }
}

// -----------------------------------------------------------------------------
// Jump velocity
// -----------------------------------------------------------------------------

#[test]
fn test_jump_velocity_from_height() {
    let config = MotionConfig::default();
    assert!((config.jump_velocity(1.5) - 8.660_254).abs() < 1e-3);
    assert!((config.jump_velocity(1.5 * 0.45) - 5.809_475).abs() < 1e-3);
}

#[test]
fn test_rock_form_reduces_jump_velocity() {
    let mut core = MotionCore::default();
    assert!((core.jump_velocity() - 8.660_254).abs() < 1e-3);

    core.set_active_strategy(StrategyKind::Rock);
    assert!(core.is_rock_mode());
    assert!((core.jump_velocity() - 5.809_475).abs() < 1e-3);

    core.set_active_strategy(StrategyKind::Default);
    assert!(!core.is_rock_mode());
    assert!((core.jump_velocity() - 8.660_254).abs() < 1e-3);
}

#[test]
fn test_degenerate_gravity_magnitude_stays_finite() {
    let config = MotionConfig {
        jump_gravity_magnitude: -5.0,
        ..MotionConfig::default()
    };
    let velocity = config.jump_velocity(0.0);
    assert!(velocity.is_finite());
    assert!(velocity > 0.0);
}

#[test]
fn test_profile_sanitized_floors_degenerate_values() {
    let profile = JumpProfile {
        jump_height: -3.0,
        coyote_time: -1.0,
        jump_buffer_time: f32::NAN,
        fall_gravity_multiplier: 0.2,
        low_jump_gravity_multiplier: f32::INFINITY,
        bounce: Some(BounceProfile {
            min_fall_speed: -2.0,
            velocity: f32::NAN,
        }),
    }
    .sanitized();

    assert!(profile.jump_height > 0.0);
    assert_eq!(profile.coyote_time, 0.0);
    assert_eq!(profile.jump_buffer_time, JumpProfile::default().jump_buffer_time);
    assert_eq!(profile.fall_gravity_multiplier, 1.0);
    assert_eq!(
        profile.low_jump_gravity_multiplier,
        JumpProfile::default().low_jump_gravity_multiplier
    );
    let bounce = profile.bounce.unwrap();
    assert_eq!(bounce.min_fall_speed, 0.0);
    assert_eq!(bounce.velocity, 0.0);
}

// -----------------------------------------------------------------------------
// Jump timing
// -----------------------------------------------------------------------------

#[test]
fn test_jump_timer_consumes_once() {
    let mut timer = JumpTimer::new();
    timer.refresh_coyote(true, 0.15, DT);
    timer.arm_buffer(0.1);

    assert!(timer.try_consume());
    assert!(!timer.try_consume());
    assert!(!timer.try_consume());
    assert_eq!(timer.coyote_remaining(), 0.0);
    assert_eq!(timer.buffer_remaining(), 0.0);
}

#[test]
fn test_jump_timer_needs_both_windows() {
    let mut timer = JumpTimer::new();
    timer.arm_buffer(0.1);
    assert!(!timer.try_consume());

    timer.refresh_coyote(true, 0.15, DT);
    timer.decay_buffer(0.2);
    assert!(!timer.try_consume());
}

#[test]
fn test_jump_timer_decay_stops_at_zero() {
    let mut timer = JumpTimer::new();
    timer.refresh_coyote(true, 0.15, DT);
    timer.arm_buffer(0.1);

    for _ in 0..50 {
        timer.refresh_coyote(false, 0.15, DT);
        timer.decay_buffer(DT);
    }
    assert_eq!(timer.coyote_remaining(), 0.0);
    assert_eq!(timer.buffer_remaining(), 0.0);
    assert!(!timer.try_consume());
}

#[test]
fn test_grounded_press_jumps_immediately() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    run(&mut core, &mut world, 3);

    core.jump_pressed();
    let events: Vec<_> = core.drain_events().collect();

    assert_eq!(count_jumps(&events), 1);
    assert!((core.vertical_velocity() - 8.660_254).abs() < 1e-3);
    assert!(core.state().jump_held);
}

#[test]
fn test_buffered_press_fires_on_landing_once() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();

    // Long enough in the air for coyote time to run out.
    run(&mut core, &mut world, 20);
    core.jump_pressed();
    assert_eq!(count_jumps(&core.drain_events().collect::<Vec<_>>()), 0);

    let airborne = run(&mut core, &mut world, 2);
    assert_eq!(count_jumps(&airborne), 0);

    world.grounded = true;
    let landing = run(&mut core, &mut world, 1);
    assert_eq!(count_jumps(&landing), 1);
    assert!(core.vertical_velocity() > 0.0);

    let after = run(&mut core, &mut world, 10);
    assert_eq!(count_jumps(&after), 0);
}

#[test]
fn test_buffered_jump_precedes_land_event() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 20);

    core.jump_pressed();
    world.grounded = true;
    let events = run(&mut core, &mut world, 1);

    let jump_index = events
        .iter()
        .position(|e| matches!(e, MotionEvent::Jump { .. }))
        .unwrap();
    let land_index = events
        .iter()
        .position(|e| matches!(e, MotionEvent::Land))
        .unwrap();
    assert!(jump_index < land_index);
}

#[test]
fn test_buffer_expires_before_landing() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 20);

    core.jump_pressed();
    run(&mut core, &mut world, 6);

    world.grounded = true;
    let events = run(&mut core, &mut world, 5);
    assert_eq!(count_jumps(&events), 0);
}

#[test]
fn test_coyote_window_allows_late_jump() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    run(&mut core, &mut world, 3);

    world.grounded = false;
    run(&mut core, &mut world, 3);

    core.jump_pressed();
    let events: Vec<_> = core.drain_events().collect();
    assert_eq!(count_jumps(&events), 1);
    assert!((core.vertical_velocity() - 8.660_254).abs() < 1e-3);
}

#[test]
fn test_coyote_window_expires() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    run(&mut core, &mut world, 3);

    world.grounded = false;
    run(&mut core, &mut world, 10);
    let falling = core.vertical_velocity();
    assert!(falling < 0.0);

    core.jump_pressed();
    let events: Vec<_> = core.drain_events().collect();
    assert_eq!(count_jumps(&events), 0);
    assert_eq!(core.vertical_velocity(), falling);
}

#[test]
fn test_land_event_once_per_landing() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 5);

    world.grounded = true;
    let events = run(&mut core, &mut world, 10);
    let lands = events
        .iter()
        .filter(|e| matches!(e, MotionEvent::Land))
        .count();
    assert_eq!(lands, 1);
}

#[test]
fn test_ground_snap_clamps_fall_speed() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 30);
    assert!(core.vertical_velocity() < -5.0);

    world.grounded = true;
    run(&mut core, &mut world, 1);
    let expected = core.config().ground_snap_velocity + core.config().gravity * DT;
    assert!(approx_eq(core.vertical_velocity(), expected));
}

#[test]
fn test_low_jump_gravity_when_released() {
    let mut held = MotionCore::default();
    let mut released = MotionCore::default();
    for core in [&mut held, &mut released] {
        let mut world = ScriptedWorld {
            grounded: true,
            ..Default::default()
        };
        run(core, &mut world, 2);
        core.jump_pressed();
    }
    released.jump_released();

    let mut held_world = ScriptedWorld::default();
    let mut released_world = ScriptedWorld::default();
    run(&mut held, &mut held_world, 5);
    run(&mut released, &mut released_world, 5);

    assert!(released.vertical_velocity() < held.vertical_velocity());
}

#[test]
fn test_lane_depth_is_restored() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld {
        grounded: true,
        position: Vec3::new(0.0, 0.0, 3.0),
        ..Default::default()
    };
    run(&mut core, &mut world, 1);

    world.position.z = 5.0;
    run(&mut core, &mut world, 1);
    assert_eq!(world.position.z, 3.0);
}

#[test]
fn test_sprint_and_multiplier_scale_speed() {
    let mut core = MotionCore::default();
    assert_eq!(core.current_speed(), 4.5);

    core.set_sprint_held(true);
    assert_eq!(core.current_speed(), 7.0);

    core.set_speed_multiplier(0.5);
    assert_eq!(core.current_speed(), 3.5);

    core.set_speed_multiplier(f32::NAN);
    assert_eq!(core.speed_multiplier(), 1.0);
}

#[test]
fn test_immediate_movement_uses_full_speed() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    core.set_move_input(Vec2::new(0.3, 0.9));
    run(&mut core, &mut world, 1);

    assert!(approx_eq(world.moves[0].x, 4.5 * DT));
    assert_eq!(world.moves[0].y, 0.0);
}

// -----------------------------------------------------------------------------
// Wall contact
// -----------------------------------------------------------------------------

#[test]
fn test_sensor_rejects_ramps() {
    let sensor = WallContactSensor::new(&MotionConfig::default());
    assert!(sensor.is_vertical_wall(Vec2::new(1.0, 0.0)));
    assert!(sensor.is_vertical_wall(Vec2::new(0.98, 0.2)));
    assert!(!sensor.is_vertical_wall(Vec2::new(0.6, 0.8)));
    assert!(!sensor.is_vertical_wall(Vec2::new(0.0, -1.0)));
}

#[test]
fn test_sensor_reach_covers_body_radius() {
    let config = MotionConfig {
        wall: super::WallStickConfig {
            check_distance: 0.1,
            body_radius: 0.5,
            ..Default::default()
        },
        ..MotionConfig::default()
    };
    assert!(approx_eq(WallContactSensor::new(&config).reach(), 0.55));
}

#[test]
fn test_sensor_falls_through_to_valid_side() {
    let sensor = WallContactSensor::new(&MotionConfig::default());
    let world = ScriptedWorld {
        left_wall: Some(Vec2::new(0.6, 0.8)),
        right_wall: Some(Vec2::new(-1.0, 0.0)),
        ..Default::default()
    };
    let contact = sensor.probe(&world).unwrap();
    assert_eq!(contact.side, WallSide::Right);
    assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
}

#[test]
fn test_ramp_never_sticks() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    let mut world = ScriptedWorld {
        left_wall: Some(Vec2::new(0.6, 0.8)),
        ..Default::default()
    };
    core.set_move_input(Vec2::new(-1.0, 0.0));

    run(&mut core, &mut world, 10);
    assert!(!core.is_sticking());
}

#[test]
fn test_stick_requires_steering_into_wall() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    let mut world = ScriptedWorld {
        right_wall: Some(Vec2::new(-1.0, 0.0)),
        ..Default::default()
    };

    run(&mut core, &mut world, 2);
    assert!(!core.is_sticking());

    core.set_move_input(Vec2::new(-1.0, 0.0));
    run(&mut core, &mut world, 2);
    assert!(!core.is_sticking());

    core.set_move_input(Vec2::new(1.0, 0.0));
    run(&mut core, &mut world, 1);
    assert!(core.is_sticking());
    assert_eq!(core.wall_side(), WallSide::Right);

    core.set_move_input(Vec2::ZERO);
    run(&mut core, &mut world, 1);
    assert!(!core.is_sticking());
}

#[test]
fn test_stick_clears_when_grounded_or_wall_gone() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    core.set_move_input(Vec2::new(-1.0, 0.0));
    let mut world = ScriptedWorld {
        left_wall: Some(Vec2::new(1.0, 0.0)),
        ..Default::default()
    };

    run(&mut core, &mut world, 1);
    assert!(core.is_sticking());

    world.left_wall = None;
    run(&mut core, &mut world, 1);
    assert!(!core.is_sticking());

    world.left_wall = Some(Vec2::new(1.0, 0.0));
    run(&mut core, &mut world, 1);
    assert!(core.is_sticking());

    world.grounded = true;
    run(&mut core, &mut world, 1);
    assert!(!core.is_sticking());
}

#[test]
fn test_stick_friction_modes_settle_on_slide_speed() {
    for friction in [
        WallFriction::HardClamp,
        WallFriction::EasedSlide { rate: 20.0 },
    ] {
        let mut config = MotionConfig::default();
        config.wall.friction = friction;
        let slide = config.wall.slide_speed;

        let mut core = MotionCore::new(config);
        core.set_active_strategy(StrategyKind::Cube);
        let mut world = ScriptedWorld::default();
        run(&mut core, &mut world, 15);
        let falling = core.vertical_velocity();
        assert!(falling < -slide);

        world.right_wall = Some(Vec2::new(-1.0, 0.0));
        core.set_move_input(Vec2::new(1.0, 0.0));
        run(&mut core, &mut world, 1);
        assert!(core.is_sticking());

        match friction {
            WallFriction::HardClamp => assert_eq!(core.vertical_velocity(), -slide),
            WallFriction::EasedSlide { .. } => {
                assert!(core.vertical_velocity() > falling);
                assert!(core.vertical_velocity() < -slide);
            }
        }

        run(&mut core, &mut world, 60);
        assert!(approx_eq(core.vertical_velocity(), -slide), "{friction:?}");
    }
}

#[test]
fn test_stick_pushes_into_wall() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    core.set_move_input(Vec2::new(1.0, 0.0));
    let mut world = ScriptedWorld {
        right_wall: Some(Vec2::new(-1.0, 0.0)),
        ..Default::default()
    };
    run(&mut core, &mut world, 1);

    let push = core.config().wall.contact_push * DT;
    assert!(world.moves.iter().any(|m| approx_eq(m.x, push) && m.y == 0.0));
}

#[test]
fn test_wall_jump_kicks_away_from_wall() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    core.set_move_input(Vec2::new(1.0, 0.0));
    let mut world = ScriptedWorld {
        right_wall: Some(Vec2::new(-1.0, 0.0)),
        ..Default::default()
    };
    run(&mut core, &mut world, 3);
    assert!(core.is_sticking());
    core.drain_events().for_each(drop);

    core.jump_pressed();
    let events: Vec<_> = core.drain_events().collect();
    assert_eq!(
        events,
        vec![MotionEvent::Jump {
            velocity: 8.0,
            from_wall: true
        }]
    );
    assert!(!core.is_sticking());
    assert_eq!(core.vertical_velocity(), 8.0);
    assert_eq!(core.timer().coyote_remaining(), 0.0);
    assert_eq!(core.timer().buffer_remaining(), 0.0);

    core.set_move_input(Vec2::ZERO);
    world.moves.clear();
    run(&mut core, &mut world, 1);
    assert!(approx_eq(world.moves[0].x, -10.0 * DT));
}

#[test]
fn test_cube_jump_beside_wall_keeps_rising() {
    for friction in [
        WallFriction::HardClamp,
        WallFriction::EasedSlide { rate: 20.0 },
    ] {
        let mut config = MotionConfig::default();
        config.wall.friction = friction;
        let slide = config.wall.slide_speed;
        let gravity = config.gravity;

        let mut core = MotionCore::new(config);
        core.set_active_strategy(StrategyKind::Cube);
        core.set_move_input(Vec2::new(1.0, 0.0));
        let mut world = ScriptedWorld {
            grounded: true,
            right_wall: Some(Vec2::new(-1.0, 0.0)),
            ..Default::default()
        };
        run(&mut core, &mut world, 2);

        core.jump_pressed();
        let launched = core.vertical_velocity();
        assert!(launched > 0.0);

        world.grounded = false;
        run(&mut core, &mut world, 1);
        assert!(core.is_sticking(), "{friction:?}");
        assert!(
            approx_eq(core.vertical_velocity(), launched + gravity * DT),
            "{friction:?}"
        );

        run(&mut core, &mut world, 80);
        assert!(core.is_sticking());
        let vv = core.vertical_velocity();
        assert!(vv <= 0.0 && vv >= -slide - EPSILON, "{friction:?}: {vv}");
    }
}

#[test]
fn test_wall_jump_survives_steering_back_into_wall() {
    for friction in [
        WallFriction::HardClamp,
        WallFriction::EasedSlide { rate: 20.0 },
    ] {
        let mut config = MotionConfig::default();
        config.wall.friction = friction;
        let gravity = config.gravity;

        let mut core = MotionCore::new(config);
        core.set_active_strategy(StrategyKind::Cube);
        core.set_move_input(Vec2::new(1.0, 0.0));
        let mut world = ScriptedWorld {
            right_wall: Some(Vec2::new(-1.0, 0.0)),
            ..Default::default()
        };
        run(&mut core, &mut world, 3);
        assert!(core.is_sticking());

        core.jump_pressed();
        run(&mut core, &mut world, 1);
        assert!(core.is_sticking(), "{friction:?}");
        assert!(
            approx_eq(core.vertical_velocity(), 8.0 + gravity * DT),
            "{friction:?}"
        );
    }
}

// -----------------------------------------------------------------------------
// Ball momentum
// -----------------------------------------------------------------------------

fn easing_config() -> BallConfig {
    BallConfig {
        acceleration: 20.0,
        deceleration: 20.0,
        snap_threshold: 0.05,
        ..BallConfig::default()
    }
}

#[test]
fn test_momentum_accelerates_to_target() {
    let config = easing_config();
    let mut momentum = BallMomentum::default();
    let dt = 0.05;

    for tick in 1..=4 {
        momentum.step(&config, 1.0, 4.5, dt);
        assert!(approx_eq(momentum.velocity(), tick as f32));
    }

    momentum.step(&config, 1.0, 4.5, dt);
    assert_eq!(momentum.velocity(), 4.5);
    momentum.step(&config, 1.0, 4.5, dt);
    assert_eq!(momentum.velocity(), 4.5);
}

#[test]
fn test_momentum_decelerates_to_exact_zero() {
    let config = easing_config();
    let mut momentum = BallMomentum::default();
    for _ in 0..10 {
        momentum.step(&config, 1.0, 4.5, 0.05);
    }

    for _ in 0..4 {
        momentum.step(&config, 0.0, 4.5, 0.05);
        assert!(momentum.velocity() > 0.0);
    }
    momentum.step(&config, 0.0, 4.5, 0.05);
    assert_eq!(momentum.velocity(), 0.0);
}

#[test]
fn test_momentum_snaps_residual_drift() {
    let config = BallConfig {
        acceleration: 0.6,
        deceleration: 0.1,
        snap_threshold: 0.05,
        ..BallConfig::default()
    };
    let mut momentum = BallMomentum::default();

    momentum.step(&config, 1.0, 4.5, 0.05);
    assert!(approx_eq(momentum.velocity(), 0.03));

    momentum.step(&config, 0.0, 4.5, 0.05);
    assert_eq!(momentum.velocity(), 0.0);
}

#[test]
fn test_roll_degrees_from_velocity() {
    assert!((roll_degrees(1.0, 0.5, 1.0) - 114.591_56).abs() < 1e-2);
    assert!(roll_degrees(1.0, 0.0, DT).is_finite());

    let mut roll = RollVisual::default();
    roll.advance(2.0, 0.5, DT);
    assert_eq!(roll.angle_degrees, 0.0);

    roll.active = true;
    roll.advance(2.0, 0.5, DT);
    assert!(roll.angle_degrees < 0.0);
}

#[test]
fn test_ball_form_rolls_with_momentum() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Ball);
    assert!(core.roll_visual().active);

    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    core.set_move_input(Vec2::new(1.0, 0.0));
    run(&mut core, &mut world, 5);

    assert!(core.ball_velocity() > 0.0);
    assert!(core.ball_velocity() < core.current_speed());
    assert!(core.roll_visual().angle_degrees < 0.0);
}

// -----------------------------------------------------------------------------
// Landing impacts
// -----------------------------------------------------------------------------

#[test]
fn test_impact_accumulator_fires_once_per_landing() {
    let thresholds = ImpactThresholds {
        min_air_time: 0.1,
        min_fall_speed: 5.0,
    };
    let mut tracker = ImpactAccumulator::default();

    for _ in 0..10 {
        assert_eq!(tracker.observe(false, -8.0, DT, thresholds), None);
    }
    assert_eq!(tracker.observe(true, -8.0, DT, thresholds), Some(8.0));
    for _ in 0..10 {
        assert_eq!(tracker.observe(true, -2.0, DT, thresholds), None);
    }
    assert!(tracker.is_idle());

    assert_eq!(tracker.observe(false, -1.0, DT, thresholds), None);
    assert_eq!(tracker.airborne_time(), DT);
    assert_eq!(tracker.max_fall_speed(), 1.0);
}

#[test]
fn test_impact_accumulator_needs_both_thresholds() {
    let thresholds = ImpactThresholds {
        min_air_time: 0.1,
        min_fall_speed: 5.0,
    };
    let mut short_drop = ImpactAccumulator::default();
    short_drop.observe(false, -9.0, DT, thresholds);
    assert_eq!(short_drop.observe(true, -9.0, DT, thresholds), None);

    let mut slow_drop = ImpactAccumulator::default();
    for _ in 0..10 {
        slow_drop.observe(false, -1.0, DT, thresholds);
    }
    assert_eq!(slow_drop.observe(true, -1.0, DT, thresholds), None);
}

#[test]
fn test_ball_bounces_once_per_landing() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Ball);
    core.set_jump_profile(bouncy_profile());
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 30);

    world.grounded = true;
    let landing = run(&mut core, &mut world, 1);
    assert_eq!(count_bounces(&landing), 1);
    let expected = BounceProfile::default().velocity + core.config().gravity * DT;
    assert!(approx_eq(core.vertical_velocity(), expected));

    let after = run(&mut core, &mut world, 20);
    assert_eq!(count_bounces(&after), 0);
}

#[test]
fn test_jump_on_landing_tick_replaces_bounce() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Ball);
    core.set_jump_profile(bouncy_profile());
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 30);

    core.jump_pressed();
    world.grounded = true;
    let landing = run(&mut core, &mut world, 1);
    assert_eq!(count_jumps(&landing), 1);
    assert_eq!(count_bounces(&landing), 0);
    assert!(landing.contains(&MotionEvent::Land));

    let expected = core.jump_velocity() + core.config().gravity * DT;
    assert!(approx_eq(core.vertical_velocity(), expected));

    let after = run(&mut core, &mut world, 20);
    assert_eq!(count_bounces(&after), 0);
}

#[test]
fn test_ball_without_bounce_profile_snaps() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Ball);
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 30);

    world.grounded = true;
    let events = run(&mut core, &mut world, 5);
    assert_eq!(count_bounces(&events), 0);
    assert!(core.vertical_velocity() < 0.0);
}

fn smash_world() -> ScriptedWorld {
    let mut targets = HashMap::new();
    targets.insert(
        1,
        Target {
            health: Some(Dummy::default()),
            breakable: Some(Crate::default()),
        },
    );
    targets.insert(
        2,
        Target {
            health: Some(Dummy::default()),
            breakable: None,
        },
    );
    targets.insert(
        3,
        Target {
            health: None,
            breakable: Some(Crate::default()),
        },
    );
    targets.insert(4, Target::default());

    ScriptedWorld {
        overlaps: vec![1, 2, 1, 3, 4, 2],
        targets,
        ..Default::default()
    }
}

#[test]
fn test_rock_smash_once_and_strikes_each_target_once() {
    for recoil in [0.0, 4.0] {
        let mut config = MotionConfig::default();
        config.rock.recoil_velocity = recoil;
        let mut core = MotionCore::new(config);
        core.set_active_strategy(StrategyKind::Rock);

        let mut world = smash_world();
        run(&mut core, &mut world, 40);

        world.grounded = true;
        let landing = run(&mut core, &mut world, 1);
        assert_eq!(count_smashes(&landing), 1);
        if recoil > 0.0 {
            assert!(approx_eq(
                core.vertical_velocity(),
                recoil + core.config().gravity * DT
            ));
        } else {
            assert!(core.vertical_velocity() < 0.0);
        }

        let after = run(&mut core, &mut world, 25);
        assert_eq!(count_smashes(&after), 0);
        assert_eq!(world.overlap_queries.get(), 1);

        let targets = &world.targets;
        assert_eq!(targets[&1].health.as_ref().unwrap().damage_taken, 1);
        assert_eq!(targets[&1].breakable.as_ref().unwrap().breaks, 1);
        assert_eq!(targets[&2].health.as_ref().unwrap().damage_taken, 1);
        assert_eq!(targets[&3].breakable.as_ref().unwrap().breaks, 1);
    }
}

#[test]
fn test_rock_smash_event_carries_impact_speed() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Rock);
    let mut world = smash_world();
    run(&mut core, &mut world, 40);
    let falling = core.vertical_velocity();

    world.grounded = true;
    let landing = run(&mut core, &mut world, 1);
    let impact = landing
        .iter()
        .find_map(|e| match e {
            MotionEvent::Smash { impact_speed } => Some(*impact_speed),
            _ => None,
        })
        .unwrap();
    assert!(approx_eq(impact, -falling));
}

#[test]
fn test_jump_on_landing_tick_skips_smash_recoil() {
    let mut config = MotionConfig::default();
    config.rock.recoil_velocity = 4.0;
    let mut core = MotionCore::new(config);
    core.set_active_strategy(StrategyKind::Rock);

    let mut world = smash_world();
    run(&mut core, &mut world, 40);

    core.jump_pressed();
    world.grounded = true;
    let landing = run(&mut core, &mut world, 1);
    assert_eq!(count_jumps(&landing), 1);
    assert_eq!(count_smashes(&landing), 1);

    let expected = core.jump_velocity() + core.config().gravity * DT;
    assert!(approx_eq(core.vertical_velocity(), expected));
}

#[test]
fn test_short_rock_drop_does_not_smash() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Rock);
    let mut world = smash_world();
    run(&mut core, &mut world, 3);

    world.grounded = true;
    let events = run(&mut core, &mut world, 5);
    assert_eq!(count_smashes(&events), 0);
    assert_eq!(world.overlap_queries.get(), 0);
}

// -----------------------------------------------------------------------------
// Form switching
// -----------------------------------------------------------------------------

#[test]
fn test_ball_to_cube_midair_clears_ball_state() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Ball);
    core.set_jump_profile(bouncy_profile());
    core.set_move_input(Vec2::new(1.0, 0.0));

    let mut world = ScriptedWorld {
        grounded: true,
        ..Default::default()
    };
    run(&mut core, &mut world, 10);
    world.grounded = false;
    run(&mut core, &mut world, 5);

    assert!(core.ball_velocity() != 0.0);
    assert!(!core.bounce_tracker().is_idle());

    core.set_active_strategy(StrategyKind::Cube);
    assert_eq!(core.ball_velocity(), 0.0);
    assert!(core.bounce_tracker().is_idle());
    assert!(!core.roll_visual().active);
    assert_eq!(core.strategy(), StrategyKind::Cube);
}

#[test]
fn test_leaving_cube_clears_stick() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);
    core.set_move_input(Vec2::new(-1.0, 0.0));
    let mut world = ScriptedWorld {
        left_wall: Some(Vec2::new(1.0, 0.0)),
        ..Default::default()
    };
    run(&mut core, &mut world, 1);
    assert!(core.is_sticking());

    core.set_active_strategy(StrategyKind::Default);
    assert!(!core.is_sticking());

    // A press after leaving the cube is a normal buffered jump.
    core.jump_pressed();
    assert!(core.timer().buffer_remaining() > 0.0);
}

#[test]
fn test_leaving_rock_clears_smash_state() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Rock);
    let mut world = ScriptedWorld::default();
    run(&mut core, &mut world, 10);
    assert!(!core.smash_tracker().is_idle());

    core.set_active_strategy(StrategyKind::Ball);
    assert!(core.smash_tracker().is_idle());
    assert!(!core.is_rock_mode());
}

#[test]
fn test_same_strategy_is_noop() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Default);
    assert_eq!(core.drain_events().count(), 0);

    core.set_active_strategy(StrategyKind::Rock);
    let events: Vec<_> = core.drain_events().collect();
    assert_eq!(
        events,
        vec![MotionEvent::FormChanged {
            from: StrategyKind::Default,
            to: StrategyKind::Rock
        }]
    );
}

#[test]
fn test_unknown_strategy_tag_is_rejected() {
    let mut core = MotionCore::default();
    core.set_active_strategy(StrategyKind::Cube);

    assert!(core.request_strategy("pyramid").is_err());
    assert_eq!(core.strategy(), StrategyKind::Cube);

    assert_eq!(core.request_strategy(" Rock "), Ok(StrategyKind::Rock));
    assert_eq!(core.strategy(), StrategyKind::Rock);
}

#[cfg(feature = "dev-tools")]
#[test]
fn test_trace_keeps_latest_snapshots() {
    let mut core = MotionCore::default();
    let mut world = ScriptedWorld::default();
    let mut trace = super::MotionTrace::with_capacity(3);
    core.set_move_input(Vec2::new(-1.0, 0.0));

    for _ in 0..5 {
        core.tick(DT, &mut world);
        trace.record(core.snapshot());
    }

    assert_eq!(trace.len(), 3);
    assert_eq!(trace.latest().unwrap().tick, 5);
    assert_eq!(trace.latest().unwrap().move_x, -1.0);
    let json = trace.to_json().unwrap();
    assert!(json.contains("\"vertical_velocity\""));
    assert!(json.contains("\"tick\": 3"));
}
