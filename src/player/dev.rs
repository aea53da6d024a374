//! Player domain: test room and debug-only trace tooling.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::player::{Breakable, GameLayer, Ground, Health, Wall};

#[cfg(feature = "dev-tools")]
use crate::player::{MotionBody, MotionTraceLog, Player, PlayerInput};

/// File the F9 trace dump is written to.
#[cfg(feature = "dev-tools")]
pub const TRACE_DUMP_PATH: &str = "motion_trace.json";

pub fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);
    let breakable_color = Color::srgb(0.6, 0.5, 0.35);

    let solid_filters = [GameLayer::Player, GameLayer::Enemy];
    let ground_layers = CollisionLayers::new(GameLayer::Ground, solid_filters);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, solid_filters);
    let breakable_layers = CollisionLayers::new(GameLayer::Breakable, solid_filters);

    let mut solid = |marker_ground: bool, size: Vec2, at: Vec3, rotation: f32, color: Color| {
        let mut entity = commands.spawn((
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(at).with_rotation(Quat::from_rotation_z(rotation)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
        ));
        if marker_ground {
            entity.insert((Ground, ground_layers));
        } else {
            entity.insert((Wall, wall_layers));
        }
    };

    // Floor, split around the breakable section
    solid(
        true,
        Vec2::new(420.0, 40.0),
        Vec3::new(-190.0, -200.0, 0.0),
        0.0,
        ground_color,
    );
    solid(
        true,
        Vec2::new(260.0, 40.0),
        Vec3::new(270.0, -200.0, 0.0),
        0.0,
        ground_color,
    );

    // Walls
    solid(
        false,
        Vec2::new(40.0, 500.0),
        Vec3::new(-420.0, 50.0, 0.0),
        0.0,
        wall_color,
    );
    solid(
        false,
        Vec2::new(40.0, 500.0),
        Vec3::new(420.0, 50.0, 0.0),
        0.0,
        wall_color,
    );

    // Ramp: ground, never a stickable wall
    solid(
        true,
        Vec2::new(200.0, 20.0),
        Vec3::new(-260.0, -130.0, 0.0),
        0.5,
        platform_color,
    );

    // Platform
    solid(
        true,
        Vec2::new(150.0, 20.0),
        Vec3::new(250.0, 50.0, 0.0),
        0.0,
        platform_color,
    );

    // Pillar for wall stick practice
    solid(
        false,
        Vec2::new(30.0, 200.0),
        Vec3::new(-60.0, -80.0, 0.0),
        0.0,
        wall_color,
    );

    // Pit floor
    solid(
        true,
        Vec2::new(120.0, 40.0),
        Vec3::new(80.0, -320.0, 0.0),
        0.0,
        ground_color,
    );

    // Breakable floor section over the pit
    commands.spawn((
        Name::new("Breakable floor"),
        Breakable::default(),
        Sprite {
            color: breakable_color,
            custom_size: Some(Vec2::new(120.0, 30.0)),
            ..default()
        },
        Transform::from_xyz(80.0, -195.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(120.0, 30.0),
        breakable_layers,
    ));

    // Dummy that takes smash damage
    commands.spawn((
        Name::new("Training dummy"),
        Health::new(3),
        Sprite {
            color: Color::srgb(0.8, 0.3, 0.3),
            custom_size: Some(Vec2::new(30.0, 50.0)),
            ..default()
        },
        Transform::from_xyz(300.0, -155.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(30.0, 50.0),
        CollisionLayers::new(GameLayer::Enemy, [GameLayer::Player]),
    ));

    info!("Test room spawned");
}

#[cfg(feature = "dev-tools")]
pub(crate) fn record_motion_trace(
    players: Query<&MotionBody, With<Player>>,
    mut trace: ResMut<MotionTraceLog>,
) {
    for body in &players {
        trace.0.record(body.0.snapshot());
    }
}

#[cfg(feature = "dev-tools")]
pub(crate) fn dump_motion_trace(input: Res<PlayerInput>, trace: Res<MotionTraceLog>) {
    if !input.dump_trace {
        return;
    }

    let json = match trace.0.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize motion trace: {}", e);
            return;
        }
    };

    match std::fs::write(TRACE_DUMP_PATH, json) {
        Ok(()) => info!(
            "Motion trace written: {} snapshots to {}",
            trace.0.len(),
            TRACE_DUMP_PATH
        ),
        Err(e) => error!("Failed to write {}: {}", TRACE_DUMP_PATH, e),
    }
}
