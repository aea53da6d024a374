//! Player domain: follow-up for targets struck by a smash.

use bevy::prelude::*;
use rand::Rng;

use crate::player::{Breakable, Debris, Health};

const DEBRIS_LIFETIME_SECS: f32 = 1.2;
const DEBRIS_GRAVITY: f32 = -900.0;

/// Broken sections are left to [`shatter_broken`].
pub(crate) fn despawn_dead(
    mut commands: Commands,
    query: Query<(Entity, &Health, Option<&Breakable>, Option<&Name>)>,
) {
    for (entity, health, breakable, name) in &query {
        if breakable.is_some_and(|b| b.broken) {
            continue;
        }
        if health.is_dead() {
            info!(
                "Target destroyed: {}",
                name.map(|n| n.as_str()).unwrap_or("<unnamed>")
            );
            commands.entity(entity).despawn();
        }
    }
}

/// Replace broken sections with scattering fragments.
pub(crate) fn shatter_broken(
    mut commands: Commands,
    query: Query<(Entity, &Breakable, &Transform, &Sprite)>,
) {
    let mut rng = rand::rng();

    for (entity, breakable, transform, sprite) in &query {
        if !breakable.broken {
            continue;
        }

        let size = sprite.custom_size.unwrap_or(Vec2::splat(32.0));
        let pieces = breakable.debris_pieces.max(1);
        let piece_size = Vec2::new(size.x / pieces as f32, size.y * 0.6);

        for i in 0..pieces {
            let offset_x = -size.x * 0.5 + piece_size.x * (i as f32 + 0.5);
            let velocity = Vec2::new(
                rng.random_range(-120.0..120.0),
                rng.random_range(80.0..320.0),
            );
            commands.spawn((
                Debris {
                    velocity,
                    spin: rng.random_range(-8.0..8.0),
                    lifetime: Timer::from_seconds(DEBRIS_LIFETIME_SECS, TimerMode::Once),
                },
                Sprite {
                    color: sprite.color,
                    custom_size: Some(piece_size),
                    ..default()
                },
                Transform::from_translation(transform.translation + Vec3::new(offset_x, 0.0, 0.1)),
            ));
        }

        debug!("Breakable shattered into {} pieces", pieces);
        commands.entity(entity).despawn();
    }
}

pub(crate) fn update_debris(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Debris, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut debris, mut transform) in &mut query {
        debris.lifetime.tick(time.delta());
        if debris.lifetime.remaining_secs() == 0.0 {
            commands.entity(entity).despawn();
            continue;
        }

        debris.velocity.y += DEBRIS_GRAVITY * dt;
        transform.translation += (debris.velocity * dt).extend(0.0);
        transform.rotate_z(debris.spin * dt);
    }
}
