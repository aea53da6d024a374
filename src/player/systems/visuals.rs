//! Player domain: form tint, roll rotation and motion feedback logging.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::motion::StrategyKind;
use crate::player::{
    BounceMessage, FormChangedMessage, JumpMessage, LandMessage, MotionBody, RollSprite,
    SmashMessage,
};

pub fn form_color(strategy: StrategyKind) -> Color {
    match strategy {
        StrategyKind::Default => Color::srgb(0.9, 0.9, 0.9),
        StrategyKind::Ball => Color::srgb(0.95, 0.6, 0.25),
        StrategyKind::Cube => Color::srgb(0.35, 0.55, 0.95),
        StrategyKind::Rock => Color::srgb(0.45, 0.42, 0.4),
    }
}

pub(crate) fn tint_on_form_change(
    mut form_changes: MessageReader<FormChangedMessage>,
    mut sprites: Query<&mut Sprite, With<MotionBody>>,
) {
    for change in form_changes.read() {
        if let Ok(mut sprite) = sprites.get_mut(change.entity) {
            sprite.color = form_color(change.to);
        }
    }
}

/// Mirror the core's roll angle onto the child sprite.
pub(crate) fn update_roll_sprites(
    bodies: Query<&MotionBody>,
    mut sprites: Query<(&ChildOf, &mut Transform, &mut Visibility), With<RollSprite>>,
) {
    for (child_of, mut transform, mut visibility) in &mut sprites {
        let Ok(body) = bodies.get(child_of.parent()) else {
            continue;
        };
        let roll = body.0.roll_visual();

        *visibility = if roll.active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        transform.rotation = Quat::from_rotation_z(roll.angle_degrees.to_radians());
    }
}

pub(crate) fn log_motion_messages(
    mut jumps: MessageReader<JumpMessage>,
    mut lands: MessageReader<LandMessage>,
    mut smashes: MessageReader<SmashMessage>,
    mut bounces: MessageReader<BounceMessage>,
    mut forms: MessageReader<FormChangedMessage>,
) {
    for jump in jumps.read() {
        debug!(
            "Jump: entity={:?}, velocity={:.2}, from_wall={}",
            jump.entity, jump.velocity, jump.from_wall
        );
    }
    for land in lands.read() {
        debug!("Landed: entity={:?}", land.entity);
    }
    for smash in smashes.read() {
        info!(
            "Smash: entity={:?}, impact_speed={:.2}",
            smash.entity, smash.impact_speed
        );
    }
    for bounce in bounces.read() {
        debug!(
            "Bounce: entity={:?}, velocity={:.2}, impact_speed={:.2}",
            bounce.entity, bounce.velocity, bounce.impact_speed
        );
    }
    for form in forms.read() {
        info!("Form changed: {} -> {}", form.from, form.to);
    }
}
