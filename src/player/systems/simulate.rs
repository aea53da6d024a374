//! Player domain: the fixed-step motion tick and its outbox.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::motion::MotionEvent;
use crate::player::world::{AvianMotionWorld, TargetQuery, probe_ground};
use crate::player::{
    BounceMessage, FormChangedMessage, JumpMessage, LandMessage, MotionBody, PIXELS_PER_METER,
    Player, SmashMessage,
};

#[derive(SystemParam)]
pub(crate) struct MotionWriters<'w> {
    jumps: MessageWriter<'w, JumpMessage>,
    lands: MessageWriter<'w, LandMessage>,
    smashes: MessageWriter<'w, SmashMessage>,
    bounces: MessageWriter<'w, BounceMessage>,
    forms: MessageWriter<'w, FormChangedMessage>,
}

impl MotionWriters<'_> {
    fn forward(&mut self, entity: Entity, event: MotionEvent) {
        match event {
            MotionEvent::Jump {
                velocity,
                from_wall,
            } => {
                self.jumps.write(JumpMessage {
                    entity,
                    velocity,
                    from_wall,
                });
            }
            MotionEvent::Land => {
                self.lands.write(LandMessage { entity });
            }
            MotionEvent::Smash { impact_speed } => {
                self.smashes.write(SmashMessage {
                    entity,
                    impact_speed,
                });
            }
            MotionEvent::Bounce {
                velocity,
                impact_speed,
            } => {
                self.bounces.write(BounceMessage {
                    entity,
                    velocity,
                    impact_speed,
                });
            }
            MotionEvent::FormChanged { from, to } => {
                self.forms.write(FormChangedMessage { entity, from, to });
            }
        }
    }
}

/// Tick every player's core once per fixed step.
pub(crate) fn simulate_motion(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut players: Query<
        (
            Entity,
            &mut MotionBody,
            &mut Transform,
            &mut LinearVelocity,
            &Collider,
        ),
        With<Player>,
    >,
    mut targets: TargetQuery,
    mut writers: MotionWriters,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut body, mut transform, mut velocity, collider) in &mut players {
        let half_height = match collider.shape_scaled().as_cuboid() {
            Some(c) => c.half_extents.y,
            None => PIXELS_PER_METER * 0.5,
        };
        let center = transform.translation.truncate();
        let grounded = probe_ground(&spatial_query, entity, center, half_height);

        let mut world = AvianMotionWorld::new(
            &spatial_query,
            &mut targets,
            entity,
            transform.translation,
            grounded,
        );
        body.0.tick(dt, &mut world);
        let outcome = world.finish();

        velocity.0 = outcome.displacement * PIXELS_PER_METER / dt;
        if let Some(depth) = outcome.depth {
            transform.translation.z = depth;
        }

        for event in body.0.drain_events() {
            writers.forward(entity, event);
        }
    }
}
