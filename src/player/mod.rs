//! Player domain: Bevy/avian host for the motion core.
//!
//! Loads tuning and masks, spawns the player, samples input every frame and
//! ticks each [`MotionBody`] in `FixedUpdate`. Core events are forwarded as
//! Bevy messages.

mod components;
pub mod dev;
mod messages;
mod resources;
mod systems;
mod world;

pub use components::{
    Breakable, Debris, GameLayer, Ground, Health, Loadout, MotionBody, Player, RollSprite, Wall,
};
pub use messages::{
    BounceMessage, FormChangedMessage, JumpMessage, LandMessage, SmashMessage,
};
#[cfg(feature = "dev-tools")]
pub use resources::MotionTraceLog;
pub use resources::{DATA_DIR, MaskCatalog, MotionSettings, PIXELS_PER_METER, PlayerInput};
pub use systems::visuals::form_color;

use std::path::Path;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::masks::{MaskLibrary, MaskLoadout, load_all, validate_masks};
use crate::motion::{MotionConfig, MotionCore};
use crate::player::systems::{
    apply_input, despawn_dead, log_motion_messages, read_input, shatter_broken, simulate_motion,
    tint_on_form_change, update_debris, update_roll_sprites,
};

pub struct MaskformPlugin;

impl Plugin for MaskformPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MotionSettings>()
            .init_resource::<MaskCatalog>()
            .init_resource::<PlayerInput>()
            .add_message::<JumpMessage>()
            .add_message::<LandMessage>()
            .add_message::<SmashMessage>()
            .add_message::<BounceMessage>()
            .add_message::<FormChangedMessage>()
            .add_systems(Startup, (load_motion_data, spawn_player).chain())
            .add_systems(FixedUpdate, simulate_motion)
            .add_systems(
                Update,
                (
                    (read_input, apply_input).chain(),
                    tint_on_form_change,
                    update_roll_sprites,
                    log_motion_messages,
                    (despawn_dead, shatter_broken, update_debris),
                ),
            );

        #[cfg(feature = "dev-tools")]
        app.init_resource::<MotionTraceLog>()
            .add_systems(FixedUpdate, dev::record_motion_trace.after(simulate_motion))
            .add_systems(Update, dev::dump_motion_trace.after(read_input));
    }
}

/// Load `motion.ron` and `masks.ron`, keeping the defaults on failure.
fn load_motion_data(mut settings: ResMut<MotionSettings>, mut catalog: ResMut<MaskCatalog>) {
    match load_all(Path::new(DATA_DIR)) {
        Ok((config, library)) => {
            for error in validate_masks(&library) {
                warn!("Mask data: {}", error);
            }
            info!(
                "Motion data loaded: {} masks, walk_speed={}, gravity={}",
                library.len(),
                config.walk_speed,
                config.gravity
            );
            settings.0 = config;
            catalog.library = library;
        }
        Err(errors) => {
            for error in &errors {
                warn!("{}", error);
            }
            warn!("Using built-in motion tuning and masks");
            settings.0 = MotionConfig::default();
            catalog.library = MaskLibrary::starter();
        }
    }
}

fn spawn_player(
    mut commands: Commands,
    settings: Res<MotionSettings>,
    catalog: Res<MaskCatalog>,
) {
    let config = settings.0.clone();
    let body_size = config.wall.body_radius * 2.0 * PIXELS_PER_METER;
    let roll_size = config.ball.rolling_radius * 2.0 * PIXELS_PER_METER;

    let mut core = MotionCore::new(config);
    let mut loadout = MaskLoadout::new(catalog.starting_unlocks);
    if let Err(err) = loadout.equip_index(0, &catalog.library, &mut core) {
        warn!("No starting mask: {}", err);
    }
    let color = form_color(core.strategy());

    info!(
        "Spawning player: mask={}, strategy={}, unlocked_masks={}",
        loadout
            .current(&catalog.library)
            .map_or("<none>", |mask| mask.display_name.as_str()),
        core.strategy(),
        loadout.unlocked_count()
    );

    commands
        .spawn((
            // Identity & Motion
            (Player, MotionBody(core), Loadout(loadout)),
            // Rendering
            Sprite {
                color,
                custom_size: Some(Vec2::splat(body_size)),
                ..default()
            },
            Transform::from_xyz(-200.0, 0.0, 0.0),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(body_size, body_size),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(0.0), // Gravity is integrated by the motion core
                Friction::new(0.0),
                CollisionLayers::new(
                    GameLayer::Player,
                    [
                        GameLayer::Ground,
                        GameLayer::Wall,
                        GameLayer::Breakable,
                        GameLayer::Enemy,
                    ],
                ),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                RollSprite,
                Sprite {
                    color: Color::srgb(0.2, 0.2, 0.2),
                    custom_size: Some(Vec2::new(roll_size * 0.15, roll_size * 0.8)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 0.1),
                Visibility::Hidden,
            ));
        });
}
