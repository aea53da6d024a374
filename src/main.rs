use avian2d::prelude::*;
use bevy::prelude::*;

use maskform::player::{MaskformPlugin, PIXELS_PER_METER, dev::spawn_test_room};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Maskform".to_string(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default().with_length_unit(PIXELS_PER_METER))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins(MaskformPlugin)
        .add_systems(Startup, (setup_camera, spawn_test_room))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
