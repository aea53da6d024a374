//! Player domain: input sampling and forwarding into the motion core.

use bevy::prelude::*;

use crate::player::{Loadout, MaskCatalog, MotionBody, Player, PlayerInput};

const MASK_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    input.axis = Vec2::new(x, 0.0);
    input.jump_just_pressed =
        keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyK);
    input.jump_just_released =
        keyboard.just_released(KeyCode::Space) || keyboard.just_released(KeyCode::KeyK);
    input.sprint_held =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    input.mask_select = MASK_KEYS
        .iter()
        .position(|key| keyboard.just_pressed(*key));
    input.dump_trace = keyboard.just_pressed(KeyCode::F9);
}

/// Jump edges go straight to the core so none are lost between fixed steps.
pub(crate) fn apply_input(
    input: Res<PlayerInput>,
    catalog: Res<MaskCatalog>,
    mut players: Query<(&mut MotionBody, &mut Loadout), With<Player>>,
) {
    for (mut body, mut loadout) in &mut players {
        let core = &mut body.0;
        core.set_move_input(input.axis);
        core.set_sprint_held(input.sprint_held);

        if let Some(index) = input.mask_select {
            if !loadout.0.is_unlocked(index, &catalog.library) {
                debug!("Mask slot {} is locked", index + 1);
            } else if let Err(err) = loadout.0.equip_index(index, &catalog.library, core) {
                warn!("Mask select ignored: {}", err);
            }
        }

        if input.jump_just_pressed {
            core.jump_pressed();
        }
        if input.jump_just_released {
            core.jump_released();
        }
    }
}
