//! Player domain: system modules for the host scene.

pub(crate) mod input;
pub(crate) mod simulate;
pub(crate) mod targets;
pub(crate) mod visuals;

pub(crate) use input::{apply_input, read_input};
pub(crate) use simulate::simulate_motion;
pub(crate) use targets::{despawn_dead, shatter_broken, update_debris};
pub(crate) use visuals::{log_motion_messages, tint_on_form_change, update_roll_sprites};
