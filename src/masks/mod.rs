//! Masks: data-driven ability/profile provider for the motion core.
//!
//! A mask bundles speed and gravity multipliers, an optional jump profile
//! and ability flags that pick the movement form. [`MaskLoadout`] tracks
//! which mask is worn and how many are unlocked.

mod data;
mod loader;
mod loadout;

pub use data::{DataFile, MaskDef, MaskId, MaskLibrary};
pub use loader::{
    ContentLoadError, MASKS_FILE, MOTION_FILE, MaskValidationError, load_all, load_mask_library,
    load_motion_config, parse_mask_library, parse_motion_config, validate_masks,
};
pub use loadout::{EquipError, MaskLoadout, apply_mask};
