//! Which mask is worn and how many are unlocked.

use bevy::log::{debug, info};

use super::data::{MaskDef, MaskId, MaskLibrary};
use crate::motion::MotionCore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    EmptyLibrary,
    IndexOutOfRange { index: usize, len: usize },
    Locked { index: usize, unlocked_count: usize },
    NotFound(MaskId),
}

impl std::fmt::Display for EquipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipError::EmptyLibrary => write!(f, "mask library is empty"),
            EquipError::IndexOutOfRange { index, len } => {
                write!(f, "mask index {} out of range (library has {})", index, len)
            }
            EquipError::Locked {
                index,
                unlocked_count,
            } => write!(
                f,
                "mask index {} is locked (unlocked_count={})",
                index, unlocked_count
            ),
            EquipError::NotFound(id) => write!(f, "no mask found for {:?}", id),
        }
    }
}

impl std::error::Error for EquipError {}

/// Selection state over a [`MaskLibrary`]. Masks unlock in library order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskLoadout {
    current: Option<usize>,
    unlocked_count: usize,
}

impl Default for MaskLoadout {
    fn default() -> Self {
        Self::new(2)
    }
}

impl MaskLoadout {
    pub fn new(unlocked_count: usize) -> Self {
        Self {
            current: None,
            unlocked_count: unlocked_count.max(1),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current<'a>(&self, library: &'a MaskLibrary) -> Option<&'a MaskDef> {
        self.current.and_then(|index| library.get_by_index(index))
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked_count
    }

    /// Raise the unlock count. Never lowers it.
    pub fn unlock(&mut self, count: usize) {
        if count > self.unlocked_count {
            info!("Masks unlocked: {}", count);
            self.unlocked_count = count;
        }
    }

    pub fn is_unlocked(&self, index: usize, library: &MaskLibrary) -> bool {
        index < self.clamped_unlocks(library)
    }

    /// Equip the mask at `index` and apply it to `core`.
    pub fn equip_index<'a>(
        &mut self,
        index: usize,
        library: &'a MaskLibrary,
        core: &mut MotionCore,
    ) -> Result<&'a MaskDef, EquipError> {
        if library.is_empty() {
            return Err(EquipError::EmptyLibrary);
        }
        self.unlocked_count = self.clamped_unlocks(library);

        let mask = library
            .get_by_index(index)
            .ok_or(EquipError::IndexOutOfRange {
                index,
                len: library.len(),
            })?;
        if index >= self.unlocked_count {
            return Err(EquipError::Locked {
                index,
                unlocked_count: self.unlocked_count,
            });
        }

        apply_mask(mask, core);
        self.current = Some(index);
        info!(
            "Equipped: {} ({:?}) index={}",
            mask.display_name, mask.id, index
        );
        Ok(mask)
    }

    /// Equip by identity rather than position.
    pub fn equip_mask<'a>(
        &mut self,
        id: MaskId,
        library: &'a MaskLibrary,
        core: &mut MotionCore,
    ) -> Result<&'a MaskDef, EquipError> {
        if library.is_empty() {
            return Err(EquipError::EmptyLibrary);
        }
        let index = library.find(id).ok_or(EquipError::NotFound(id))?;
        self.equip_index(index, library, core)
    }

    fn clamped_unlocks(&self, library: &MaskLibrary) -> usize {
        self.unlocked_count.clamp(1, library.len().max(1))
    }
}

/// Push a mask's modifiers, profile and form into the core.
pub fn apply_mask(mask: &MaskDef, core: &mut MotionCore) {
    core.set_speed_multiplier(mask.speed_multiplier);
    core.set_gravity_multiplier(mask.gravity_multiplier);

    let profile = mask.jump_profile(&core.config().default_jump);
    core.set_jump_profile(profile);

    match mask.rolling_radius {
        Some(radius) => core.set_rolling_radius(radius),
        None => core.set_rolling_radius(core.config().ball.rolling_radius),
    }

    if mask.id == MaskId::Pyramid {
        debug!("Aerial dash is not available; {} uses the default form", mask.display_name);
    }
    core.set_active_strategy(mask.strategy());
}
