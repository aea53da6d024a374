//! Loader for the RON tuning and mask files at startup.

use ron::Options;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::data::{DataFile, MaskDef, MaskId, MaskLibrary};
use crate::motion::MotionConfig;

pub const MOTION_FILE: &str = "motion.ron";
pub const MASKS_FILE: &str = "masks.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// A mask definition that loaded but cannot be used as written.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskValidationError {
    DuplicateId(MaskId),
    NonFiniteMultiplier { id: MaskId, field: &'static str },
}

impl std::fmt::Display for MaskValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskValidationError::DuplicateId(id) => {
                write!(f, "mask {:?} is defined more than once", id)
            }
            MaskValidationError::NonFiniteMultiplier { id, field } => {
                write!(f, "mask {:?} has a non-finite '{}'", id, field)
            }
        }
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

fn parse<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Parse a `DataFile<MaskDef>` document.
pub fn parse_mask_library(file: &str, contents: &str) -> Result<MaskLibrary, ContentLoadError> {
    let data: DataFile<MaskDef> = parse(file, contents)?;
    Ok(MaskLibrary::new(data.items))
}

/// Parse a single `MotionConfig` struct.
pub fn parse_motion_config(file: &str, contents: &str) -> Result<MotionConfig, ContentLoadError> {
    parse(file, contents)
}

pub fn load_mask_library(path: &Path) -> Result<MaskLibrary, ContentLoadError> {
    let contents = read_file(path)?;
    parse_mask_library(&path.display().to_string(), &contents)
}

pub fn load_motion_config(path: &Path) -> Result<MotionConfig, ContentLoadError> {
    let contents = read_file(path)?;
    parse_motion_config(&path.display().to_string(), &contents)
}

/// Load both data files from `base_path`.
/// Returns errors for any files that fail to load.
pub fn load_all(base_path: &Path) -> Result<(MotionConfig, MaskLibrary), Vec<ContentLoadError>> {
    let mut errors = Vec::new();

    let config = load_motion_config(&base_path.join(MOTION_FILE))
        .map_err(|e| errors.push(e))
        .ok();
    let library = load_mask_library(&base_path.join(MASKS_FILE))
        .map_err(|e| errors.push(e))
        .ok();

    match (config, library) {
        (Some(config), Some(library)) => Ok((config, library)),
        _ => Err(errors),
    }
}

/// Check a loaded library for definitions that would misbehave at runtime.
/// Returns a list of errors, empty if the library is usable as written.
pub fn validate_masks(library: &MaskLibrary) -> Vec<MaskValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for mask in library.iter() {
        if !seen.insert(mask.id) {
            errors.push(MaskValidationError::DuplicateId(mask.id));
        }
        if !mask.speed_multiplier.is_finite() {
            errors.push(MaskValidationError::NonFiniteMultiplier {
                id: mask.id,
                field: "speed_multiplier",
            });
        }
        if !mask.gravity_multiplier.is_finite() {
            errors.push(MaskValidationError::NonFiniteMultiplier {
                id: mask.id,
                field: "gravity_multiplier",
            });
        }
    }

    errors
}
