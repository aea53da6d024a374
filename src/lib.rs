//! Maskform: a mask-driven 2.5D character locomotion core.
//!
//! - [`motion`] is the engine-agnostic fixed-step simulator.
//! - [`masks`] provides data-driven jump profiles and form selection.
//! - [`player`] hosts both inside Bevy with avian2d collision queries.

pub mod masks;
pub mod motion;
pub mod player;
