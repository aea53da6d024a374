//! Motion domain: the collision and scene seam the core ticks against.
//!
//! The core never owns geometry. A host hands it a [`MotionWorld`] each tick,
//! which answers grounded/ray/overlap queries and applies displacement. All
//! distances are in meters, x is horizontal, y is up and z is lane depth.

use std::hash::Hash;

use bevy::math::{Dir2, Vec2, Vec3};

use super::config::CollisionMask;

/// A ray hit reported by [`MotionWorld::cast_ray`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayContact {
    pub distance: f32,
    /// Surface normal at the hit point, pointing away from the surface.
    pub normal: Vec2,
}

/// Something that loses health when smashed.
pub trait Damageable {
    fn take_damage(&mut self, amount: u32);
}

/// Something that shatters when smashed.
pub trait Breakable {
    fn break_apart(&mut self);
}

/// Scene queries and the displacement primitive used during a tick.
///
/// Implementations must exclude trigger volumes/sensors from every query.
pub trait MotionWorld {
    /// Handle for an object found by an overlap query.
    type Target: Copy + Eq + Hash;

    /// Whether the body is standing on something this tick.
    fn is_grounded(&self) -> bool;

    /// Body center.
    fn position(&self) -> Vec3;

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayContact>;

    /// Every object overlapping the sphere. May contain duplicates.
    fn overlap_sphere(&self, center: Vec2, radius: f32, mask: CollisionMask) -> Vec<Self::Target>;

    /// Move the body by `delta`, resolving collisions.
    fn move_by(&mut self, delta: Vec2);

    /// Pin the body to a lane depth.
    fn constrain_depth(&mut self, depth: f32);

    fn damageable(&mut self, target: Self::Target) -> Option<&mut dyn Damageable>;

    fn breakable(&mut self, target: Self::Target) -> Option<&mut dyn Breakable>;
}
