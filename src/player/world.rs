//! Player domain: the avian2d-backed scene seam for the motion core.
//!
//! The core thinks in meters; everything crossing this boundary is scaled by
//! [`PIXELS_PER_METER`]. Displacement is accumulated during the tick and
//! committed as a velocity afterwards so the solver resolves collisions.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::motion::{self, CollisionMask, MotionWorld, RayContact};
use crate::player::{Breakable, GameLayer, Health, PIXELS_PER_METER, Player};

/// Everything a smash may strike. The player itself is never a target.
pub(crate) type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (Option<&'static mut Health>, Option<&'static mut Breakable>),
    Without<Player>,
>;

/// Layers that can never block or be struck by motion queries.
pub(crate) fn query_mask(mask: CollisionMask) -> LayerMask {
    LayerMask(mask.0 & !GameLayer::Sensor.to_bits() & !GameLayer::Player.to_bits())
}

/// What a tick asked the host to commit.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TickOutcome {
    /// Displacement in meters.
    pub displacement: Vec2,
    pub depth: Option<f32>,
}

pub(crate) struct AvianMotionWorld<'a, 'qw, 'qs, 'w, 's> {
    spatial_query: &'a SpatialQuery<'qw, 'qs>,
    targets: &'a mut TargetQuery<'w, 's>,
    entity: Entity,
    /// Body center at the start of the tick, in pixels.
    origin: Vec3,
    grounded: bool,
    outcome: TickOutcome,
}

impl<'a, 'qw, 'qs, 'w, 's> AvianMotionWorld<'a, 'qw, 'qs, 'w, 's> {
    pub(crate) fn new(
        spatial_query: &'a SpatialQuery<'qw, 'qs>,
        targets: &'a mut TargetQuery<'w, 's>,
        entity: Entity,
        origin: Vec3,
        grounded: bool,
    ) -> Self {
        Self {
            spatial_query,
            targets,
            entity,
            origin,
            grounded,
            outcome: TickOutcome::default(),
        }
    }

    pub(crate) fn finish(self) -> TickOutcome {
        self.outcome
    }

    fn filter(&self, mask: CollisionMask) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(query_mask(mask)).with_excluded_entities([self.entity])
    }
}

impl MotionWorld for AvianMotionWorld<'_, '_, '_, '_, '_> {
    type Target = Entity;

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn position(&self) -> Vec3 {
        let center = self.origin.truncate() / PIXELS_PER_METER + self.outcome.displacement;
        center.extend(self.outcome.depth.unwrap_or(self.origin.z))
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<RayContact> {
        self.spatial_query
            .cast_ray(
                origin * PIXELS_PER_METER,
                direction,
                max_distance * PIXELS_PER_METER,
                true,
                &self.filter(mask),
            )
            .map(|hit| RayContact {
                distance: hit.distance / PIXELS_PER_METER,
                normal: hit.normal,
            })
    }

    fn overlap_sphere(&self, center: Vec2, radius: f32, mask: CollisionMask) -> Vec<Entity> {
        if radius <= 0.0 {
            return Vec::new();
        }
        self.spatial_query.shape_intersections(
            &Collider::circle(radius * PIXELS_PER_METER),
            center * PIXELS_PER_METER,
            0.0,
            &self.filter(mask),
        )
    }

    fn move_by(&mut self, delta: Vec2) {
        self.outcome.displacement += delta;
    }

    fn constrain_depth(&mut self, depth: f32) {
        self.outcome.depth = Some(depth);
    }

    fn damageable(&mut self, target: Entity) -> Option<&mut dyn motion::Damageable> {
        let (health, _) = self.targets.get_mut(target).ok()?;
        health.map(|health| health.into_inner() as &mut dyn motion::Damageable)
    }

    fn breakable(&mut self, target: Entity) -> Option<&mut dyn motion::Breakable> {
        let (_, breakable) = self.targets.get_mut(target).ok()?;
        breakable.map(|breakable| breakable.into_inner() as &mut dyn motion::Breakable)
    }
}

/// Short downward ray from the feet.
pub(crate) fn probe_ground(
    spatial_query: &SpatialQuery,
    entity: Entity,
    center: Vec2,
    half_height: f32,
) -> bool {
    let ground_filter = SpatialQueryFilter::from_mask([
        GameLayer::Ground,
        GameLayer::Wall,
        GameLayer::Breakable,
    ])
    .with_excluded_entities([entity]);

    let ray_origin = center - Vec2::new(0.0, half_height);
    let ray_distance = 4.0;

    spatial_query
        .cast_ray(ray_origin, Dir2::NEG_Y, ray_distance, true, &ground_filter)
        .is_some()
}
