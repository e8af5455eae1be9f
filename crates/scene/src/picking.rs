use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::components::{ComponentBounds, GeometryKind};
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub kind: GeometryKind,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// World-space radius of the sphere used to hit point markers.
    pub marker_radius: f64,
    /// Margin added around line/polygon bounds.
    pub line_tolerance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            marker_radius: 0.5,
            line_tolerance: 0.25,
        }
    }
}

/// Deterministic ray picking for scene entities.
///
/// Ordering contract:
/// - Point markers render without depth testing, so any marker hit wins over
///   lines and polygons.
/// - Within the same rank the closest hit along the (normalized) ray wins.
/// - Equal distances are broken by the lower `EntityId::index()`.
///
/// Hidden entities are never picked.
pub fn pick_ray(world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;
    let ray = Ray::new(ray.origin, dir);

    let mut best: Option<(u8, f64, EntityId, GeometryKind)> = None;

    for entity in world.entities() {
        if !world.is_visible(entity) {
            continue;
        }
        let Some(kind) = world.geometry_kind(entity) else {
            continue;
        };

        let hit = match kind {
            GeometryKind::Point => world
                .transform(entity)
                .and_then(|t| ray_sphere_hit_t(ray, t.position, opts.marker_radius)),
            GeometryKind::Line | GeometryKind::Polygon => world.bounds(entity).and_then(|b| {
                ray_aabb_hit_t(ray, b.expanded(opts.line_tolerance), 0.0, opts.max_distance)
            }),
        };
        let Some(t) = hit else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }

        let rank = match kind {
            GeometryKind::Point => 0,
            GeometryKind::Line | GeometryKind::Polygon => 1,
        };

        best = match best {
            None => Some((rank, t, entity, kind)),
            Some((br, bt, be, bk)) => {
                let ord = rank
                    .cmp(&br)
                    .then_with(|| stable_total_cmp_f64(t, bt))
                    .then_with(|| entity.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((rank, t, entity, kind))
                } else {
                    Some((br, bt, be, bk))
                }
            }
        };
    }

    let (_, t, entity, kind) = best?;
    Some(PickHit {
        entity,
        kind,
        distance: t,
        point: ray.at(t),
    })
}

fn ray_sphere_hit_t(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    // `ray.dir` is unit length.
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    if t1 < 0.0 {
        return None;
    }
    Some(t0.max(0.0))
}

fn ray_aabb_hit_t(
    ray: Ray,
    bounds: ComponentBounds,
    mut t_min: f64,
    mut t_max: f64,
) -> Option<f64> {
    let origin = ray.origin.as_array();
    let dir = ray.dir.as_array();
    let min = bounds.min.as_array();
    let max = bounds.max.as_array();

    // Slabs intersection; returns entry distance.
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];

        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min[axis] - o) * inv;
        let mut t2 = (max[axis] - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min.max(0.0))
}
