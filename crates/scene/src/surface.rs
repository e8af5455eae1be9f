use foundation::math::{
    Geodetic, Vec2, Vec3, WGS84_A, WGS84_B, ecef_to_geodetic, geodetic_to_ecef,
};

use crate::picking::Ray;

/// Planar rectangle limiting where a flat map exists.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extent {
    pub min: Vec2,
    pub max: Vec2,
}

impl Extent {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// The pickable map surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Surface {
    /// Flat map at `height`. World X/Y double as longitude/latitude degrees
    /// for geographic readouts. Without an extent the plane is unbounded.
    Plane {
        height: f64,
        extent: Option<Extent>,
    },
    /// WGS84 ellipsoid in ECEF meters.
    Wgs84,
}

impl Surface {
    pub fn plane(height: f64) -> Self {
        Surface::Plane {
            height,
            extent: None,
        }
    }

    pub fn bounded_plane(height: f64, extent: Extent) -> Self {
        Surface::Plane {
            height,
            extent: Some(extent),
        }
    }

    /// Nearest intersection in front of the ray origin, if the ray hits.
    pub fn intersect(&self, ray: Ray) -> Option<Vec3> {
        match *self {
            Surface::Plane { height, extent } => {
                if ray.dir.z.abs() < 1e-12 {
                    return None;
                }
                let t = (height - ray.origin.z) / ray.dir.z;
                if t < 0.0 {
                    return None;
                }
                let hit = ray.at(t);
                match extent {
                    Some(extent) if !extent.contains(hit.xy()) => None,
                    _ => Some(Vec3::new(hit.x, hit.y, height)),
                }
            }
            Surface::Wgs84 => ray_ellipsoid(ray),
        }
    }

    pub fn to_geodetic(&self, p: Vec3) -> Geodetic {
        match *self {
            Surface::Plane { height, .. } => Geodetic::from_degrees(p.x, p.y, p.z - height),
            Surface::Wgs84 => ecef_to_geodetic(p.into()),
        }
    }

    pub fn from_geodetic(&self, geo: Geodetic) -> Vec3 {
        match *self {
            Surface::Plane { height, .. } => {
                Vec3::new(geo.lon_deg(), geo.lat_deg(), height + geo.alt_m)
            }
            Surface::Wgs84 => geodetic_to_ecef(geo).into(),
        }
    }
}

fn ray_ellipsoid(ray: Ray) -> Option<Vec3> {
    // Scale space so the ellipsoid becomes the unit sphere.
    let inv = Vec3::new(1.0 / WGS84_A, 1.0 / WGS84_A, 1.0 / WGS84_B);
    let o = Vec3::new(ray.origin.x * inv.x, ray.origin.y * inv.y, ray.origin.z * inv.z);
    let d = Vec3::new(ray.dir.x * inv.x, ray.dir.y * inv.y, ray.dir.z * inv.z);

    let a = d.dot(d);
    let b = 2.0 * o.dot(d);
    let c = o.dot(o) - 1.0;
    let disc = b * b - 4.0 * a * c;
    if a <= 0.0 || disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t = if t0 >= 0.0 { t0 } else { t1 };
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

#[cfg(test)]
mod tests {
    use super::{Extent, Surface};
    use crate::picking::Ray;
    use foundation::math::{Geodetic, Vec2, Vec3, WGS84_A};

    fn down_from(x: f64, y: f64) -> Ray {
        Ray::new(Vec3::new(x, y, 100.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn plane_hit_lands_on_plane_height() {
        let hit = Surface::plane(2.0).intersect(down_from(3.0, 4.0)).unwrap();
        assert_eq!(hit, Vec3::new(3.0, 4.0, 2.0));
    }

    #[test]
    fn bounded_plane_misses_outside_extent() {
        let surface =
            Surface::bounded_plane(0.0, Extent::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)));
        assert!(surface.intersect(down_from(5.0, 5.0)).is_some());
        assert!(surface.intersect(down_from(11.0, 5.0)).is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let up = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(Surface::plane(0.0).intersect(up).is_none());
        let away = Ray::new(Vec3::new(2.0 * WGS84_A, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(Surface::Wgs84.intersect(away).is_none());
    }

    #[test]
    fn ellipsoid_hit_is_on_the_near_side() {
        let ray = Ray::new(Vec3::new(2.0 * WGS84_A, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = Surface::Wgs84.intersect(ray).unwrap();
        assert!((hit.x - WGS84_A).abs() < 1e-6);
    }

    #[test]
    fn plane_geodetic_is_identity_in_degrees() {
        let surface = Surface::plane(0.0);
        let geo = surface.to_geodetic(Vec3::new(10.0, 20.0, 0.0));
        assert!((geo.lon_deg() - 10.0).abs() < 1e-12);
        assert!((geo.lat_deg() - 20.0).abs() < 1e-12);
        let back = surface.from_geodetic(Geodetic::from_degrees(10.0, 20.0, 0.0));
        assert!((back.x - 10.0).abs() < 1e-12 && (back.y - 20.0).abs() < 1e-12);
    }
}
