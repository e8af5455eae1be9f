use foundation::math::{Geodetic, Vec2, Vec3, geodetic_to_ecef};

use crate::picking::Ray;

/// Screen-to-ray mapping for the headless host.
///
/// Both variants look straight down at the surface, which is all pointer
/// capture needs: every pixel maps to exactly one ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Camera {
    /// Orthographic view over a flat map. Pixel `(0, 0)` sits above `origin`
    /// and screen y grows along world +Y.
    Planar {
        origin: Vec2,
        units_per_px: f64,
        height: f64,
    },
    /// Nadir view over the globe. Pixel `(0, 0)` sits above
    /// `(origin_lon_deg, origin_lat_deg)`; screen y grows southwards.
    Globe {
        origin_lon_deg: f64,
        origin_lat_deg: f64,
        deg_per_px: f64,
        height_m: f64,
    },
}

impl Camera {
    /// One world unit per pixel, eye 1000 units above the plane.
    pub fn planar_identity() -> Self {
        Camera::Planar {
            origin: Vec2::ZERO,
            units_per_px: 1.0,
            height: 1000.0,
        }
    }

    pub fn screen_to_ray(&self, screen: Vec2) -> Option<Ray> {
        if !screen.is_finite() {
            return None;
        }
        match *self {
            Camera::Planar {
                origin,
                units_per_px,
                height,
            } => {
                let x = origin.x + screen.x * units_per_px;
                let y = origin.y + screen.y * units_per_px;
                Some(Ray::new(
                    Vec3::new(x, y, height),
                    Vec3::new(0.0, 0.0, -1.0),
                ))
            }
            Camera::Globe {
                origin_lon_deg,
                origin_lat_deg,
                deg_per_px,
                height_m,
            } => {
                let lon = origin_lon_deg + screen.x * deg_per_px;
                let lat = origin_lat_deg - screen.y * deg_per_px;
                if !(-90.0..=90.0).contains(&lat) {
                    return None;
                }
                let eye: Vec3 = geodetic_to_ecef(Geodetic::from_degrees(lon, lat, height_m)).into();
                let down = (Vec3::ZERO - eye).normalized()?;
                Some(Ray::new(eye, down))
            }
        }
    }

    /// Eye height above the surface, in world units.
    pub fn height(&self) -> f64 {
        match *self {
            Camera::Planar { height, .. } => height,
            Camera::Globe { height_m, .. } => height_m,
        }
    }
}
