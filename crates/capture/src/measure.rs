//! Planar measurement helpers.
//!
//! These work on raw coordinates with no geodesic correction. On a flat map
//! in degrees the area is in square degrees; on the globe it is the area of
//! the ring projected onto the ECEF XY plane, which is not a surface area.

use foundation::math::precision::round_to;
use foundation::math::{Geodetic, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Shoelace sum over the XY components of a closed ring (last wraps to first).
///
/// Positive for counter-clockwise rings. Self-intersecting rings return the
/// signed sum of their lobes.
pub fn signed_shoelace_area(points: &[Vec3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += a.x * b.y - a.y * b.x;
    }
    twice / 2.0
}

pub fn shoelace_area(points: &[Vec3]) -> f64 {
    signed_shoelace_area(points).abs()
}

/// Area-weighted centroid of a closed ring.
///
/// Degenerate rings (collinear points, fewer than three vertices) fall back to
/// the vertex mean. `None` only for an empty ring.
pub fn polygon_centroid(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }

    let n = points.len();
    // Shift to the first vertex to keep the cross products small.
    let origin = points[0];
    let mut twice_area = 0.0;
    let mut acc = Vec2::ZERO;
    for i in 0..n {
        let a = points[i] - origin;
        let b = points[(i + 1) % n] - origin;
        let cross = a.perp_dot(b);
        twice_area += cross;
        acc = acc + (a + b) * cross;
    }

    if twice_area.abs() <= f64::EPSILON * 16.0 {
        let sum = points.iter().fold(Vec2::ZERO, |s, p| s + *p);
        return Some(sum * (1.0 / n as f64));
    }

    Some(origin + acc * (1.0 / (3.0 * twice_area)))
}

/// Longitude/latitude/altitude readout as shown next to the cursor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReadout {
    pub lon: f64,
    pub lat: f64,
    pub alt_km: f64,
}

impl GeoReadout {
    /// Degrees to 4 decimals, altitude to 2. The altitude is the camera
    /// height, not the height of the point.
    pub fn new(geo: Geodetic, camera_height_m: f64) -> Self {
        Self {
            lon: round_to(geo.lon_deg(), 4),
            lat: round_to(geo.lat_deg(), 4),
            alt_km: round_to(camera_height_m / 1000.0, 2),
        }
    }
}
