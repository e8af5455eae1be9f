use foundation::math::Vec3;

use crate::components::{LineStyle, PointStyle, PolygonStyle};
use crate::dynamic::Dynamic;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

/// Renderable geometry attached to an entity.
///
/// A point takes its position from the entity transform; lines and polygons
/// carry their own vertex source, which may be a live binding.
#[derive(Debug, Clone)]
pub enum Geometry {
    Point {
        style: PointStyle,
    },
    Line {
        positions: Dynamic<Vec<Vec3>>,
        style: LineStyle,
    },
    Polygon {
        hierarchy: Dynamic<Vec<Vec3>>,
        style: PolygonStyle,
    },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point { .. } => GeometryKind::Point,
            Geometry::Line { .. } => GeometryKind::Line,
            Geometry::Polygon { .. } => GeometryKind::Polygon,
        }
    }

    pub fn vertex_source(&self) -> Option<&Dynamic<Vec<Vec3>>> {
        match self {
            Geometry::Point { .. } => None,
            Geometry::Line { positions, .. } => Some(positions),
            Geometry::Polygon { hierarchy, .. } => Some(hierarchy),
        }
    }

    /// Rebind the vertex source. Returns `false` for points, which have none.
    pub fn set_vertex_source(&mut self, source: Dynamic<Vec<Vec3>>) -> bool {
        match self {
            Geometry::Point { .. } => false,
            Geometry::Line { positions, .. } => {
                *positions = source;
                true
            }
            Geometry::Polygon { hierarchy, .. } => {
                *hierarchy = source;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind};
    use crate::components::{LineStyle, PointStyle};
    use crate::dynamic::Dynamic;
    use foundation::math::Vec3;

    #[test]
    fn points_have_no_vertex_source() {
        let mut g = Geometry::Point {
            style: PointStyle::default(),
        };
        assert_eq!(g.kind(), GeometryKind::Point);
        assert!(g.vertex_source().is_none());
        assert!(!g.set_vertex_source(Dynamic::Static(Vec::new())));
    }

    #[test]
    fn line_source_can_be_rebound() {
        let mut g = Geometry::Line {
            positions: Dynamic::Static(vec![Vec3::ZERO]),
            style: LineStyle::default(),
        };
        assert!(g.set_vertex_source(Dynamic::Static(vec![Vec3::new(1.0, 2.0, 3.0)])));
        let sampled = g.vertex_source().map(|s| s.sample()).unwrap();
        assert_eq!(sampled, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }
}
