use foundation::math::Vec3;

/// World placement of an entity: the marker position for points, the label
/// anchor for polygons.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self { position }
    }
}
