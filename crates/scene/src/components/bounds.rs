use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComponentBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ComponentBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight bounds of a point set; `None` when empty or non-finite.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for p in &points[1..] {
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        (min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    pub fn expanded(self, margin: f64) -> Self {
        let m = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentBounds;
    use foundation::math::Vec3;

    #[test]
    fn from_points_is_tight() {
        let b = ComponentBounds::from_points(&[
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 4.0, 0.5),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 0.5));
        assert!(ComponentBounds::from_points(&[]).is_none());
    }

    #[test]
    fn expanded_bounds_contain_nearby_points() {
        let b = ComponentBounds::new(Vec3::ZERO, Vec3::ZERO).expanded(0.5);
        assert!(b.contains(Vec3::new(0.25, -0.5, 0.0)));
        assert!(!b.contains(Vec3::new(0.75, 0.0, 0.0)));
    }
}
