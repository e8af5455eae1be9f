use foundation::math::Vec3;

/// Confirmed vertices of the drawing in progress plus the point under the
/// cursor.
///
/// `live` is never stored in `confirmed`; a click confirms a fresh point and
/// drops `live` until the next move derives it again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexSequence {
    confirmed: Vec<Vec3>,
    live: Option<Vec3>,
}

impl VertexSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(&mut self, point: Vec3) {
        self.confirmed.push(point);
        self.live = None;
    }

    pub fn set_live(&mut self, point: Vec3) {
        self.live = Some(point);
    }

    pub fn confirmed(&self) -> &[Vec3] {
        &self.confirmed
    }

    pub fn live(&self) -> Option<Vec3> {
        self.live
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    /// What the preview line shows: confirmed vertices followed by the cursor.
    pub fn temp_positions(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.confirmed.len() + 1);
        out.extend_from_slice(&self.confirmed);
        out.extend(self.live);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::VertexSequence;
    use foundation::math::Vec3;

    #[test]
    fn live_point_trails_confirmed_until_next_click() {
        let mut seq = VertexSequence::new();
        seq.confirm(Vec3::new(0.0, 0.0, 0.0));
        seq.set_live(Vec3::new(3.0, 0.0, 0.0));
        seq.set_live(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(seq.len(), 1);
        assert_eq!(
            seq.temp_positions(),
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)]
        );

        seq.confirm(Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(seq.live(), None);
        assert_eq!(seq.temp_positions(), seq.confirmed().to_vec());
    }
}
