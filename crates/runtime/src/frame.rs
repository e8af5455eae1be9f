/// Deterministic frame metadata.
///
/// The host samples every live binding once per frame; events raised while a
/// frame is current are stamped with its index. Kept small and pure so a
/// capture session can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self { index, dt_s }
    }

    /// First frame at a 60 Hz cadence.
    pub fn first() -> Self {
        Self::new(0, 1.0 / 60.0)
    }

    /// Engine time at the start of the frame (seconds).
    pub fn elapsed_s(&self) -> f64 {
        self.index as f64 * self.dt_s
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first()
    }
}
