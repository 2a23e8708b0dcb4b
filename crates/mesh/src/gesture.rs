//! Input glue between raw pointer events and the touch tracker.
//!
//! [`Viewport`] maps pixels to the normalized sheet space and
//! [`GestureSession`] applies the multi-finger session rules: fingers may be
//! added during a gesture, but lifting any finger ends every touch.

use glam::Vec2;

use crate::mesh::Mesh;

/// Drawable area in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Map a pixel position (origin top-left, y down) to `[0, 1]` with y up.
    ///
    /// Points at or below the bottom edge belong to the controls strip and
    /// are rejected.
    pub fn normalize(&self, px: f64, py: f64) -> Option<Vec2> {
        if self.is_empty() || py >= self.height as f64 {
            return None;
        }
        Some(Vec2::new(
            (px / self.width as f64) as f32,
            1.0 - (py / self.height as f64) as f32,
        ))
    }
}

/// Phase of a continuous pan gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Finger bookkeeping for the current gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureSession {
    finger_count: usize,
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most fingers seen in the current gesture.
    pub fn finger_count(&self) -> usize {
        self.finger_count
    }

    /// Route one gesture update to the mesh. `points` are the normalized
    /// positions of the fingers currently down, finger `i` feeding slot `i`.
    pub fn update(&mut self, mesh: &mut Mesh, phase: GesturePhase, points: &[Vec2]) {
        let fingers: Vec<Option<Vec2>> = points.iter().copied().map(Some).collect();
        self.update_fingers(mesh, phase, &fingers);
    }

    /// Like [`GestureSession::update`], for fingers that may lie outside the
    /// sheet. A `None` finger still counts towards the session but feeds no
    /// slot, so later fingers keep their slots.
    pub fn update_fingers(&mut self, mesh: &mut Mesh, phase: GesturePhase, fingers: &[Option<Vec2>]) {
        let count = fingers.len();
        if count == 0 {
            self.finger_count = 0;
        }
        if self.finger_count == 0 || self.finger_count < count {
            self.finger_count = count;
        }
        if self.finger_count != count {
            // A finger was lifted mid-gesture.
            mesh.touch_end_all();
            return;
        }

        match phase {
            GesturePhase::Began | GesturePhase::Changed => mesh.touch_points(fingers),
            GesturePhase::Ended => mesh.touch_end_all(),
            GesturePhase::Cancelled => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_flips_y() {
        let vp = Viewport::new(200, 100);
        assert_eq!(vp.normalize(0.0, 0.0), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(vp.normalize(100.0, 50.0), Some(Vec2::new(0.5, 0.5)));
        assert_eq!(vp.normalize(200.0, 99.0).map(|p| p.x), Some(1.0));
    }

    #[test]
    fn test_normalize_rejects_controls_strip() {
        let vp = Viewport::new(200, 100);
        assert_eq!(vp.normalize(10.0, 100.0), None);
        assert_eq!(vp.normalize(10.0, 250.0), None);
        assert_eq!(Viewport::default().normalize(0.0, 0.0), None);
    }

    #[test]
    fn test_aspect() {
        assert_eq!(Viewport::new(800, 400).aspect(), 2.0);
        assert_eq!(Viewport::default().aspect(), 1.0);
    }
}
