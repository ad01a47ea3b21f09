use crate::model::{Camera, PITCH_LIMIT};

/// Pointer-capture state and mouse look.
///
/// Capture is only ever set from the platform's capture-change notification,
/// never from the request that asked for it: a click requests pointer lock,
/// and the flag flips when the platform confirms. Loss of capture (escape,
/// focus steal) arrives the same way.
pub struct LookController {
    pub sensitivity: f32,
    captured: bool,
}

impl LookController {
    pub fn new() -> Self {
        Self {
            sensitivity: 0.002,
            captured: false,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Apply the platform capture-change notification
    pub fn set_captured(&mut self, locked: bool) {
        self.captured = locked;
    }

    /// Apply one raw pointer delta. While released this is a no-op: deltas
    /// are dropped, not accumulated.
    pub fn apply_delta(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if !self.captured {
            return;
        }
        camera.yaw += dx * self.sensitivity;
        camera.pitch = (camera.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_ignored_while_released() {
        let look = LookController::new();
        let mut cam = Camera::new(800, 600);
        let (yaw, pitch) = (cam.yaw, cam.pitch);
        look.apply_delta(&mut cam, 120.0, -45.0);
        look.apply_delta(&mut cam, -3.0, 800.0);
        assert_eq!(cam.yaw, yaw);
        assert_eq!(cam.pitch, pitch);
    }

    #[test]
    fn deltas_apply_while_captured() {
        let mut look = LookController::new();
        look.set_captured(true);
        let mut cam = Camera::new(800, 600);
        let yaw = cam.yaw;
        look.apply_delta(&mut cam, 10.0, 0.0);
        assert!((cam.yaw - yaw - 10.0 * look.sensitivity).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut look = LookController::new();
        look.set_captured(true);
        let mut cam = Camera::new(800, 600);
        look.apply_delta(&mut cam, 0.0, -1_000_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        look.apply_delta(&mut cam, 0.0, 1_000_000.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn capture_loss_stops_look_updates() {
        let mut look = LookController::new();
        look.set_captured(true);
        let mut cam = Camera::new(800, 600);
        look.apply_delta(&mut cam, 5.0, 0.0);
        let yaw_after_first = cam.yaw;

        look.set_captured(false);
        look.apply_delta(&mut cam, 5.0, 0.0);
        assert_eq!(cam.yaw, yaw_after_first);

        // a fresh capture resumes normally
        look.set_captured(true);
        look.apply_delta(&mut cam, 5.0, 0.0);
        assert!(cam.yaw > yaw_after_first);
    }
}
