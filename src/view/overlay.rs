use glam::{Mat4, Vec3};

use crate::model::{Camera, LabelAnchor};

/// Labels further than this from the camera are hidden
pub const LABEL_VISIBLE_DISTANCE: f32 = 30.0;

/// Where an anchor landed on screen this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPlacement {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// Projects world-space anchors to pixel coordinates with visibility culling.
/// Runs for every anchor every frame; camera and viewport vary continuously,
/// so nothing is memoized.
pub struct LabelProjector {
    pub visible_distance: f32,
}

impl Default for LabelProjector {
    fn default() -> Self {
        Self {
            visible_distance: LABEL_VISIBLE_DISTANCE,
        }
    }
}

impl LabelProjector {
    pub fn project(
        &self,
        world: Vec3,
        camera: &Camera,
        width: u32,
        height: u32,
    ) -> ScreenPlacement {
        self.project_clip(camera.view_proj(), camera.eye, world, width, height)
    }

    /// Project every anchor into the overlay's placement slots, in anchor
    /// order. The view-projection transform is built once per call.
    pub fn project_all(
        &self,
        anchors: &[LabelAnchor],
        camera: &Camera,
        width: u32,
        height: u32,
        overlay: &mut OverlayState,
    ) {
        let view_proj = camera.view_proj();
        overlay.labels.clear();
        overlay.labels.extend(
            anchors
                .iter()
                .map(|a| self.project_clip(view_proj, camera.eye, a.position, width, height)),
        );
    }

    fn project_clip(
        &self,
        view_proj: Mat4,
        eye: Vec3,
        world: Vec3,
        width: u32,
        height: u32,
    ) -> ScreenPlacement {
        let clip = view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            // behind the eye plane: invisible, never divide
            return ScreenPlacement::default();
        }
        let ndc = clip.truncate() / clip.w;

        let x = (ndc.x * 0.5 + 0.5) * width as f32;
        let y = (-ndc.y * 0.5 + 0.5) * height as f32;

        let distance = eye.distance(world);
        let visible = distance < self.visible_distance && ndc.z > 0.0 && ndc.z < 1.0;

        ScreenPlacement { x, y, visible }
    }
}

/// Screen-space output of one tick: a placement slot per anchor (same order
/// as the anchor list) plus the formatted position readout. The platform
/// overlay draws a label only when its slot is visible; hidden slots render
/// at opacity zero, there is no distance fade.
#[derive(Default)]
pub struct OverlayState {
    pub labels: Vec<ScreenPlacement>,
    pub position_readout: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at_origin_facing_neg_z() -> Camera {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::ZERO;
        cam.set_look_at(Vec3::new(0.0, 0.0, -1.0));
        cam
    }

    #[test]
    fn anchor_straight_ahead_lands_at_screen_center() {
        let cam = camera_at_origin_facing_neg_z();
        let projector = LabelProjector::default();
        let p = projector.project(Vec3::new(0.0, 0.0, -10.0), &cam, 800, 600);
        assert!(p.visible);
        assert!((p.x - 400.0).abs() < 1.0, "x was {}", p.x);
        assert!((p.y - 300.0).abs() < 1.0, "y was {}", p.y);
    }

    #[test]
    fn distance_gate_hides_far_anchors() {
        let cam = camera_at_origin_facing_neg_z();
        let projector = LabelProjector::default();
        // valid depth, but 35 units away
        let p = projector.project(Vec3::new(0.0, 0.0, -35.0), &cam, 800, 600);
        assert!(!p.visible);

        let near = projector.project(Vec3::new(0.0, 0.0, -29.0), &cam, 800, 600);
        assert!(near.visible);
    }

    #[test]
    fn anchors_behind_the_camera_are_invisible() {
        let cam = camera_at_origin_facing_neg_z();
        let projector = LabelProjector::default();
        let p = projector.project(Vec3::new(0.0, 0.0, 10.0), &cam, 800, 600);
        assert!(!p.visible);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn anchors_beyond_the_far_plane_are_invisible() {
        let mut cam = camera_at_origin_facing_neg_z();
        cam.z_far = 50.0;
        let projector = LabelProjector {
            visible_distance: f32::INFINITY,
        };
        let p = projector.project(Vec3::new(0.0, 0.0, -60.0), &cam, 800, 600);
        assert!(!p.visible, "depth past the far plane must fail the ndc gate");
    }

    #[test]
    fn project_all_fills_one_slot_per_anchor() {
        let cam = camera_at_origin_facing_neg_z();
        let projector = LabelProjector::default();
        let anchors = vec![
            LabelAnchor { position: Vec3::new(0.0, 0.0, -5.0) },
            LabelAnchor { position: Vec3::new(0.0, 0.0, 40.0) },
            LabelAnchor { position: Vec3::new(2.0, 1.0, -20.0) },
        ];
        let mut overlay = OverlayState::default();
        projector.project_all(&anchors, &cam, 800, 600, &mut overlay);
        assert_eq!(overlay.labels.len(), 3);
        assert!(overlay.labels[0].visible);
        assert!(!overlay.labels[1].visible);

        // slots are rebuilt, not appended, on the next frame
        projector.project_all(&anchors, &cam, 800, 600, &mut overlay);
        assert_eq!(overlay.labels.len(), 3);
    }
}
