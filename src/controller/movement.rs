use glam::Vec3;

use crate::controller::input::InputState;
use crate::model::Camera;

/// Exponential velocity decay rate, per second
pub const DAMPING: f32 = 10.0;
pub const BASE_SPEED: f32 = 50.0;
pub const RUN_MULTIPLIER: f32 = 2.0;

/// Damped velocity integration.
///
/// Velocity lives in camera-local axes: x is strafe (right positive),
/// y is vertical, z is walk (forward positive). Horizontal translation goes
/// through the yaw-only ground basis so looking up or down never changes
/// walking speed; vertical translation is world-up directly.
pub struct MovementIntegrator {
    pub damping: f32,
    pub base_speed: f32,
    pub run_multiplier: f32,
    velocity: Vec3,
}

impl MovementIntegrator {
    pub fn new() -> Self {
        Self {
            damping: DAMPING,
            base_speed: BASE_SPEED,
            run_multiplier: RUN_MULTIPLIER,
            velocity: Vec3::ZERO,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Advance one frame: damp the current velocity, accelerate along the
    /// active intents, translate the camera. dt <= 0 is a no-op.
    pub fn integrate(&mut self, camera: &mut Camera, input: &InputState, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.velocity -= self.velocity * self.damping * dt;

        let mut direction = Vec3::new(
            (input.right as i32 - input.left as i32) as f32,
            (input.ascend as i32 - input.descend as i32) as f32,
            (input.forward as i32 - input.backward as i32) as f32,
        );
        // never normalize the zero vector
        if direction != Vec3::ZERO {
            direction = direction.normalize();
        }

        let speed = self.base_speed * if input.running { self.run_multiplier } else { 1.0 };

        // accelerate only on axes with an active intent, so damping keeps
        // draining the others
        if input.forward || input.backward {
            self.velocity.z += direction.z * speed * dt;
        }
        if input.left || input.right {
            self.velocity.x += direction.x * speed * dt;
        }
        if input.ascend || input.descend {
            self.velocity.y += direction.y * speed * dt;
        }

        camera.eye += (camera.ground_forward() * self.velocity.z
            + camera.ground_right() * self.velocity.x
            + Vec3::Y * self.velocity.y)
            * dt;
    }
}

impl Default for MovementIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn camera_facing_center() -> Camera {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(0.0, 10.0, 30.0);
        cam.set_look_at(Vec3::new(0.0, 10.0, 0.0));
        cam
    }

    #[test]
    fn idle_input_is_a_pure_decay() {
        let mut cam = camera_facing_center();
        let mut integrator = MovementIntegrator::new();
        let input = InputState::new();

        // build up some speed first
        let mut moving = InputState::new();
        moving.forward = true;
        for _ in 0..30 {
            integrator.integrate(&mut cam, &moving, DT);
        }

        let mut magnitude = integrator.velocity().length();
        assert!(magnitude > 0.0);
        for _ in 0..120 {
            integrator.integrate(&mut cam, &input, DT);
            let next = integrator.velocity().length();
            assert!(next < magnitude, "velocity must strictly decay without intent");
            magnitude = next;
        }
        assert!(magnitude < 1e-3, "velocity should approach zero, got {magnitude}");
    }

    #[test]
    fn forward_intent_moves_toward_scene_center() {
        let mut cam = camera_facing_center();
        let mut integrator = MovementIntegrator::new();
        let mut input = InputState::new();
        input.forward = true;

        integrator.integrate(&mut cam, &input, 1.0);
        assert!(cam.eye.z < 30.0, "camera should move toward -z, got {}", cam.eye.z);
        assert!((cam.eye.x).abs() < 1e-3);
        assert_eq!(cam.eye.y, 10.0, "walking must not change height");
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut cam = camera_facing_center();
        let mut integrator = MovementIntegrator::new();
        let mut input = InputState::new();
        input.forward = true;

        let eye = cam.eye;
        integrator.integrate(&mut cam, &input, 0.0);
        integrator.integrate(&mut cam, &input, -0.25);
        assert_eq!(cam.eye, eye);
        assert_eq!(integrator.velocity(), Vec3::ZERO);
    }

    #[test]
    fn opposing_intents_cancel_without_nan() {
        let mut cam = camera_facing_center();
        let mut integrator = MovementIntegrator::new();
        let mut input = InputState::new();
        input.forward = true;
        input.backward = true;

        integrator.integrate(&mut cam, &input, DT);
        let v = integrator.velocity();
        assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn running_doubles_acceleration() {
        let mut cam_walk = camera_facing_center();
        let mut cam_run = camera_facing_center();
        let mut walk = MovementIntegrator::new();
        let mut run = MovementIntegrator::new();

        let mut input = InputState::new();
        input.forward = true;
        walk.integrate(&mut cam_walk, &input, DT);
        input.running = true;
        run.integrate(&mut cam_run, &input, DT);

        let ratio = run.velocity().z / walk.velocity().z;
        assert!((ratio - RUN_MULTIPLIER).abs() < 1e-4);
    }

    #[test]
    fn vertical_motion_ignores_pitch() {
        let mut cam = camera_facing_center();
        cam.pitch = 1.0;
        let mut integrator = MovementIntegrator::new();
        let mut input = InputState::new();
        input.ascend = true;

        let before = cam.eye;
        integrator.integrate(&mut cam, &input, DT);
        assert!(cam.eye.y > before.y);
        assert_eq!(cam.eye.x, before.x);
        assert_eq!(cam.eye.z, before.z);
    }

    #[test]
    fn pitch_does_not_slow_walking() {
        let mut cam_level = camera_facing_center();
        let mut cam_pitched = camera_facing_center();
        cam_pitched.pitch = 1.2;

        let mut a = MovementIntegrator::new();
        let mut b = MovementIntegrator::new();
        let mut input = InputState::new();
        input.forward = true;

        a.integrate(&mut cam_level, &input, DT);
        b.integrate(&mut cam_pitched, &input, DT);
        assert!((cam_level.eye.z - cam_pitched.eye.z).abs() < 1e-5);
    }
}
