use crate::controller::bounds::RoomBounds;
use crate::controller::input::{InputEvent, InputState, KeyBindings};
use crate::controller::look::LookController;
use crate::controller::movement::MovementIntegrator;
use crate::model::{Camera, LabelAnchor};
use crate::view::overlay::{LabelProjector, OverlayState};

/// Navigation state for one walkthrough session, advanced once per display
/// refresh by the platform driver.
///
/// Input arrives as queued events and is drained exactly once at tick start,
/// so a key release observed mid-frame applies either fully before or fully
/// after an integration step, never partially. Within a tick the order is
/// fixed: integrate, clamp, project. Labels can never see an out-of-bounds
/// camera.
pub struct FrameLoop {
    pub camera: Camera,
    pub input: InputState,
    pub look: LookController,
    pub integrator: MovementIntegrator,
    pub bounds: RoomBounds,
    pub projector: LabelProjector,
    anchors: Vec<LabelAnchor>,
    bindings: KeyBindings,
    events: Vec<InputEvent>,
}

impl FrameLoop {
    pub fn new(camera: Camera, anchors: Vec<LabelAnchor>) -> Self {
        Self {
            camera,
            input: InputState::new(),
            look: LookController::new(),
            integrator: MovementIntegrator::new(),
            bounds: RoomBounds::default(),
            projector: LabelProjector::default(),
            anchors,
            bindings: KeyBindings::default(),
            events: Vec::new(),
        }
    }

    /// Enqueue a platform event; it takes effect at the next tick boundary
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn anchors(&self) -> &[LabelAnchor] {
        &self.anchors
    }

    /// Advance one frame. A delayed refresh callback just means a larger dt
    /// for this one tick; there is no catch-up or frame skipping. dt <= 0
    /// degrades to event drain plus projection.
    pub fn tick(&mut self, dt: f32, width: u32, height: u32, overlay: &mut OverlayState) {
        self.drain_events();

        if self.look.is_captured() {
            self.integrator.integrate(&mut self.camera, &self.input, dt);
            self.camera.eye = self.bounds.clamp(self.camera.eye);
        }

        self.projector
            .project_all(&self.anchors, &self.camera, width, height, overlay);
        overlay.position_readout = self.position_readout();
    }

    /// Camera position with one decimal per axis, for the HUD readout
    pub fn position_readout(&self) -> String {
        let p = self.camera.eye;
        format!("{:.1}, {:.1}, {:.1}", p.x, p.y, p.z)
    }

    fn drain_events(&mut self) {
        for event in std::mem::take(&mut self.events) {
            match event {
                InputEvent::KeyDown(key) => {
                    if let Some(intent) = self.bindings.intent_of(&key) {
                        self.input.set(intent, true);
                    }
                }
                InputEvent::KeyUp(key) => {
                    if let Some(intent) = self.bindings.intent_of(&key) {
                        self.input.set(intent, false);
                    }
                }
                InputEvent::MouseMove { dx, dy } => {
                    // ordering inside the queue is what gates these: a delta
                    // enqueued after a capture loss hits a released controller
                    self.look.apply_delta(&mut self.camera, dx, dy);
                }
                InputEvent::PointerLockChanged { locked } => {
                    tracing::debug!(locked, "pointer capture changed");
                    self.look.set_captured(locked);
                }
                InputEvent::FocusLost | InputEvent::VisibilityChanged { .. } => {
                    self.input.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn frame_loop_at_center() -> FrameLoop {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(0.0, 10.0, 30.0);
        cam.set_look_at(Vec3::new(0.0, 10.0, 0.0));
        FrameLoop::new(cam, Vec::new())
    }

    fn tick(frame: &mut FrameLoop, dt: f32) -> OverlayState {
        let mut overlay = OverlayState::default();
        frame.tick(dt, 800, 600, &mut overlay);
        overlay
    }

    #[test]
    fn no_movement_while_released() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::KeyDown("w".into()));
        let eye = frame.camera.eye;
        for _ in 0..10 {
            tick(&mut frame, DT);
        }
        assert_eq!(frame.camera.eye, eye);
        assert!(frame.input.forward, "intent is tracked even while released");
    }

    #[test]
    fn captured_forward_walk_stays_in_bounds() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::PointerLockChanged { locked: true });
        frame.push_event(InputEvent::KeyDown("w".into()));
        for _ in 0..600 {
            tick(&mut frame, DT);
        }
        let p = frame.camera.eye;
        assert!(p.z >= -46.0, "walked through the wall: {p:?}");
        assert!(p.x.abs() <= 46.0 && (2.0..=23.0).contains(&p.y));
    }

    #[test]
    fn key_release_applies_before_the_next_integration() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::PointerLockChanged { locked: true });
        frame.push_event(InputEvent::KeyDown("w".into()));
        tick(&mut frame, DT);
        let speed_moving = frame.integrator.velocity().length();
        assert!(speed_moving > 0.0);

        frame.push_event(InputEvent::KeyUp("w".into()));
        tick(&mut frame, DT);
        assert!(!frame.input.forward);
        assert!(
            frame.integrator.velocity().length() < speed_moving,
            "released key must stop accelerating immediately"
        );
    }

    #[test]
    fn labels_are_projected_from_the_clamped_position() {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(100.0, 10.0, 0.0);
        cam.yaw = std::f32::consts::PI; // facing -x
        let anchors = vec![LabelAnchor {
            position: Vec3::new(30.0, 10.0, 0.0),
        }];
        let mut frame = FrameLoop::new(cam, anchors);
        frame.push_event(InputEvent::PointerLockChanged { locked: true });

        let overlay = tick(&mut frame, DT);
        assert_eq!(frame.camera.eye, Vec3::new(46.0, 10.0, 0.0));
        // 16 units from the clamped eye, 70 from the unclamped one
        assert!(
            overlay.labels[0].visible,
            "projection must run after clamping"
        );
    }

    #[test]
    fn capture_loss_mid_queue_gates_later_deltas() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::PointerLockChanged { locked: true });
        tick(&mut frame, DT);
        let yaw_start = frame.camera.yaw;

        frame.push_event(InputEvent::MouseMove { dx: 10.0, dy: 0.0 });
        frame.push_event(InputEvent::PointerLockChanged { locked: false });
        frame.push_event(InputEvent::MouseMove { dx: 500.0, dy: 0.0 });
        tick(&mut frame, DT);

        let expected = yaw_start + 10.0 * frame.look.sensitivity;
        assert!((frame.camera.yaw - expected).abs() < 1e-6);

        // still released: later ticks ignore deltas too
        frame.push_event(InputEvent::MouseMove { dx: 500.0, dy: 0.0 });
        tick(&mut frame, DT);
        assert!((frame.camera.yaw - expected).abs() < 1e-6);
    }

    #[test]
    fn focus_loss_clears_held_intents() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::KeyDown("w".into()));
        frame.push_event(InputEvent::KeyDown("Shift".into()));
        tick(&mut frame, DT);
        assert!(frame.input.forward && frame.input.running);

        frame.push_event(InputEvent::FocusLost);
        tick(&mut frame, DT);
        assert!(!frame.input.forward && !frame.input.running);
    }

    #[test]
    fn readout_has_one_decimal_per_axis() {
        let frame = frame_loop_at_center();
        assert_eq!(frame.position_readout(), "0.0, 10.0, 30.0");
    }

    #[test]
    fn zero_dt_still_projects_and_reports() {
        let mut frame = frame_loop_at_center();
        frame.push_event(InputEvent::PointerLockChanged { locked: true });
        frame.push_event(InputEvent::KeyDown("w".into()));
        let overlay = tick(&mut frame, 0.0);
        assert_eq!(frame.camera.eye, Vec3::new(0.0, 10.0, 30.0));
        assert_eq!(overlay.position_readout, "0.0, 10.0, 30.0");
    }
}
