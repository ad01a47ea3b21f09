use glam::{Mat4, Vec3};

/// Pitch stays just under PI/2 so the view basis never degenerates
pub const PITCH_LIMIT: f32 = 1.5533;

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 30.0),
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }

    /// Full view direction, recomputed from yaw/pitch on every call
    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    /// Walk direction: yaw only, projected onto the ground plane
    pub fn ground_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Strafe direction, perpendicular to ground_forward in the ground plane
    pub fn ground_right(&self) -> Vec3 {
        let f = self.ground_forward();
        Vec3::new(-f.z, 0.0, f.x)
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target(), self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    pub fn set_look_at(&mut self, target: Vec3) {
        let dir = (target - self.eye).normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}
