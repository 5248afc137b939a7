use glam::Vec3;

/// Camera rig the motion controller reads its basis from and writes the
/// player position to. Orientation is owned by the rig, never the simulation.
pub trait ViewHandle {
    /// Direction the view is looking in. Need not be normalised.
    fn forward(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);
}

/// First-person yaw/pitch rig, the default `ViewHandle` for headless runs.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonView {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
}

impl Default for FirstPersonView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            sensitivity: 0.002,
        }
    }
}

impl FirstPersonView {
    /// Rig at `position` looking along `direction`; a degenerate direction
    /// keeps the default heading (-Z).
    pub fn facing(position: Vec3, direction: Vec3) -> Self {
        let mut view = Self {
            position,
            ..Self::default()
        };
        if let Some(d) = direction.try_normalize() {
            view.yaw = d.z.atan2(d.x);
            view.pitch = d.y.clamp(-1.0, 1.0).asin();
        }
        view
    }

    /// Mouse-look by a pixel delta.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Turn by `degrees` about the vertical axis; positive turns right.
    pub fn turn(&mut self, degrees: f32) {
        self.yaw += degrees.to_radians();
    }
}

impl ViewHandle for FirstPersonView {
    fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
