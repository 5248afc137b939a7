use campus_common::lerp_factor;
use glam::Vec3;

use crate::config::FollowConfig;

/// Smooths the rendered viewpoint toward the simulated player position.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFollower {
    config: FollowConfig,
    position: Vec3,
}

impl CameraFollower {
    pub fn new(config: FollowConfig, start: Vec3) -> Self {
        Self {
            config,
            position: start,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Jump straight to `position`, e.g. on respawn.
    pub fn snap_to(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move toward `target` by the time-scaled smoothing weight.
    pub fn follow(&mut self, target: Vec3, dt: f32) -> Vec3 {
        let dt = dt.max(0.0);
        let alpha = lerp_factor(self.config.smoothing, dt, self.config.reference_rate);
        self.position = self.position.lerp(target, alpha);
        self.position
    }
}
