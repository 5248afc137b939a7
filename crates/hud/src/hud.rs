use campus_kernel::{MovementState, Session};
use glam::Vec3;

/// Snapshot of everything the HUD shows for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudFrame {
    pub tick: u64,
    pub elapsed: f64,
    pub player_position: Vec3,
    pub camera_position: Vec3,
    pub movement_state: MovementState,
    pub jump_count: u8,
    pub prompt: Option<String>,
    pub controls_locked: bool,
}

impl HudFrame {
    /// Capture the current frame from a session.
    pub fn capture(session: &Session) -> Self {
        let player = session.player();
        Self {
            tick: session.tick(),
            elapsed: session.elapsed(),
            player_position: player.position,
            camera_position: session.camera_position(),
            movement_state: player.movement_state,
            jump_count: player.jump_count,
            prompt: session.prompt().map(str::to_owned),
            controls_locked: session.controls_locked(),
        }
    }
}

/// Renderer-agnostic HUD interface.
pub trait HudRenderer {
    /// The output type produced by this HUD.
    type Output;

    /// Render one HUD frame.
    fn render(&self, frame: &HudFrame) -> Self::Output;
}

/// Plain-text HUD for terminals, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextHud {
    /// Also print the trailing camera position.
    pub show_camera: bool,
}

impl DebugTextHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self) -> Self {
        self.show_camera = true;
        self
    }
}

impl HudRenderer for DebugTextHud {
    type Output = String;

    fn render(&self, frame: &HudFrame) -> String {
        let p = frame.player_position;
        let mut out = format!(
            "[t={:>6.2}s #{:<5}] pos=({:.2}, {:.2}, {:.2}) state={}",
            frame.elapsed,
            frame.tick,
            p.x,
            p.y,
            p.z,
            frame.movement_state.name()
        );
        if frame.jump_count > 0 {
            out.push_str(&format!(" jumps={}", frame.jump_count));
        }
        if frame.controls_locked {
            out.push_str(" [locked]");
        }
        if self.show_camera {
            let c = frame.camera_position;
            out.push_str(&format!(" cam=({:.2}, {:.2}, {:.2})", c.x, c.y, c.z));
        }
        if let Some(prompt) = &frame.prompt {
            out.push_str(&format!("\n  > {prompt}"));
        }
        tracing::trace!(tick = frame.tick, "hud rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_common::EntityId;
    use campus_input::{Action, InputSample};
    use campus_kernel::{FirstPersonView, SessionConfig};
    use campus_scene::{InteractableEntity, ObjectKind, SceneRegistry};

    fn session_with_lamp() -> Session {
        let registry = SceneRegistry::new(
            Vec3::new(0.0, 1.6, 0.0),
            vec![InteractableEntity::WorldObject {
                id: EntityId::new("desk-lamp"),
                position: Vec3::new(0.0, 1.0, -1.0),
                kind: ObjectKind::Light,
                name: Some("Desk Lamp".into()),
            }],
        )
        .unwrap();
        Session::new(registry, SessionConfig::default()).unwrap()
    }

    #[test]
    fn fresh_session_frame() {
        let session = session_with_lamp();
        let frame = HudFrame::capture(&session);
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.player_position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(frame.movement_state, MovementState::Idle);
        assert!(frame.prompt.is_none());

        let text = DebugTextHud::new().render(&frame);
        assert!(text.contains("state=idle"));
        assert!(!text.contains("cam="));
        assert!(!text.contains('>'));
    }

    #[test]
    fn prompt_and_camera_are_rendered() {
        let mut session = session_with_lamp();
        let mut view = FirstPersonView::facing(session.player().position, Vec3::NEG_Z);
        session.step(&InputSample::idle(), 1.0 / 60.0, &mut view);

        let frame = HudFrame::capture(&session);
        assert_eq!(frame.prompt.as_deref(), Some("Press E to turn on Desk Lamp"));

        let text = DebugTextHud::new().with_camera().render(&frame);
        assert!(text.contains("#1"));
        assert!(text.contains("cam=(0.00, 1.60, 0.00)"));
        assert!(text.contains("> Press E to turn on Desk Lamp"));
    }

    #[test]
    fn locked_and_airborne_flags() {
        let mut session = session_with_lamp();
        let mut view = FirstPersonView::facing(session.player().position, Vec3::NEG_Z);
        session.step(&InputSample::idle().with(Action::Jump), 1.0 / 60.0, &mut view);
        session.set_controls_locked(true);

        let text = DebugTextHud::new().render(&HudFrame::capture(&session));
        assert!(text.contains("state=jumping"));
        assert!(text.contains("jumps=1"));
        assert!(text.contains("[locked]"));
    }
}
