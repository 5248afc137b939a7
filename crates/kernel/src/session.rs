use campus_input::InputSample;
use campus_scene::SceneRegistry;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SessionConfig};
use crate::follow::CameraFollower;
use crate::motion::{MovementState, PlayerMotionController, PlayerState, sanitize_dt};
use crate::patrol::{PatrolAnimator, PatrolRuntimeState};
use crate::proximity::{InteractionEvent, InteractionRuntimeState, ProximityInteractionRouter};
use crate::view::ViewHandle;

/// Everything a tick consumed, enough to re-run it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub sample: InputSample,
    /// Frame time after clamping.
    pub dt: f32,
    pub camera_forward: Vec3,
}

/// Append-only session log entry.
///
/// The log is the basis for replay and for debugging tools; it records inputs,
/// lock changes and the interaction signals handed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Controls were locked or unlocked before the given tick ran.
    ControlsLocked { tick: u64, locked: bool },
    /// Tick `tick` ran with the given inputs.
    Ticked { tick: u64, record: TickRecord },
    /// The router emitted an event during tick `tick`.
    Interaction { tick: u64, event: InteractionEvent },
    /// The player was moved to `position` before the given tick ran.
    PlayerTeleported { tick: u64, position: Vec3 },
}

/// Signals exposed to the HUD, minimap and game systems after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub tick: u64,
    pub player_position: Vec3,
    pub camera_position: Vec3,
    pub movement_state: MovementState,
    pub prompt: Option<String>,
    pub event: Option<InteractionEvent>,
}

/// One exploration session: the player, the scene's interactables and the
/// camera, advanced together once per displayed frame.
///
/// Tick order is fixed: patrol, player motion, proximity routing, camera
/// follow. The player position has a single writer per tick.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    registry: SceneRegistry,
    player: PlayerMotionController,
    patrol: PatrolAnimator,
    router: ProximityInteractionRouter,
    follower: CameraFollower,
    /// Current position of every registry entity, by registry index.
    positions: Vec<Vec3>,
    controls_locked: bool,
    prompt: Option<String>,
    tick: u64,
    elapsed: f64,
    log: Vec<SessionEvent>,
}

impl Session {
    /// Start a session at the registry's spawn point.
    pub fn new(registry: SceneRegistry, config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = registry.spawn();
        let positions = registry
            .entities()
            .iter()
            .map(|e| e.initial_position())
            .collect();
        let session = Self {
            player: PlayerMotionController::new(config.motion.clone(), spawn),
            patrol: PatrolAnimator::from_registry(&registry, &config.patrol),
            router: ProximityInteractionRouter::new(config.interaction.clone(), registry.len()),
            follower: CameraFollower::new(config.follow.clone(), spawn),
            positions,
            controls_locked: false,
            prompt: None,
            tick: 0,
            elapsed: 0.0,
            log: Vec::new(),
            config,
            registry,
        };
        tracing::info!(
            entities = session.registry.len(),
            patrols = session.patrol.route_count(),
            spawn = ?spawn,
            "session started"
        );
        Ok(session)
    }

    /// Run one frame.
    pub fn step<V: ViewHandle + ?Sized>(
        &mut self,
        sample: &InputSample,
        dt: f32,
        view: &mut V,
    ) -> TickOutput {
        let dt = sanitize_dt(dt);
        self.tick += 1;
        self.elapsed += f64::from(dt);
        let _span = tracing::debug_span!("session_tick", tick = self.tick).entered();

        self.log.push(SessionEvent::Ticked {
            tick: self.tick,
            record: TickRecord {
                sample: *sample,
                dt,
                camera_forward: view.forward(),
            },
        });

        self.patrol.advance(dt, &mut self.positions);
        let player = self
            .player
            .update(sample, dt, self.controls_locked, view)
            .position;
        let routed = self
            .router
            .route(player, sample.interact, self.registry.entities(), &self.positions);
        if let Some(event) = &routed.event {
            self.log.push(SessionEvent::Interaction {
                tick: self.tick,
                event: event.clone(),
            });
        }
        if routed.prompt != self.prompt {
            tracing::debug!(prompt = ?routed.prompt, "prompt changed");
        }
        self.prompt = routed.prompt;
        let camera = self.follower.follow(player, dt);

        tracing::trace!(?player, ?camera, "tick complete");
        TickOutput {
            tick: self.tick,
            player_position: player,
            camera_position: camera,
            movement_state: self.player.state().movement_state,
            prompt: self.prompt.clone(),
            event: routed.event,
        }
    }

    /// Freeze or release the player, e.g. while a dialogue panel is open.
    pub fn set_controls_locked(&mut self, locked: bool) {
        if self.controls_locked == locked {
            return;
        }
        self.controls_locked = locked;
        self.log.push(SessionEvent::ControlsLocked {
            tick: self.tick,
            locked,
        });
        tracing::debug!(locked, "controls lock changed");
    }

    pub fn controls_locked(&self) -> bool {
        self.controls_locked
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the session started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn player(&self) -> &PlayerState {
        self.player.state()
    }

    /// Place the player at `position` at rest and snap the camera to it.
    ///
    /// Recorded in the log so replays see the same jump. Non-finite positions
    /// are ignored.
    pub fn teleport_player(&mut self, position: Vec3) {
        if !position.is_finite() {
            tracing::warn!(?position, "non-finite teleport target ignored");
            return;
        }
        let state = self.player.state_mut();
        state.position = position;
        state.velocity = Vec3::ZERO;
        self.follower.snap_to(position);
        self.log.push(SessionEvent::PlayerTeleported {
            tick: self.tick,
            position,
        });
        tracing::debug!(?position, "player teleported");
    }

    pub fn camera_position(&self) -> Vec3 {
        self.follower.position()
    }

    /// Prompt currently shown on the HUD.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Current position of the entity at registry `index`.
    pub fn entity_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn interaction_state(&self, index: usize) -> Option<InteractionRuntimeState> {
        self.router.state(index)
    }

    pub fn patrol_state(&self, index: usize) -> Option<PatrolRuntimeState> {
        self.patrol.state(index)
    }

    /// Entities not yet consumed.
    pub fn active_entities(&self) -> usize {
        self.router.active_count()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.log
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.log)
    }

    /// Rebuild a session by re-running a recorded log against the same scene
    /// and configuration.
    pub fn replay(
        registry: SceneRegistry,
        config: SessionConfig,
        events: &[SessionEvent],
    ) -> Result<Self, ConfigError> {
        let mut session = Self::new(registry, config)?;
        for event in events {
            match event {
                SessionEvent::ControlsLocked { locked, .. } => session.set_controls_locked(*locked),
                SessionEvent::Ticked { record, .. } => {
                    let mut view = RecordedView(record.camera_forward);
                    session.step(&record.sample, record.dt, &mut view);
                }
                SessionEvent::PlayerTeleported { position, .. } => {
                    session.teleport_player(*position)
                }
                SessionEvent::Interaction { .. } => {}
            }
        }
        Ok(session)
    }

    /// FNV-1a hash over the simulation state, for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= u64::from(b);
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            mix(h, &v.x.to_le_bytes());
            mix(h, &v.y.to_le_bytes());
            mix(h, &v.z.to_le_bytes());
        };

        mix(&mut h, &self.tick.to_le_bytes());
        let p = self.player.state();
        mix_vec(&mut h, p.position);
        mix_vec(&mut h, p.velocity);
        mix(
            &mut h,
            &[
                p.jump_count,
                u8::from(p.can_jump),
                u8::from(p.is_sliding),
                p.movement_state as u8,
                u8::from(self.controls_locked),
            ],
        );
        mix(&mut h, &p.jump_cooldown.to_le_bytes());
        mix(&mut h, &p.slide_time_remaining.to_le_bytes());
        mix_vec(&mut h, self.follower.position());
        for position in &self.positions {
            mix_vec(&mut h, *position);
        }
        for rt in self.router.runtime() {
            mix(&mut h, &[u8::from(rt.is_near_player), u8::from(rt.consumed)]);
        }
        for (entity, state) in self.patrol.states() {
            mix(&mut h, &(entity as u64).to_le_bytes());
            mix(&mut h, &(state.segment_index as u64).to_le_bytes());
            mix(&mut h, &state.progress.to_le_bytes());
        }
        h
    }
}

/// View handle replaying a recorded camera heading.
struct RecordedView(Vec3);

impl ViewHandle for RecordedView {
    fn forward(&self) -> Vec3 {
        self.0
    }

    fn set_position(&mut self, _position: Vec3) {}
}
