//! Timed key-hold scripts that drive a session headlessly.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use campus_input::{Action, InputState, KeyBindings};
use campus_kernel::{FirstPersonView, Session, TickOutput};
use glam::Vec3;
use serde::Deserialize;

/// One stretch of held keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// Seconds of simulated time.
    pub duration: f32,
    /// Physical key names held for the whole segment (`KeyW`, `ShiftLeft`, ...).
    #[serde(default)]
    pub keys: Vec<String>,
    /// Degrees to turn the view at the start of the segment; positive is right.
    #[serde(default)]
    pub turn: f32,
    /// Lock the player's controls for this segment.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputScript {
    /// Extra or replacement bindings on top of the defaults; `null` unbinds.
    #[serde(default)]
    pub bindings: BTreeMap<String, Option<Action>>,
    pub segments: Vec<Segment>,
}

impl InputScript {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_yaml_str(&data).with_context(|| format!("parsing script {}", path.display()))
    }

    /// Default bindings with this script's overrides applied.
    pub fn key_bindings(&self) -> KeyBindings {
        let mut bindings = KeyBindings::default();
        for (key, action) in &self.bindings {
            match action {
                Some(action) => {
                    bindings.bind(key.clone(), *action);
                }
                None => {
                    bindings.unbind(key);
                }
            }
        }
        bindings
    }

    fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            bail!("script has no segments");
        }
        let bindings = self.key_bindings();
        for (i, seg) in self.segments.iter().enumerate() {
            if !seg.duration.is_finite() || seg.duration <= 0.0 {
                bail!("segment #{i}: duration must be positive, got {}", seg.duration);
            }
            if !seg.turn.is_finite() {
                bail!("segment #{i}: turn must be finite");
            }
            if let Some(key) = seg.keys.iter().find(|k| bindings.action_for(k).is_none()) {
                bail!("segment #{i}: key {key} is not bound to any action");
            }
        }
        Ok(())
    }

    /// Total scripted time in seconds.
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// A script that stands still for `seconds`.
    pub fn idle(seconds: f32) -> Self {
        Self {
            bindings: BTreeMap::new(),
            segments: vec![Segment {
                duration: seconds,
                keys: Vec::new(),
                turn: 0.0,
                locked: false,
            }],
        }
    }
}

/// Number of fixed steps of `dt` a segment of `duration` seconds runs for.
fn ticks_for(duration: f32, dt: f32) -> u64 {
    ((duration / dt).round() as u64).max(1)
}

/// Run `script` against `session` at a fixed `dt`, stopping after `limit`
/// ticks if given. `on_tick` sees every tick's output. Returns ticks run.
pub fn run(
    session: &mut Session,
    script: &InputScript,
    dt: f32,
    limit: Option<u64>,
    mut on_tick: impl FnMut(&Session, &TickOutput),
) -> u64 {
    let mut input = InputState::new(script.key_bindings());
    let mut view = FirstPersonView::facing(session.player().position, Vec3::NEG_Z);
    let mut ran = 0;

    for (i, seg) in script.segments.iter().enumerate() {
        tracing::debug!(segment = i, keys = ?seg.keys, turn = seg.turn, "segment");
        input.hold_only(seg.keys.iter().map(String::as_str));
        view.turn(seg.turn);
        session.set_controls_locked(seg.locked);

        for _ in 0..ticks_for(seg.duration, dt) {
            if limit.is_some_and(|n| ran >= n) {
                return ran;
            }
            let out = session.step(&input.sample(), dt, &mut view);
            on_tick(session, &out);
            ran += 1;
        }
    }
    ran
}
