//! Tuning for the four per-frame components.
//!
//! Every field defaults to the shipped feel; YAML files only need the fields
//! they override.

use campus_scene::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be in (0, 1], got {value}"),
        })
    }
}

/// Player physics. Distances in world units, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub walk_acceleration: f32,
    pub run_acceleration: f32,
    pub max_walk_speed: f32,
    pub max_run_speed: f32,
    pub jump_velocity: f32,
    /// Debounce window after a jump during which another jump is ignored.
    pub jump_cooldown: f32,
    pub gravity: f32,
    pub slide_impulse: f32,
    pub slide_duration: f32,
    /// Eye height of a player standing on the floor plane.
    pub ground_height: f32,
    /// Half-extent of the walkable square on x and z.
    pub bounds: f32,
    /// Horizontal velocity kept per reference tick when not accelerating.
    pub deceleration: f32,
    /// Tick rate at which `deceleration` was tuned.
    pub reference_rate: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            walk_acceleration: 15.0,
            run_acceleration: 25.0,
            max_walk_speed: 6.0,
            max_run_speed: 12.0,
            jump_velocity: 6.0,
            jump_cooldown: 0.2,
            gravity: 20.0,
            slide_impulse: 20.0,
            slide_duration: 0.5,
            ground_height: 1.6,
            bounds: 35.0,
            deceleration: 0.85,
            reference_rate: 60.0,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("motion.walk_acceleration", self.walk_acceleration)?;
        positive("motion.run_acceleration", self.run_acceleration)?;
        positive("motion.max_walk_speed", self.max_walk_speed)?;
        positive("motion.max_run_speed", self.max_run_speed)?;
        positive("motion.jump_velocity", self.jump_velocity)?;
        positive("motion.jump_cooldown", self.jump_cooldown)?;
        positive("motion.gravity", self.gravity)?;
        positive("motion.slide_impulse", self.slide_impulse)?;
        positive("motion.slide_duration", self.slide_duration)?;
        positive("motion.bounds", self.bounds)?;
        positive("motion.reference_rate", self.reference_rate)?;
        unit_interval("motion.deceleration", self.deceleration)?;
        if !self.ground_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "motion.ground_height",
                reason: "must be finite".into(),
            });
        }
        Ok(())
    }
}

/// How the interact action fires while held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Once per discrete press.
    #[default]
    Edge,
    /// Every tick the action is held.
    Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub npc_radius: f32,
    pub item_radius: f32,
    pub object_radius: f32,
    pub trigger: TriggerMode,
    /// Key name shown in prompts.
    pub key_label: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            npc_radius: 3.0,
            item_radius: 2.0,
            object_radius: 2.0,
            trigger: TriggerMode::Edge,
            key_label: "E".into(),
        }
    }
}

impl InteractionConfig {
    pub fn radius_for(&self, kind: EntityKind) -> f32 {
        match kind {
            EntityKind::Npc => self.npc_radius,
            EntityKind::Item => self.item_radius,
            EntityKind::WorldObject => self.object_radius,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("interaction.npc_radius", self.npc_radius)?;
        positive("interaction.item_radius", self.item_radius)?;
        positive("interaction.object_radius", self.object_radius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Segment progress per second; one unit traverses one segment.
    pub speed: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self { speed: 0.3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Fraction of the remaining distance closed per reference tick.
    pub smoothing: f32,
    pub reference_rate: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            reference_rate: 60.0,
        }
    }
}

/// Complete tuning for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub motion: MotionConfig,
    pub interaction: InteractionConfig,
    pub patrol: PatrolConfig,
    pub follow: FollowConfig,
}

impl SessionConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&data)?;
        tracing::info!(path = %path.as_ref().display(), "session config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.interaction.validate()?;
        positive("patrol.speed", self.patrol.speed)?;
        unit_interval("follow.smoothing", self.follow.smoothing)?;
        positive("follow.reference_rate", self.follow.reference_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        SessionConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let cfg = SessionConfig::from_yaml_str(
            "motion:\n  gravity: 9.8\ninteraction:\n  trigger: level\n",
        )
        .unwrap();
        assert_eq!(cfg.motion.gravity, 9.8);
        assert_eq!(cfg.motion.max_run_speed, 12.0);
        assert_eq!(cfg.interaction.trigger, TriggerMode::Level);
        assert_eq!(cfg.patrol.speed, 0.3);
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = SessionConfig::from_yaml_str("patrol:\n  speed: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "patrol.speed",
                ..
            }
        ));
    }

    #[test]
    fn rejects_smoothing_above_one() {
        let err = SessionConfig::from_yaml_str("follow:\n  smoothing: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("follow.smoothing"));
    }

    #[test]
    fn radius_per_kind() {
        let cfg = InteractionConfig::default();
        assert_eq!(cfg.radius_for(EntityKind::Npc), 3.0);
        assert_eq!(cfg.radius_for(EntityKind::Item), 2.0);
        assert_eq!(cfg.radius_for(EntityKind::WorldObject), 2.0);
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "follow:\n  smoothing: 0.3").unwrap();
        let cfg = SessionConfig::load(f.path()).unwrap();
        assert_eq!(cfg.follow.smoothing, 0.3);
    }
}
