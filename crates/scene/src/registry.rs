use campus_common::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::entity::{EntityKind, InteractableEntity, ObjectKind};

/// Spawn point used when a scene file does not specify one.
pub const DEFAULT_SPAWN: Vec3 = Vec3::new(0.0, 1.6, 0.0);

/// Errors from loading or validating a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported scene file extension: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("entity #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate entity id {0}")]
    DuplicateId(EntityId),
    #[error("entity {id} (#{index}) has no position")]
    MissingPosition { index: usize, id: EntityId },
    #[error("entity {0} has a non-finite position")]
    NonFinitePosition(EntityId),
    #[error("item {0} has an empty collectible id")]
    EmptyCollectible(EntityId),
    #[error("NPC {0} has no dialogue lines")]
    EmptyDialogue(EntityId),
    #[error("NPC {id} patrol path has {len} waypoint(s); at least 2 are required")]
    PatrolTooShort { id: EntityId, len: usize },
    #[error("NPC {id} patrol waypoint #{index} is not finite")]
    NonFiniteWaypoint { id: EntityId, index: usize },
    #[error("spawn point is not finite")]
    NonFiniteSpawn,
}

/// Entity definition as authored. Positions are optional here so a missing
/// one is reported as a validation error naming the entity.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawEntity {
    Item {
        id: EntityId,
        position: Option<Vec3>,
        collectible_id: String,
        name: Option<String>,
    },
    Npc {
        id: EntityId,
        position: Option<Vec3>,
        name: String,
        #[serde(default)]
        dialogue_lines: Vec<String>,
        patrol_path: Option<Vec<Vec3>>,
    },
    WorldObject {
        id: EntityId,
        position: Option<Vec3>,
        #[serde(default)]
        kind: ObjectKind,
        name: Option<String>,
    },
}

impl RawEntity {
    fn id(&self) -> &EntityId {
        match self {
            Self::Item { id, .. } | Self::Npc { id, .. } | Self::WorldObject { id, .. } => id,
        }
    }

    fn into_entity(self, index: usize) -> Result<InteractableEntity, SceneError> {
        let missing = |id: &EntityId| SceneError::MissingPosition {
            index,
            id: id.clone(),
        };
        Ok(match self {
            Self::Item {
                id,
                position,
                collectible_id,
                name,
            } => InteractableEntity::Item {
                position: position.ok_or_else(|| missing(&id))?,
                id,
                collectible_id,
                name,
            },
            Self::Npc {
                id,
                position,
                name,
                dialogue_lines,
                patrol_path,
            } => InteractableEntity::Npc {
                position: position.ok_or_else(|| missing(&id))?,
                id,
                name,
                dialogue_lines,
                patrol_path,
            },
            Self::WorldObject {
                id,
                position,
                kind,
                name,
            } => InteractableEntity::WorldObject {
                position: position.ok_or_else(|| missing(&id))?,
                id,
                kind,
                name,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawScene {
    spawn: Option<Vec3>,
    #[serde(default)]
    entities: Vec<RawEntity>,
}

/// Per-kind entity counts, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneCounts {
    pub items: usize,
    pub npcs: usize,
    pub patrolling_npcs: usize,
    pub world_objects: usize,
}

/// Validated, immutable list of interactable entities plus the player spawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRegistry {
    spawn: Vec3,
    entities: Vec<InteractableEntity>,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self {
            spawn: DEFAULT_SPAWN,
            entities: Vec::new(),
        }
    }
}

impl SceneRegistry {
    /// Build a registry from already-typed entities, validating them.
    pub fn new(spawn: Vec3, entities: Vec<InteractableEntity>) -> Result<Self, SceneError> {
        let registry = Self { spawn, entities };
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SceneError> {
        Self::from_raw(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, SceneError> {
        Self::from_raw(serde_yaml::from_str(s)?)
    }

    /// Load a scene file; the format is chosen by extension (`.json`, `.yaml`, `.yml`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let data = std::fs::read_to_string(path)?;
        let registry = match ext.as_deref() {
            Some("json") => Self::from_json_str(&data)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&data)?,
            _ => return Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(
            path = %path.display(),
            entities = registry.len(),
            "scene registry loaded"
        );
        Ok(registry)
    }

    fn from_raw(raw: RawScene) -> Result<Self, SceneError> {
        let entities = raw
            .entities
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                if e.id().is_empty() {
                    return Err(SceneError::EmptyId { index: i });
                }
                e.into_entity(i)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(raw.spawn.unwrap_or(DEFAULT_SPAWN), entities)
    }

    fn validate(&self) -> Result<(), SceneError> {
        if !self.spawn.is_finite() {
            return Err(SceneError::NonFiniteSpawn);
        }
        let mut seen = BTreeSet::new();
        for (index, entity) in self.entities.iter().enumerate() {
            let id = entity.id();
            if id.is_empty() {
                return Err(SceneError::EmptyId { index });
            }
            if !seen.insert(id) {
                return Err(SceneError::DuplicateId(id.clone()));
            }
            if !entity.position().is_finite() {
                return Err(SceneError::NonFinitePosition(id.clone()));
            }
            match entity {
                InteractableEntity::Item { collectible_id, .. } => {
                    if collectible_id.trim().is_empty() {
                        return Err(SceneError::EmptyCollectible(id.clone()));
                    }
                }
                InteractableEntity::Npc {
                    dialogue_lines,
                    patrol_path,
                    ..
                } => {
                    if dialogue_lines.is_empty() {
                        return Err(SceneError::EmptyDialogue(id.clone()));
                    }
                    if let Some(path) = patrol_path {
                        if path.len() < 2 {
                            return Err(SceneError::PatrolTooShort {
                                id: id.clone(),
                                len: path.len(),
                            });
                        }
                        if let Some(bad) = path.iter().position(|w| !w.is_finite()) {
                            return Err(SceneError::NonFiniteWaypoint {
                                id: id.clone(),
                                index: bad,
                            });
                        }
                    }
                }
                InteractableEntity::WorldObject { .. } => {}
            }
        }
        Ok(())
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    /// Entities in authored order.
    pub fn entities(&self) -> &[InteractableEntity] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&InteractableEntity> {
        self.entities.get(index)
    }

    pub fn index_of(&self, id: &EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn counts(&self) -> SceneCounts {
        let mut c = SceneCounts::default();
        for e in &self.entities {
            match e.kind() {
                EntityKind::Item => c.items += 1,
                EntityKind::Npc => {
                    c.npcs += 1;
                    if e.patrol_path().is_some() {
                        c.patrolling_npcs += 1;
                    }
                }
                EntityKind::WorldObject => c.world_objects += 1,
            }
        }
        c
    }
}
