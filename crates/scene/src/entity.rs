use campus_common::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Kind of a non-collectible world object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Projector,
    Light,
    Book,
    #[default]
    Generic,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Projector => "projector",
            ObjectKind::Light => "light",
            ObjectKind::Book => "book",
            ObjectKind::Generic => "generic",
        }
    }
}

/// Coarse entity category, used for thresholds and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Item,
    Npc,
    WorldObject,
}

/// An entity the player can approach and interact with.
///
/// Definitions are immutable for the session; runtime state (nearness,
/// consumption, patrol progress) lives in the kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractableEntity {
    /// A collectible, removed from the session once picked up.
    Item {
        id: EntityId,
        position: Vec3,
        collectible_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A character with dialogue and an optional closed patrol loop.
    Npc {
        id: EntityId,
        position: Vec3,
        name: String,
        dialogue_lines: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        patrol_path: Option<Vec<Vec3>>,
    },
    /// A repeatable interaction point (lights, projectors, books).
    WorldObject {
        id: EntityId,
        position: Vec3,
        kind: ObjectKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl InteractableEntity {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Item { id, .. } | Self::Npc { id, .. } | Self::WorldObject { id, .. } => id,
        }
    }

    /// Authored position. Patrolling NPCs start here only if they have no path.
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Item { position, .. }
            | Self::Npc { position, .. }
            | Self::WorldObject { position, .. } => *position,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Item { .. } => EntityKind::Item,
            Self::Npc { .. } => EntityKind::Npc,
            Self::WorldObject { .. } => EntityKind::WorldObject,
        }
    }

    /// Name shown in prompts.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Item {
                name,
                collectible_id,
                ..
            } => name.as_deref().unwrap_or(collectible_id),
            Self::Npc { name, .. } => name,
            Self::WorldObject { name, id, .. } => name.as_deref().unwrap_or(id.as_str()),
        }
    }

    pub fn patrol_path(&self) -> Option<&[Vec3]> {
        match self {
            Self::Npc {
                patrol_path: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }

    /// Position at session start: the first waypoint for patrolling NPCs.
    pub fn initial_position(&self) -> Vec3 {
        self.patrol_path()
            .and_then(|p| p.first().copied())
            .unwrap_or_else(|| self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(name: Option<&str>) -> InteractableEntity {
        InteractableEntity::WorldObject {
            id: EntityId::new("lamp-1"),
            position: Vec3::new(1.0, 1.0, 1.0),
            kind: ObjectKind::Light,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn display_name_falls_back_to_ids() {
        assert_eq!(lamp(None).display_name(), "lamp-1");
        assert_eq!(lamp(Some("Desk Lamp")).display_name(), "Desk Lamp");

        let item = InteractableEntity::Item {
            id: EntityId::new("i1"),
            position: Vec3::ZERO,
            collectible_id: "notebook".into(),
            name: None,
        };
        assert_eq!(item.display_name(), "notebook");
    }

    #[test]
    fn patrolling_npc_starts_at_first_waypoint() {
        let npc = InteractableEntity::Npc {
            id: EntityId::new("npc"),
            position: Vec3::new(5.0, 0.0, 5.0),
            name: "Prof. Lee".into(),
            dialogue_lines: vec!["Hello".into()],
            patrol_path: Some(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]),
        };
        assert_eq!(npc.initial_position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(npc.kind(), EntityKind::Npc);
        assert_eq!(lamp(None).initial_position(), Vec3::new(1.0, 1.0, 1.0));
    }
}
