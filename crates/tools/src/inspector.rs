use campus_common::EntityId;
use campus_kernel::{MovementState, Session};
use campus_scene::EntityKind;
use glam::Vec3;

/// Session inspector for developer tooling.
///
/// Read-only queries against a session for debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let player = session.player();
        SessionSummary {
            tick: session.tick(),
            elapsed: session.elapsed(),
            player_position: player.position,
            movement_state: player.movement_state,
            entity_count: session.registry().len(),
            active_entities: session.active_entities(),
            logged_events: session.events().len(),
            state_hash: session.state_hash(),
        }
    }

    /// Runtime view of one entity, looked up by id.
    pub fn inspect_entity(session: &Session, id: &EntityId) -> Option<EntityInfo> {
        let index = session.registry().index_of(id)?;
        let entity = session.registry().get(index)?;
        let position = session.entity_position(index)?;
        let runtime = session.interaction_state(index).unwrap_or_default();
        Some(EntityInfo {
            id: id.clone(),
            kind: entity.kind(),
            name: entity.display_name().to_owned(),
            position,
            distance: session.player().position.distance(position),
            near: runtime.is_near_player,
            consumed: runtime.consumed,
            patrol_segment: session.patrol_state(index).map(|s| s.segment_index),
        })
    }

    /// All entity ids in registry order.
    pub fn list_entities(session: &Session) -> Vec<EntityId> {
        session
            .registry()
            .entities()
            .iter()
            .map(|e| e.id().clone())
            .collect()
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub player_position: Vec3,
    pub movement_state: MovementState,
    pub entity_count: usize,
    pub active_entities: usize,
    pub logged_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.player_position;
        write!(
            f,
            "Session: tick={} elapsed={:.2}s player=({:.2}, {:.2}, {:.2}) state={} entities={}/{} events={} hash={:016x}",
            self.tick,
            self.elapsed,
            p.x,
            p.y,
            p.z,
            self.movement_state.name(),
            self.active_entities,
            self.entity_count,
            self.logged_events,
            self.state_hash,
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub position: Vec3,
    pub distance: f32,
    pub near: bool,
    pub consumed: bool,
    /// Current segment for patrolling NPCs.
    pub patrol_segment: Option<usize>,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} [{}] \"{}\" pos=({:.2}, {:.2}, {:.2}) dist={:.2}",
            self.kind,
            self.id,
            self.name,
            self.position.x,
            self.position.y,
            self.position.z,
            self.distance,
        )?;
        if self.near {
            write!(f, " near")?;
        }
        if self.consumed {
            write!(f, " consumed")?;
        }
        if let Some(segment) = self.patrol_segment {
            write!(f, " segment={segment}")?;
        }
        Ok(())
    }
}
