//! Proximity prompts and interaction triggers for items, NPCs and world objects.
//!
//! # Invariants
//! - At most one prompt and one event per tick: the first near entity in
//!   registry order wins.
//! - A consumed item never prompts or fires again for the session.

use campus_common::EntityId;
use campus_scene::{InteractableEntity, ObjectKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{InteractionConfig, TriggerMode};

/// Signal for the surrounding game systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// An item was picked up; the inventory applies its effects.
    Collect {
        entity: EntityId,
        collectible_id: String,
    },
    /// A world object was used; world state applies its effects.
    Interact { kind: ObjectKind, id: EntityId },
    /// An NPC was addressed; opens the dialogue UI.
    Dialogue {
        npc: EntityId,
        name: String,
        lines: Vec<String>,
    },
}

/// Per-entity interaction bookkeeping, indexed like the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRuntimeState {
    pub is_near_player: bool,
    pub consumed: bool,
}

/// What the router surfaced this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterOutput {
    pub prompt: Option<String>,
    pub event: Option<InteractionEvent>,
    /// Registry index of the entity the prompt belongs to.
    pub focus: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityInteractionRouter {
    config: InteractionConfig,
    runtime: Vec<InteractionRuntimeState>,
    interact_held: bool,
}

impl ProximityInteractionRouter {
    pub fn new(config: InteractionConfig, entity_count: usize) -> Self {
        Self {
            config,
            runtime: vec![InteractionRuntimeState::default(); entity_count],
            interact_held: false,
        }
    }

    pub fn runtime(&self) -> &[InteractionRuntimeState] {
        &self.runtime
    }

    pub fn state(&self, index: usize) -> Option<InteractionRuntimeState> {
        self.runtime.get(index).copied()
    }

    /// Entities still taking part in proximity checks.
    pub fn active_count(&self) -> usize {
        self.runtime.iter().filter(|r| !r.consumed).count()
    }

    /// Run one proximity pass.
    ///
    /// `positions[i]` is the current position of `entities[i]` (patrolling
    /// NPCs move); entities without an entry use their authored position.
    pub fn route(
        &mut self,
        player: Vec3,
        interact: bool,
        entities: &[InteractableEntity],
        positions: &[Vec3],
    ) -> RouterOutput {
        let fire = match self.config.trigger {
            TriggerMode::Edge => interact && !self.interact_held,
            TriggerMode::Level => interact,
        };
        self.interact_held = interact;

        let config = &self.config;
        let mut focus = None;
        for (index, (entity, rt)) in entities.iter().zip(self.runtime.iter_mut()).enumerate() {
            if rt.consumed {
                continue;
            }
            let position = positions
                .get(index)
                .copied()
                .unwrap_or_else(|| entity.position());
            let near = player.distance(position) < config.radius_for(entity.kind());
            if near != rt.is_near_player {
                rt.is_near_player = near;
                tracing::debug!(entity = %entity.id(), near, "proximity changed");
            }
            if near && focus.is_none() {
                focus = Some(index);
            }
        }

        let mut event = None;
        if fire {
            if let Some(index) = focus {
                let (ev, consumed) = trigger(&entities[index]);
                tracing::info!(entity = %entities[index].id(), ?ev, "interaction");
                if consumed {
                    self.runtime[index] = InteractionRuntimeState {
                        is_near_player: false,
                        consumed: true,
                    };
                    focus = (index + 1..self.runtime.len().min(entities.len()))
                        .find(|&j| self.runtime[j].is_near_player && !self.runtime[j].consumed);
                }
                event = Some(ev);
            }
        }

        RouterOutput {
            prompt: focus.map(|i| prompt_for(&self.config.key_label, &entities[i])),
            event,
            focus,
        }
    }
}

/// Event for interacting with `entity`, and whether it is used up.
fn trigger(entity: &InteractableEntity) -> (InteractionEvent, bool) {
    match entity {
        InteractableEntity::Item {
            id, collectible_id, ..
        } => (
            InteractionEvent::Collect {
                entity: id.clone(),
                collectible_id: collectible_id.clone(),
            },
            true,
        ),
        InteractableEntity::WorldObject { id, kind, .. } => (
            InteractionEvent::Interact {
                kind: *kind,
                id: id.clone(),
            },
            false,
        ),
        InteractableEntity::Npc {
            id,
            name,
            dialogue_lines,
            ..
        } => (
            InteractionEvent::Dialogue {
                npc: id.clone(),
                name: name.clone(),
                lines: dialogue_lines.clone(),
            },
            false,
        ),
    }
}

/// HUD prompt for `entity`, e.g. `Press E to pick up Notebook`.
pub fn prompt_for(key: &str, entity: &InteractableEntity) -> String {
    let verb = match entity {
        InteractableEntity::Item { .. } => "pick up",
        InteractableEntity::Npc { .. } => "talk to",
        InteractableEntity::WorldObject {
            kind: ObjectKind::Light,
            ..
        } => "turn on",
        InteractableEntity::WorldObject { .. } => "interact with",
    };
    format!("Press {key} to {verb} {}", entity.display_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, pos: Vec3) -> InteractableEntity {
        InteractableEntity::Item {
            id: EntityId::new(id),
            position: pos,
            collectible_id: format!("{id}-reward"),
            name: Some("Notebook".into()),
        }
    }

    fn npc(id: &str, pos: Vec3) -> InteractableEntity {
        InteractableEntity::Npc {
            id: EntityId::new(id),
            position: pos,
            name: "Prof. Lee".into(),
            dialogue_lines: vec!["Hi".into(), "Study hard.".into()],
            patrol_path: None,
        }
    }

    fn light(id: &str, pos: Vec3) -> InteractableEntity {
        InteractableEntity::WorldObject {
            id: EntityId::new(id),
            position: pos,
            kind: ObjectKind::Light,
            name: Some("Desk Lamp".into()),
        }
    }

    fn positions(entities: &[InteractableEntity]) -> Vec<Vec3> {
        entities.iter().map(|e| e.position()).collect()
    }

    fn router(entities: &[InteractableEntity]) -> ProximityInteractionRouter {
        ProximityInteractionRouter::new(InteractionConfig::default(), entities.len())
    }

    #[test]
    fn prompt_appears_inside_threshold_only() {
        let entities = vec![item("pen", Vec3::new(2.0, 0.0, 0.0))];
        let pos = positions(&entities);
        let mut r = router(&entities);

        let far = r.route(Vec3::new(-3.0, 0.0, 0.0), false, &entities, &pos);
        assert!(far.prompt.is_none());

        // Exactly at the threshold is not near.
        let edge = r.route(Vec3::new(0.0, 0.0, 0.0), false, &entities, &pos);
        assert!(edge.prompt.is_none());

        let near = r.route(Vec3::new(0.5, 0.0, 0.0), false, &entities, &pos);
        assert_eq!(near.prompt.as_deref(), Some("Press E to pick up Notebook"));
        assert!(r.state(0).unwrap().is_near_player);

        let left = r.route(Vec3::new(-5.0, 0.0, 0.0), false, &entities, &pos);
        assert!(left.prompt.is_none());
        assert!(!r.state(0).unwrap().is_near_player);
    }

    #[test]
    fn npc_threshold_is_larger() {
        let entities = vec![npc("prof", Vec3::ZERO), light("lamp", Vec3::new(0.0, 0.0, 20.0))];
        let pos = positions(&entities);
        let mut r = router(&entities);
        let out = r.route(Vec3::new(2.5, 0.0, 0.0), false, &entities, &pos);
        assert_eq!(out.prompt.as_deref(), Some("Press E to talk to Prof. Lee"));

        let out = r.route(Vec3::new(0.0, 0.0, 17.5), false, &entities, &pos);
        assert!(out.prompt.is_none());
    }

    #[test]
    fn item_collects_once() {
        let entities = vec![item("pen", Vec3::ZERO)];
        let pos = positions(&entities);
        let mut r = router(&entities);

        let out = r.route(Vec3::new(1.5, 0.0, 0.0), true, &entities, &pos);
        assert_eq!(
            out.event,
            Some(InteractionEvent::Collect {
                entity: EntityId::new("pen"),
                collectible_id: "pen-reward".into(),
            })
        );
        assert!(out.prompt.is_none());
        assert_eq!(r.active_count(), 0);

        r.route(Vec3::new(9.0, 0.0, 0.0), false, &entities, &pos);
        let again = r.route(Vec3::new(1.0, 0.0, 0.0), true, &entities, &pos);
        assert!(again.event.is_none());
        assert!(again.prompt.is_none());
    }

    #[test]
    fn edge_trigger_fires_once_per_press() {
        let entities = vec![light("lamp", Vec3::ZERO)];
        let pos = positions(&entities);
        let mut r = router(&entities);
        let player = Vec3::new(1.0, 0.0, 0.0);

        let fired: Vec<bool> = [true, true, true, false, true]
            .into_iter()
            .map(|held| r.route(player, held, &entities, &pos).event.is_some())
            .collect();
        assert_eq!(fired, vec![true, false, false, false, true]);
    }

    #[test]
    fn level_trigger_fires_every_held_tick() {
        let entities = vec![light("lamp", Vec3::ZERO)];
        let pos = positions(&entities);
        let config = InteractionConfig {
            trigger: TriggerMode::Level,
            ..InteractionConfig::default()
        };
        let mut r = ProximityInteractionRouter::new(config, 1);
        let player = Vec3::new(1.0, 0.0, 0.0);
        let count = (0..5)
            .filter(|_| r.route(player, true, &entities, &pos).event.is_some())
            .count();
        assert_eq!(count, 5);
    }

    #[test]
    fn world_object_and_npc_are_repeatable() {
        let entities = vec![npc("prof", Vec3::ZERO)];
        let pos = positions(&entities);
        let mut r = router(&entities);
        let player = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..3 {
            let out = r.route(player, true, &entities, &pos);
            assert!(matches!(
                out.event,
                Some(InteractionEvent::Dialogue { ref lines, .. }) if lines.len() == 2
            ));
            r.route(player, false, &entities, &pos);
        }
        assert_eq!(r.active_count(), 1);
    }

    #[test]
    fn first_entity_in_order_wins() {
        let entities = vec![
            light("lamp", Vec3::new(0.5, 0.0, 0.0)),
            item("pen", Vec3::new(-0.5, 0.0, 0.0)),
        ];
        let pos = positions(&entities);
        let mut r = router(&entities);
        let out = r.route(Vec3::ZERO, true, &entities, &pos);
        assert_eq!(out.focus, Some(0));
        assert!(matches!(
            out.event,
            Some(InteractionEvent::Interact {
                kind: ObjectKind::Light,
                ..
            })
        ));
        assert!(r.state(0).unwrap().is_near_player);
        assert!(r.state(1).unwrap().is_near_player);
        assert_eq!(out.prompt.as_deref(), Some("Press E to turn on Desk Lamp"));
    }

    #[test]
    fn collecting_hands_prompt_to_next_near_entity() {
        let entities = vec![
            item("pen", Vec3::new(0.5, 0.0, 0.0)),
            light("lamp", Vec3::new(-0.5, 0.0, 0.0)),
        ];
        let pos = positions(&entities);
        let mut r = router(&entities);
        let out = r.route(Vec3::ZERO, true, &entities, &pos);
        assert!(matches!(out.event, Some(InteractionEvent::Collect { .. })));
        assert_eq!(out.focus, Some(1));
        assert_eq!(out.prompt.as_deref(), Some("Press E to turn on Desk Lamp"));
        assert_eq!(
            r.runtime(),
            &[
                InteractionRuntimeState {
                    is_near_player: false,
                    consumed: true,
                },
                InteractionRuntimeState {
                    is_near_player: true,
                    consumed: false,
                },
            ]
        );
    }

    #[test]
    fn moving_positions_override_authored_ones() {
        let entities = vec![npc("prof", Vec3::new(50.0, 0.0, 0.0))];
        let mut r = router(&entities);
        let out = r.route(Vec3::ZERO, false, &entities, &[Vec3::new(1.0, 0.0, 0.0)]);
        assert!(out.prompt.is_some());
    }

    #[test]
    fn generic_objects_use_interact_with() {
        let shelf = InteractableEntity::WorldObject {
            id: EntityId::new("shelf"),
            position: Vec3::ZERO,
            kind: ObjectKind::Book,
            name: None,
        };
        assert_eq!(prompt_for("F", &shelf), "Press F to interact with shelf");
    }
}
