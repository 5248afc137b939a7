use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::action::{Action, InputSample};

/// Physical key name to action mapping.
///
/// Key names follow the DOM `KeyboardEvent.code` convention (`KeyW`,
/// `ArrowUp`, `ShiftLeft`, `Space`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut b = Self::empty();
        for (key, action) in [
            ("KeyW", Action::Forward),
            ("ArrowUp", Action::Forward),
            ("KeyS", Action::Backward),
            ("ArrowDown", Action::Backward),
            ("KeyA", Action::Left),
            ("ArrowLeft", Action::Left),
            ("KeyD", Action::Right),
            ("ArrowRight", Action::Right),
            ("ShiftLeft", Action::Run),
            ("ShiftRight", Action::Run),
            ("Space", Action::Jump),
            ("KeyE", Action::Interact),
        ] {
            b.bind(key, action);
        }
        b
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, action: Action) -> Option<Action> {
        self.keys.insert(key.into(), action)
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.keys.remove(key)
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }

    /// All keys bound to `action`, in key order.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
    }

    /// Short label for prompts, e.g. `"E"` for `KeyE`.
    pub fn label_for(&self, action: Action) -> Option<String> {
        self.keys_for(action)
            .next()
            .map(|k| k.strip_prefix("Key").unwrap_or(k).to_string())
    }
}

/// Held-key tracker that produces one `InputSample` per tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<String>,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key press. Returns the bound action, if any.
    pub fn press(&mut self, key: &str) -> Option<Action> {
        let action = self.bindings.action_for(key);
        if action.is_none() {
            tracing::trace!(key, "unbound key pressed");
        }
        self.held.insert(key.to_string());
        action
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Replace the held set wholesale.
    pub fn hold_only<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.held = keys.into_iter().map(str::to_string).collect();
    }

    /// Current sample: an action is held if any key bound to it is held.
    pub fn sample(&self) -> InputSample {
        let mut s = InputSample::idle();
        for key in &self.held {
            if let Some(action) = self.bindings.action_for(key) {
                s.set(action, true);
            }
        }
        s
    }
}
