use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A discrete action the exploration core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Run,
    Jump,
    Interact,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Run,
        Action::Jump,
        Action::Interact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::Left => "left",
            Action::Right => "right",
            Action::Run => "run",
            Action::Jump => "jump",
            Action::Interact => "interact",
        }
    }
}

/// Errors from parsing input descriptions.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

impl FromStr for Action {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::UnknownAction(s.to_string()))
    }
}

/// Input sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSample {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub jump: bool,
    pub interact: bool,
}

impl InputSample {
    /// Sample with every action released.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Builder-style helper: this sample with `action` held.
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Forward => self.forward = held,
            Action::Backward => self.backward = held,
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Run => self.run = held,
            Action::Jump => self.jump = held,
            Action::Interact => self.interact = held,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Run => self.run,
            Action::Jump => self.jump,
            Action::Interact => self.interact,
        }
    }

    /// Whether any of the four directional actions is held.
    pub fn has_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_action_names_case_insensitive() {
        assert_eq!("Forward".parse::<Action>().unwrap(), Action::Forward);
        assert_eq!(" jump ".parse::<Action>().unwrap(), Action::Jump);
        assert!(matches!(
            "crouch".parse::<Action>(),
            Err(InputError::UnknownAction(_))
        ));
    }

    #[test]
    fn builder_sets_flags() {
        let s = InputSample::idle().with(Action::Forward).with(Action::Run);
        assert!(s.forward && s.run);
        assert!(!s.jump);
        assert!(s.has_direction());
    }

    #[test]
    fn set_and_is_held_agree_for_every_action() {
        for action in Action::ALL {
            let mut s = InputSample::idle();
            s.set(action, true);
            assert!(s.is_held(action));
            s.set(action, false);
            assert_eq!(s, InputSample::idle());
        }
    }

    #[test]
    fn run_and_jump_are_not_directions() {
        let s = InputSample::idle().with(Action::Run).with(Action::Jump);
        assert!(!s.has_direction());
    }

    #[test]
    fn sample_deserializes_with_missing_fields() {
        let s: InputSample = serde_yaml::from_str("forward: true\nrun: true\n").unwrap();
        assert!(s.forward && s.run);
        assert!(!s.interact);
    }
}
