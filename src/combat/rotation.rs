use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationStep {
    pub skill: String,
    #[serde(default = "one")]
    pub repeat: u32,
}

impl RotationStep {
    pub fn new(skill: impl Into<String>, repeat: u32) -> Self {
        Self {
            skill: skill.into(),
            repeat,
        }
    }
}

/// Either the built-in priority policy or a user sequence cycled forever.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Priority,
    Sequence(Vec<RotationStep>),
}

/// Position inside a cyclic sequence, counting repeats of the current step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    pub index: usize,
    pub repeats_done: u32,
}

impl RotationCursor {
    pub fn current<'a>(&self, steps: &'a [RotationStep]) -> Option<&'a RotationStep> {
        if steps.is_empty() {
            return None;
        }
        steps.get(self.index % steps.len())
    }

    /// Count one cast of the current step; moves on once its repeats are used.
    pub fn advance(&mut self, steps: &[RotationStep]) {
        let Some(step) = self.current(steps) else {
            return;
        };
        self.repeats_done += 1;
        if self.repeats_done >= step.repeat.max(1) {
            self.skip(steps);
        }
    }

    /// Move to the next step regardless of remaining repeats.
    pub fn skip(&mut self, steps: &[RotationStep]) {
        if steps.is_empty() {
            return;
        }
        self.index = (self.index + 1) % steps.len();
        self.repeats_done = 0;
    }
}
