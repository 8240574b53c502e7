use serde::{Deserialize, Serialize};

use super::GuideError;

/// One question plus the fixed set of answers it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub prompt: String,
    pub choices: Vec<String>,
}

impl Step {
    pub fn new(prompt: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            prompt: prompt.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Exact-match check against the step's choices.
    pub fn accepts(&self, answer: &str) -> bool {
        self.choices.iter().any(|c| c == answer)
    }
}

/// The ordered question list every conversant walks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSpec {
    steps: Vec<Step>,
}

impl ConversationSpec {
    /// Build a spec. Fails if there are no steps or a step has no choices.
    pub fn new(steps: Vec<Step>) -> Result<Self, GuideError> {
        if steps.is_empty() {
            return Err(GuideError::InvalidSpec("no steps".to_string()));
        }
        if let Some(step) = steps.iter().find(|s| s.choices.is_empty()) {
            return Err(GuideError::InvalidSpec(format!(
                "step \"{}\" has no choices",
                step.prompt
            )));
        }
        Ok(Self { steps })
    }

    /// The five-question mood-based trip planner.
    pub fn travel_planner() -> Self {
        Self {
            steps: vec![
                Step::new(
                    "What is your mood for this trip?",
                    &["Happy", "Sad", "Boring", "Excited"],
                ),
                Step::new(
                    "How many days are you planning to travel?",
                    &["1-3 days", "4-7 days", "More than a week"],
                ),
                Step::new("What is your budget?", &["Low", "Medium", "High"]),
                Step::new("Are you traveling solo or in a group?", &["Solo", "Group"]),
                Step::new(
                    "What kind of environment do you prefer?",
                    &["Beaches", "Mountains", "City", "Countryside"],
                ),
            ],
        }
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> &Step {
        // `new` rejects empty specs
        &self.steps[0]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Default for ConversationSpec {
    fn default() -> Self {
        Self::travel_planner()
    }
}
