use serde::{Deserialize, Serialize};

use super::{ConversationSpec, GuideError, Step, TravelPlan, assemble};

/// A conversant's reply, as handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer(String);

impl Answer {
    /// Surrounding whitespace is dropped; nothing else is coerced.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// What a successful submit produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// More questions remain; this is the next one.
    NextQuestion(Step),
    /// The last question was answered.
    Complete(TravelPlan),
}

/// One conversant's progress through a [`ConversationSpec`].
///
/// `answers.len() == cursor` always holds between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawState")]
pub struct ConversationState {
    cursor: usize,
    answers: Vec<String>,
}

#[derive(Deserialize)]
struct RawState {
    cursor: usize,
    answers: Vec<String>,
}

impl TryFrom<RawState> for ConversationState {
    type Error = String;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        if raw.cursor != raw.answers.len() {
            return Err(format!(
                "cursor {} does not match {} recorded answers",
                raw.cursor,
                raw.answers.len()
            ));
        }
        Ok(Self {
            cursor: raw.cursor,
            answers: raw.answers,
        })
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn is_complete(&self, spec: &ConversationSpec) -> bool {
        self.cursor >= spec.len()
    }

    /// Back to the first question, discarding all answers.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.answers.clear();
    }

    pub fn current_step<'a>(&self, spec: &'a ConversationSpec) -> Option<&'a Step> {
        spec.step(self.cursor)
    }

    /// Record an answer to the current step and advance.
    ///
    /// Validation and plan assembly happen before anything is written, so on
    /// error the state is exactly as it was.
    pub fn submit(
        &mut self,
        spec: &ConversationSpec,
        answer: Answer,
    ) -> Result<StepResult, GuideError> {
        let step = self
            .current_step(spec)
            .ok_or(GuideError::AlreadyComplete)?;

        if !step.accepts(answer.as_str()) {
            return Err(GuideError::InvalidChoice {
                answer: answer.into_inner(),
                choices: step.choices.clone(),
            });
        }

        let next = self.cursor + 1;
        if next < spec.len() {
            self.answers.push(answer.into_inner());
            self.cursor = next;
            tracing::debug!(cursor = self.cursor, "answer recorded");
            // `next < len` so the step exists
            return Ok(StepResult::NextQuestion(spec.steps()[next].clone()));
        }

        let mut answers = self.answers.clone();
        answers.push(answer.into_inner());
        let plan = assemble(&answers)?;

        self.answers = answers;
        self.cursor = next;
        tracing::debug!(cursor = self.cursor, "conversation complete");
        Ok(StepResult::Complete(plan))
    }
}

/// Run a full set of answers through a fresh state, strictly.
///
/// Too few answers is [`GuideError::IncompleteAnswers`]; too many is
/// [`GuideError::AlreadyComplete`].
pub fn replay(spec: &ConversationSpec, answers: &[String]) -> Result<TravelPlan, GuideError> {
    let mut state = ConversationState::new();
    for answer in answers {
        if let StepResult::Complete(plan) = state.submit(spec, Answer::new(answer))? {
            if state.cursor() < answers.len() {
                return Err(GuideError::AlreadyComplete);
            }
            return Ok(plan);
        }
    }
    Err(GuideError::IncompleteAnswers {
        expected: spec.len(),
        got: answers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ConversationSpec {
        ConversationSpec::travel_planner()
    }

    #[test]
    fn answer_trims_whitespace() {
        assert_eq!(Answer::new("  Happy \n").as_str(), "Happy");
        assert_eq!(Answer::from("Sad").into_inner(), "Sad");
    }

    #[test]
    fn fresh_state_points_at_first_step() {
        let state = ConversationState::new();
        let spec = spec();
        assert_eq!(state.cursor(), 0);
        assert!(state.answers().is_empty());
        assert_eq!(state.current_step(&spec), Some(spec.first()));
    }

    #[test]
    fn submit_advances_and_returns_next_question() {
        let spec = spec();
        let mut state = ConversationState::new();
        let result = state.submit(&spec, "Happy".into()).unwrap();
        assert_eq!(
            result,
            StepResult::NextQuestion(spec.step(1).unwrap().clone())
        );
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.answers(), ["Happy"]);
    }

    #[test]
    fn invalid_choice_leaves_state_untouched() {
        let spec = spec();
        let mut state = ConversationState::new();
        state.submit(&spec, "Happy".into()).unwrap();
        let before = state.clone();

        let err = state.submit(&spec, "a fortnight".into()).unwrap_err();
        assert!(matches!(err, GuideError::InvalidChoice { ref answer, .. } if answer == "a fortnight"));
        assert_eq!(state, before);
    }

    #[test]
    fn fifth_answer_completes() {
        let spec = spec();
        let mut state = ConversationState::new();
        for answer in ["Sad", "1-3 days", "Low", "Group"] {
            assert!(matches!(
                state.submit(&spec, answer.into()).unwrap(),
                StepResult::NextQuestion(_)
            ));
        }
        let result = state.submit(&spec, "Beaches".into()).unwrap();
        let StepResult::Complete(plan) = result else {
            panic!("expected Complete");
        };
        assert_eq!(plan.mood, "Sad");
        assert_eq!(plan.environment, "Beaches");
        assert!(state.is_complete(&spec));
        assert_eq!(state.current_step(&spec), None);
    }

    #[test]
    fn submit_after_complete_is_rejected() {
        let spec = spec();
        let mut state = ConversationState::new();
        for answer in ["Sad", "1-3 days", "Low", "Group", "Beaches"] {
            state.submit(&spec, answer.into()).unwrap();
        }
        let before = state.clone();
        assert_eq!(
            state.submit(&spec, "Happy".into()),
            Err(GuideError::AlreadyComplete)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn restart_clears_progress() {
        let spec = spec();
        let mut state = ConversationState::new();
        state.submit(&spec, "Excited".into()).unwrap();
        state.restart();
        assert_eq!(state, ConversationState::new());
    }

    #[test]
    fn short_spec_fails_assembly_without_advancing() {
        let spec = ConversationSpec::new(vec![Step::new("Ready?", &["Yes"])]).unwrap();
        let mut state = ConversationState::new();
        let err = state.submit(&spec, "Yes".into()).unwrap_err();
        assert_eq!(
            err,
            GuideError::IncompleteAnswers {
                expected: 5,
                got: 1
            }
        );
        assert_eq!(state.cursor(), 0);
        assert!(state.answers().is_empty());
    }

    #[test]
    fn state_round_trips_through_json() {
        let spec = spec();
        let mut state = ConversationState::new();
        state.submit(&spec, "Boring".into()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn deserialize_rejects_cursor_mismatch() {
        let json = r#"{"cursor": 3, "answers": ["Happy"]}"#;
        let err = serde_json::from_str::<ConversationState>(json).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    fn owned(answers: &[&str]) -> Vec<String> {
        answers.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn replay_builds_plan() {
        let plan = replay(
            &spec(),
            &owned(&["Excited", "More than a week", "High", "Group", "Beaches"]),
        )
        .unwrap();
        assert_eq!(plan.group, "Group");
        assert_eq!(plan.environment, "Beaches");
    }

    #[test]
    fn replay_short_is_incomplete() {
        let err = replay(&spec(), &owned(&["Happy", "1-3 days"])).unwrap_err();
        assert_eq!(err, GuideError::IncompleteAnswers { expected: 5, got: 2 });
    }

    #[test]
    fn replay_long_is_already_complete() {
        let err = replay(
            &spec(),
            &owned(&["Happy", "1-3 days", "Low", "Solo", "City", "Beaches"]),
        )
        .unwrap_err();
        assert_eq!(err, GuideError::AlreadyComplete);
    }

    #[test]
    fn replay_is_strict_about_case() {
        let err = replay(&spec(), &owned(&["happy", "1-3 days", "Low", "Solo", "City"])).unwrap_err();
        assert!(matches!(err, GuideError::InvalidChoice { .. }));
    }
}
