use thiserror::Error;

/// Everything that can go wrong while walking a conversation.
///
/// All of these are recoverable: a failed call never changes state, so the
/// caller can retry with a corrected answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuideError {
    /// The answer is not one of the current step's choices.
    #[error("\"{answer}\" is not a valid choice (expected one of: {})", .choices.join(", "))]
    InvalidChoice {
        answer: String,
        choices: Vec<String>,
    },

    /// No conversation exists for this conversant and the engine is strict
    /// about first contact.
    #[error("unknown conversant, start a conversation first")]
    UnknownConversant,

    /// Plan assembly was handed the wrong number of answers.
    #[error("expected {expected} answers to build a plan, got {got}")]
    IncompleteAnswers { expected: usize, got: usize },

    /// Every step is already answered; `start` begins a new round.
    #[error("conversation already complete, start a new one")]
    AlreadyComplete,

    /// The conversation spec itself is malformed.
    #[error("invalid conversation spec: {0}")]
    InvalidSpec(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_choice_lists_choices() {
        let err = GuideError::InvalidChoice {
            answer: "Angry".to_string(),
            choices: vec!["Happy".to_string(), "Sad".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Angry\""));
        assert!(msg.contains("Happy, Sad"));
    }

    #[test]
    fn incomplete_answers_message() {
        let err = GuideError::IncompleteAnswers {
            expected: 5,
            got: 3,
        };
        assert_eq!(err.to_string(), "expected 5 answers to build a plan, got 3");
    }
}
