use std::fmt;

use serde::{Deserialize, Serialize};

use super::GuideError;

/// Number of answers a plan is built from.
pub const PLAN_FIELDS: usize = 5;

/// The fixed-shape record derived from a completed conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub mood: String,
    pub duration: String,
    pub budget: String,
    pub group: String,
    pub environment: String,
}

/// Build a plan from answers in question order:
/// mood, duration, budget, group, environment.
pub fn assemble(answers: &[String]) -> Result<TravelPlan, GuideError> {
    match answers {
        [mood, duration, budget, group, environment] => Ok(TravelPlan {
            mood: mood.clone(),
            duration: duration.clone(),
            budget: budget.clone(),
            group: group.clone(),
            environment: environment.clone(),
        }),
        _ => Err(GuideError::IncompleteAnswers {
            expected: PLAN_FIELDS,
            got: answers.len(),
        }),
    }
}

/// Markdown summary. This is what the conversant sees when no generated
/// itinerary is available.
impl fmt::Display for TravelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Here's your travel plan based on your preferences:")?;
        writeln!(
            f,
            "- **Mood:** {} - We'll make sure your trip matches your vibe!",
            self.mood
        )?;
        writeln!(
            f,
            "- **Duration:** {} - Perfect for a {} getaway.",
            self.duration,
            self.duration.to_lowercase()
        )?;
        writeln!(
            f,
            "- **Budget:** {} - We'll suggest options that fit your budget.",
            self.budget
        )?;
        writeln!(
            f,
            "- **Traveling:** {} - Tailored for a {} experience.",
            self.group,
            self.group.to_lowercase()
        )?;
        write!(
            f,
            "- **Environment:** {} - Enjoy the best of {} destinations.",
            self.environment,
            self.environment.to_lowercase()
        )
    }
}
