use crate::guide::TravelPlan;

const INTRO: &str = "You are an AI travel agent specialized in mood-based travel recommendations.";
const DETAILS_HEADER: &str = "When users express their mood or feelings, suggest appropriate travel destinations with detailed information including:";
const DETAILS: &[&str] = &[
    "Why this destination matches their mood",
    "Top attractions to visit",
    "Best time to visit",
    "Estimated budget",
    "Travel tips",
];
const CLOSING: &[&str] = &[
    "Keep your responses informative, engaging, and personalized to the user's mood.",
    "If the user doesn't mention a mood, ask them how they're feeling to provide better recommendations.",
];

/// Shown before the first message in free-chat mode.
pub const WELCOME: &str = "Hi, I'm your AI travel agent! Tell me how you're feeling, and I'll suggest the perfect destination for you.";

/// Input hint in free-chat mode.
pub const CHAT_HINT: &str = "How are you feeling today?";

/// Spinner label while waiting on the generator.
pub const THINKING: &str = "Thinking...";

pub fn build_travel_system_prompt() -> String {
    let details = DETAILS
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {}", i + 1, d))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{INTRO}\n{DETAILS_HEADER}\n{details}\n\n{}",
        CLOSING.join("\n")
    )
}

/// The request sent to the generator once a guided conversation completes.
/// The `Mood:` line doubles as the video-search hint.
pub fn build_plan_prompt(plan: &TravelPlan) -> String {
    format!(
        "Generate a detailed travel plan based on these preferences:\n\
         - Mood: {}\n\
         - Duration: {}\n\
         - Budget: {}\n\
         - Group Type: {}\n\
         - Environment Preference: {}\n\
         \n\
         Include specific destination recommendations, activities, accommodation options, and travel tips.",
        plan.mood, plan.duration, plan.budget, plan.group, plan.environment
    )
}
