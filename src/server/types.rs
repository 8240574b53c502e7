//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::enrich::Video;
use crate::guide::{Step, TravelPlan};

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// What every turn returns, question or finished plan.
#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    /// The question, or the plan as markdown, in the requested language.
    pub response: String,
    /// Canonical choices to send back as `text`.
    pub next_options: Vec<String>,
    /// Display labels for `next_options`, same order.
    pub labels: Vec<String>,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<TravelPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub cursor: usize,
    pub total: usize,
    pub answers: Vec<String>,
    pub current: Option<Step>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
