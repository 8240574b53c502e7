//! Decorating plans with generated prose, video links, and translations.
//!
//! Everything here runs after the guide has produced a [`TravelPlan`] and
//! never feeds back into conversation state. Any collaborator may fail;
//! the plan survives regardless.

pub mod gemini;
pub mod mock;
pub mod mymemory;
pub mod youtube;

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::guide::{Step, TravelPlan};
use crate::language::Language;
use crate::prompts::build_plan_prompt;

/// Failure talking to an external service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("no API key for {0}")]
    MissingCredentials(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{service} returned HTTP {status}: {message}")]
    Http {
        service: String,
        status: u16,
        message: String,
    },
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

// reqwest errors carry the request URL, which may hold secrets
impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            ServiceError::InvalidResponse(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// A video recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub channel: String,
}

/// Writes prose from a prompt. Gemini in production, a script in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Finds videos for a query.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Video>, ServiceError>;
}

/// Translates English text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError>;
}

/// Translate for display. English passes through untouched; on failure the
/// original text is shown instead.
pub async fn localize(translator: &dyn Translator, text: &str, language: Language) -> String {
    if language.is_base() {
        return text.to_string();
    }
    match translator.translate(text, language).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!(error = %e, language = %language, "translation failed, showing original");
            text.to_string()
        }
    }
}

/// A step as the conversant sees it. The canonical choices stay on the
/// [`Step`]; these are display labels only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedStep {
    pub prompt: String,
    pub labels: Vec<String>,
}

/// Translate a step's prompt and every choice label concurrently.
pub async fn localize_step(
    translator: &dyn Translator,
    step: &Step,
    language: Language,
) -> LocalizedStep {
    let labels = step
        .choices
        .iter()
        .map(|choice| localize(translator, choice, language));
    let (prompt, labels) = futures::join!(
        localize(translator, &step.prompt, language),
        futures::future::join_all(labels)
    );
    LocalizedStep { prompt, labels }
}

/// A plan plus whatever decoration could be fetched for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedPlan {
    pub plan: TravelPlan,
    pub narrative: Option<String>,
    pub videos: Vec<Video>,
}

impl EnrichedPlan {
    /// The plan without any decoration.
    pub fn bare(plan: TravelPlan) -> Self {
        Self {
            plan,
            narrative: None,
            videos: Vec::new(),
        }
    }

    /// Generated itinerary when available, otherwise the plan summary,
    /// followed by video links.
    pub fn to_markdown(&self) -> String {
        let mut out = match &self.narrative {
            Some(text) => text.clone(),
            None => self.plan.to_string(),
        };
        out.push_str(&format_videos(&self.videos));
        out
    }
}

/// `## Video Recommendations:` section, empty when there are no videos.
pub fn format_videos(videos: &[Video]) -> String {
    if videos.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\n## Video Recommendations:\n");
    for (i, video) in videos.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}]({}) by {}",
            i + 1,
            video.title,
            video.url,
            video.channel
        );
    }
    out
}

/// Search query for a mood.
pub fn video_query(mood: &str) -> String {
    format!("{mood} travel and food")
}

/// Pull the mood out of a `Mood: ...` line, if the text has one.
pub fn extract_mood(text: &str) -> Option<&str> {
    let (_, rest) = text.split_once("Mood:")?;
    let mood = rest.lines().next().unwrap_or("").trim();
    (!mood.is_empty()).then_some(mood)
}

/// Mood used for video search when the message names none.
pub const FALLBACK_MOOD: &str = "general travel";

/// Runs the collaborators around a plan or a chat message.
pub struct Enricher {
    generator: Arc<dyn TextGenerator>,
    videos: Arc<dyn VideoSearch>,
    max_videos: usize,
}

impl Enricher {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        videos: Arc<dyn VideoSearch>,
        max_videos: usize,
    ) -> Self {
        Self {
            generator,
            videos,
            max_videos,
        }
    }

    /// Same video search, different generator.
    pub fn with_generator(&self, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            videos: self.videos.clone(),
            max_videos: self.max_videos,
        }
    }

    /// Generate an itinerary and find videos, concurrently. Failures are
    /// logged and leave the corresponding field empty.
    pub async fn enrich(&self, plan: &TravelPlan) -> EnrichedPlan {
        let prompt = build_plan_prompt(plan);
        let query = video_query(&plan.mood);

        let (narrative, videos) = futures::join!(
            self.generator.generate(&prompt),
            self.find_videos(&query)
        );

        let narrative = match narrative {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "itinerary generation failed, using plan summary");
                None
            }
        };

        EnrichedPlan {
            plan: plan.clone(),
            narrative,
            videos,
        }
    }

    /// Free-form chat: the generator's reply with video links appended.
    /// Only a generator failure is an error; missing videos are not.
    pub async fn chat(&self, message: &str) -> Result<String, ServiceError> {
        let mood = extract_mood(message).unwrap_or(FALLBACK_MOOD);
        let query = video_query(mood);

        let (reply, videos) = futures::join!(
            self.generator.generate(message),
            self.find_videos(&query)
        );

        let mut reply = reply?;
        reply.push_str(&format_videos(&videos));
        Ok(reply)
    }

    async fn find_videos(&self, query: &str) -> Vec<Video> {
        if self.max_videos == 0 {
            return Vec::new();
        }
        match self.videos.search(query, self.max_videos).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!(error = %e, query, "video search failed");
                Vec::new()
            }
        }
    }
}

/// A local HTTP stub that answers every request with one status and body.
#[cfg(test)]
pub(crate) async fn stub_server(status: u16, body: &'static str) -> String {
    use axum::http::StatusCode;

    let status = StatusCode::from_u16(status).unwrap();
    let app = axum::Router::new().fallback(move || async move { (status, body) });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(n: usize) -> Video {
        Video {
            title: format!("Trip {n}"),
            url: format!("https://www.youtube.com/watch?v=id{n}"),
            channel: "Wanderers".to_string(),
        }
    }

    fn plan() -> TravelPlan {
        TravelPlan {
            mood: "Excited".to_string(),
            duration: "1-3 days".to_string(),
            budget: "High".to_string(),
            group: "Group".to_string(),
            environment: "City".to_string(),
        }
    }

    #[tokio::test]
    async fn localize_step_keeps_choice_order() {
        let step = Step::new("Who is travelling?", &["Solo", "Couple"]);
        let shown = localize_step(&mock::MockTranslator::tagging(), &step, Language::Hindi).await;
        assert_eq!(shown.prompt, "[hi] Who is travelling?");
        assert_eq!(shown.labels, ["[hi] Solo", "[hi] Couple"]);
    }

    #[tokio::test]
    async fn localize_step_english_is_identity() {
        let step = Step::new("Budget?", &["Low", "High"]);
        let shown = localize_step(&mock::MockTranslator::failing(), &step, Language::English).await;
        assert_eq!(shown.prompt, "Budget?");
        assert_eq!(shown.labels, step.choices);
    }

    #[tokio::test]
    async fn localize_failure_shows_original() {
        let text = localize(&mock::MockTranslator::failing(), "Thinking...", Language::Telugu).await;
        assert_eq!(text, "Thinking...");
    }

    #[test]
    fn format_videos_numbers_links() {
        let text = format_videos(&[video(1), video(2)]);
        assert!(text.starts_with("\n\n## Video Recommendations:\n"));
        assert!(text.contains("1. [Trip 1](https://www.youtube.com/watch?v=id1) by Wanderers\n"));
        assert!(text.contains("2. [Trip 2]"));
    }

    #[test]
    fn format_videos_empty_is_empty() {
        assert_eq!(format_videos(&[]), "");
    }

    #[test]
    fn extract_mood_reads_line() {
        assert_eq!(extract_mood("Mood: Happy\nDuration: 3"), Some("Happy"));
        assert_eq!(extract_mood("I feel Mood:   Sad  "), Some("Sad"));
        assert_eq!(extract_mood("I just want a beach"), None);
        assert_eq!(extract_mood("Mood:\nnothing"), None);
    }

    #[test]
    fn video_query_mentions_food() {
        assert_eq!(video_query("Happy"), "Happy travel and food");
    }

    #[test]
    fn bare_plan_markdown_is_summary() {
        let enriched = EnrichedPlan::bare(plan());
        assert_eq!(enriched.to_markdown(), plan().to_string());
    }

    #[test]
    fn markdown_prefers_narrative() {
        let enriched = EnrichedPlan {
            plan: plan(),
            narrative: Some("Go to Tokyo.".to_string()),
            videos: vec![video(1)],
        };
        let text = enriched.to_markdown();
        assert!(text.starts_with("Go to Tokyo."));
        assert!(text.contains("## Video Recommendations:"));
        assert!(!text.contains("**Mood:**"));
    }
}
