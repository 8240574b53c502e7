use std::sync::Arc;

use moodtrip::enrich::mock::{MockGenerator, MockTranslator, MockVideos};
use moodtrip::enrich::{Enricher, ServiceError, Video, localize};
use moodtrip::guide::{ConversationSpec, TravelPlan, replay};
use moodtrip::language::Language;

fn plan() -> TravelPlan {
    let answers: Vec<String> = ["Happy", "4-7 days", "Medium", "Solo", "Mountains"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    replay(&ConversationSpec::travel_planner(), &answers).unwrap()
}

fn videos(n: usize) -> Vec<Video> {
    (1..=n)
        .map(|i| Video {
            title: format!("Himalaya vlog {i}"),
            url: format!("https://www.youtube.com/watch?v=v{i}"),
            channel: "Trails".to_string(),
        })
        .collect()
}

#[tokio::test]
async fn enrich_runs_both_collaborators() {
    let generator = Arc::new(MockGenerator::replying("Day 1: Manali."));
    let search = Arc::new(MockVideos::found(videos(5)));
    let enricher = Enricher::new(generator.clone(), search.clone(), 3);

    let enriched = enricher.enrich(&plan()).await;

    assert_eq!(enriched.plan, plan());
    assert_eq!(enriched.narrative.as_deref(), Some("Day 1: Manali."));
    assert_eq!(enriched.videos.len(), 3);

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("- Mood: Happy"));
    assert!(prompt.contains("- Environment Preference: Mountains"));
    assert_eq!(
        search.queries(),
        vec![("Happy travel and food".to_string(), 3)]
    );
}

#[tokio::test]
async fn generator_failure_keeps_plan_and_videos() {
    let enricher = Enricher::new(
        Arc::new(MockGenerator::failing(ServiceError::MissingCredentials(
            "gemini".to_string(),
        ))),
        Arc::new(MockVideos::found(videos(2))),
        3,
    );

    let enriched = enricher.enrich(&plan()).await;

    assert!(enriched.narrative.is_none());
    assert_eq!(enriched.videos.len(), 2);
    let text = enriched.to_markdown();
    assert!(text.contains("Mountains"));
    assert!(text.contains("## Video Recommendations:"));
}

#[tokio::test]
async fn everything_failing_still_yields_plan() {
    let enricher = Enricher::new(
        Arc::new(MockGenerator::failing(ServiceError::Network("down".to_string()))),
        Arc::new(MockVideos::failing(ServiceError::Http {
            service: "youtube".to_string(),
            status: 403,
            message: "quota".to_string(),
        })),
        3,
    );

    let enriched = enricher.enrich(&plan()).await;

    assert_eq!(enriched.plan, plan());
    assert!(enriched.narrative.is_none());
    assert!(enriched.videos.is_empty());
    assert_eq!(enriched.to_markdown(), plan().to_string());
}

#[tokio::test]
async fn zero_videos_skips_search() {
    let search = Arc::new(MockVideos::found(videos(3)));
    let enricher = Enricher::new(Arc::new(MockGenerator::replying("ok")), search.clone(), 0);

    let enriched = enricher.enrich(&plan()).await;

    assert!(enriched.videos.is_empty());
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn chat_uses_mood_line_for_videos() {
    let search = Arc::new(MockVideos::found(videos(1)));
    let enricher = Enricher::new(
        Arc::new(MockGenerator::replying("Try Kyoto.")),
        search.clone(),
        3,
    );

    let reply = enricher.chat("Mood: Excited\nsomewhere new").await.unwrap();

    assert!(reply.starts_with("Try Kyoto."));
    assert!(reply.contains("1. [Himalaya vlog 1](https://www.youtube.com/watch?v=v1) by Trails"));
    assert_eq!(search.queries()[0].0, "Excited travel and food");
}

#[tokio::test]
async fn chat_without_mood_falls_back() {
    let search = Arc::new(MockVideos::found(Vec::new()));
    let enricher = Enricher::new(Arc::new(MockGenerator::replying("Hi!")), search.clone(), 3);

    let reply = enricher.chat("I need a break").await.unwrap();

    assert_eq!(reply, "Hi!");
    assert_eq!(search.queries()[0].0, "general travel travel and food");
}

#[tokio::test]
async fn chat_surfaces_generator_failure() {
    let enricher = Enricher::new(
        Arc::new(MockGenerator::failing(ServiceError::MissingCredentials(
            "gemini".to_string(),
        ))),
        Arc::new(MockVideos::found(videos(1))),
        3,
    );

    let err = enricher.chat("Mood: Sad").await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingCredentials(_)));
}

#[tokio::test]
async fn localize_english_is_identity() {
    let text = localize(&MockTranslator::tagging(), "What is your budget?", Language::English).await;
    assert_eq!(text, "What is your budget?");
}

#[tokio::test]
async fn localize_translates_other_languages() {
    let text = localize(&MockTranslator::tagging(), "What is your budget?", Language::Kannada).await;
    assert_eq!(text, "[kn] What is your budget?");
}

#[tokio::test]
async fn localize_failure_returns_original() {
    let text = localize(&MockTranslator::failing(), "Solo", Language::Hindi).await;
    assert_eq!(text, "Solo");
}
