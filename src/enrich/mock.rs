use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ServiceError, TextGenerator, Translator, Video, VideoSearch};
use crate::language::Language;

/// A scripted generator for tests. Returns pre-defined replies in order and
/// remembers the prompts it was given.
pub struct MockGenerator {
    replies: Vec<Result<String, ServiceError>>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).push(prompt.to_string());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        // a single scripted reply repeats forever
        let reply = if self.replies.len() == 1 {
            self.replies.first()
        } else {
            self.replies.get(i)
        };
        reply.cloned().unwrap_or_else(|| {
            Err(ServiceError::InvalidResponse(format!(
                "MockGenerator: no more replies (called {} times)",
                i + 1
            )))
        })
    }
}

/// Video search with a fixed outcome.
pub struct MockVideos {
    result: Result<Vec<Video>, ServiceError>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockVideos {
    pub fn found(videos: Vec<Video>) -> Self {
        Self {
            result: Ok(videos),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            result: Err(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `(query, max_results)` for every search so far.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl VideoSearch for MockVideos {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Video>, ServiceError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((query.to_string(), max_results));
        self.result
            .clone()
            .map(|videos| videos.into_iter().take(max_results).collect())
    }
}

/// Tags text with the target language code instead of translating it.
pub struct MockTranslator {
    fail: bool,
}

impl MockTranslator {
    pub fn tagging() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        if self.fail {
            return Err(ServiceError::Network("translator offline".to_string()));
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let generator = MockGenerator::new(vec![
            Ok("one".to_string()),
            Err(ServiceError::Network("down".to_string())),
        ]);
        assert_eq!(generator.generate("a").await.unwrap(), "one");
        assert!(generator.generate("b").await.is_err());
        assert!(generator.generate("c").await.is_err());
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn single_reply_repeats() {
        let generator = MockGenerator::replying("same");
        assert_eq!(generator.generate("x").await.unwrap(), "same");
        assert_eq!(generator.generate("y").await.unwrap(), "same");
    }

    #[tokio::test]
    async fn videos_respect_max_results() {
        let videos = (0..5)
            .map(|i| Video {
                title: format!("v{i}"),
                url: format!("https://www.youtube.com/watch?v={i}"),
                channel: "c".to_string(),
            })
            .collect();
        let search = MockVideos::found(videos);
        assert_eq!(search.search("q", 2).await.unwrap().len(), 2);
        assert_eq!(search.queries(), vec![("q".to_string(), 2)]);
    }

    #[tokio::test]
    async fn translator_tags_code() {
        let t = MockTranslator::tagging();
        assert_eq!(t.translate("hi", Language::Hindi).await.unwrap(), "[hi] hi");
        assert!(MockTranslator::failing().translate("hi", Language::Hindi).await.is_err());
    }
}
