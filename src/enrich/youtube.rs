use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{ServiceError, Video, VideoSearch};
use crate::keys::{KeyStore, Provider};

const API_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
/// Appended to every query to bias results toward travel vlogs.
const QUERY_SUFFIX: &str = "travel vlog";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Video search via the YouTube Data API v3.
pub struct YouTubeSearch {
    client: Client,
    keys: Arc<KeyStore>,
    api_url: String,
}

impl YouTubeSearch {
    pub fn new(keys: Arc<KeyStore>) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            keys,
            api_url: API_URL.to_string(),
        })
    }

    /// Point at a different endpoint (gateways, local fakes).
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    fn search_url(&self, query: &str, max_results: usize) -> Result<Url, ServiceError> {
        let q = format!("{query} {QUERY_SUFFIX}");
        let max = max_results.to_string();
        Url::parse_with_params(
            &self.api_url,
            &[
                ("part", "snippet"),
                ("q", q.as_str()),
                ("maxResults", max.as_str()),
                ("type", "video"),
                ("relevanceLanguage", "en"),
            ],
        )
        .map_err(|e| ServiceError::InvalidResponse(format!("bad search url: {e}")))
    }

    fn parse_response(body: &str) -> Result<Vec<Video>, ServiceError> {
        let resp: SearchResponse = serde_json::from_str(body)
            .map_err(|e| ServiceError::InvalidResponse(format!("{e}: {body}")))?;

        Ok(resp
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                Some(Video {
                    title: item.snippet.title,
                    url: format!("{WATCH_URL}{id}"),
                    channel: item.snippet.channel_title,
                })
            })
            .collect())
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Video>, ServiceError> {
        let key = self
            .keys
            .api_key(Provider::YouTube)
            .map_err(|e| ServiceError::MissingCredentials(e.to_string()))?
            .ok_or_else(|| ServiceError::MissingCredentials("youtube".to_string()))?;

        let url = self.search_url(query, max_results)?;
        let resp = self
            .client
            .get(url)
            .header("x-goog-api-key", key)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Http {
                service: "youtube".to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let videos = Self::parse_response(&body)?;
        tracing::debug!(query, found = videos.len(), "video search done");
        Ok(videos)
    }
}

// --- API types ---

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    channel_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNREACHABLE: &str = "http://127.0.0.1:1/youtube/v3/search";

    fn search() -> YouTubeSearch {
        YouTubeSearch::new(Arc::new(KeyStore::open(":memory:").unwrap())).unwrap()
    }

    fn search_with_key(key: &str) -> YouTubeSearch {
        let keys = KeyStore::open(":memory:").unwrap();
        keys.set(Provider::YouTube, key).unwrap();
        YouTubeSearch::new(Arc::new(keys)).unwrap()
    }

    #[tokio::test]
    async fn quota_error_is_http() {
        let base = crate::enrich::stub_server(403, r#"{"error": {"message": "quotaExceeded"}}"#).await;
        let err = search_with_key("yt-secret-4821")
            .with_api_url(&format!("{base}/youtube/v3/search"))
            .search("Calm", 2)
            .await
            .unwrap_err();
        match err {
            ServiceError::Http { service, status, message } => {
                assert_eq!(service, "youtube");
                assert_eq!(status, 403);
                assert!(message.contains("quotaExceeded"));
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_end_to_end() {
        let base = crate::enrich::stub_server(
            200,
            r#"{"items": [{"id": {"videoId": "v1"}, "snippet": {"title": "Kerala backwaters", "channelTitle": "Drift"}}]}"#,
        )
        .await;
        let videos = search_with_key("k")
            .with_api_url(&base)
            .search("Calm", 1)
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=v1");
    }

    #[tokio::test]
    async fn no_key_is_missing_credentials() {
        if std::env::var(Provider::YouTube.env_var()).is_ok_and(|k| !k.is_empty()) {
            return;
        }
        let err = search()
            .with_api_url(UNREACHABLE)
            .search("Happy", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn network_failure_keeps_key_out_of_error() {
        let err = search_with_key("yt-secret-4821")
            .with_api_url(UNREACHABLE)
            .search("Happy travel and food", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)), "got {err:?}");
        assert!(!err.to_string().contains("yt-secret-4821"), "{err}");
    }

    #[test]
    fn url_carries_all_params() {
        let url = search().search_url("Happy travel and food", 3).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "Happy travel and food travel vlog".to_string())));
        assert!(pairs.contains(&("maxResults".to_string(), "3".to_string())));
        assert!(pairs.contains(&("type".to_string(), "video".to_string())));
        assert!(pairs.contains(&("relevanceLanguage".to_string(), "en".to_string())));
        assert!(pairs.iter().all(|(k, _)| k != "key"));
        assert!(url.as_str().starts_with(API_URL));
    }

    #[test]
    fn parse_builds_watch_urls() {
        let body = r#"{
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "abc123"},
                 "snippet": {"title": "Goa in 4 days", "channelTitle": "Nomad"}},
                {"id": {"kind": "youtube#channel", "channelId": "xyz"},
                 "snippet": {"title": "A channel", "channelTitle": "Nomad"}}
            ]
        }"#;
        let videos = YouTubeSearch::parse_response(body).unwrap();
        assert_eq!(
            videos,
            vec![Video {
                title: "Goa in 4 days".to_string(),
                url: "https://www.youtube.com/watch?v=abc123".to_string(),
                channel: "Nomad".to_string(),
            }]
        );
    }

    #[test]
    fn parse_missing_items_is_empty() {
        assert!(YouTubeSearch::parse_response("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(YouTubeSearch::parse_response("<html>").is_err());
    }
}
