use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{ServiceError, TextGenerator};
use crate::consts::DEFAULT_MODEL;
use crate::keys::{KeyStore, Provider};
use crate::prompts::build_travel_system_prompt;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;
const MAX_OUTPUT_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A text generator backed by the Gemini `generateContent` API.
pub struct GeminiGenerator {
    client: Client,
    model: String,
    keys: Arc<KeyStore>,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(model: Option<String>, keys: Arc<KeyStore>) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            keys,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point at a different endpoint (gateways, local fakes).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(prompt: &str) -> ApiRequest {
        ApiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: build_travel_system_prompt(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn parse_response(body: &str) -> Result<String, ServiceError> {
        let resp: ApiResponse = serde_json::from_str(body)
            .map_err(|e| ServiceError::InvalidResponse(format!("{e}: {body}")))?;

        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("no candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(ServiceError::InvalidResponse(format!(
                "empty response (finish reason: {reason})"
            )));
        }
        Ok(text)
    }

    fn classify_error(status: u16, body: &str) -> ServiceError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        let message = match status {
            400 => format!("invalid request: {message}"),
            401 | 403 => format!("authentication failed: {message}"),
            429 => format!("rate limit exceeded: {message}"),
            500..=599 => format!("server error: {message}"),
            _ => message,
        };
        ServiceError::Http {
            service: "gemini".to_string(),
            status,
            message,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let api_key = self
            .keys
            .api_key(Provider::Gemini)
            .map_err(|e| ServiceError::MissingCredentials(e.to_string()))?
            .ok_or_else(|| {
                ServiceError::MissingCredentials(format!(
                    "gemini. Run `/key gemini <key>` or set {}",
                    Provider::Gemini.env_var()
                ))
            })?;

        let body = Self::build_request(prompt);
        tracing::debug!(model = %self.model, "requesting generation");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(Self::classify_error(status.as_u16(), &text));
        }

        Self::parse_response(&text)
    }
}

// --- API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
