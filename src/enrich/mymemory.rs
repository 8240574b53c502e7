use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use super::{ServiceError, Translator};
use crate::language::Language;

const API_URL: &str = "https://api.mymemory.translated.net/get";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Translation via the free MyMemory API. No key required.
pub struct MyMemoryTranslator {
    client: Client,
    api_url: String,
}

impl MyMemoryTranslator {
    pub fn new() -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: API_URL.to_string(),
        })
    }

    /// Point at a different endpoint (mirrors, local fakes).
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    fn request_url(&self, text: &str, target: Language) -> Result<Url, ServiceError> {
        let pair = format!("{}|{}", Language::English.code(), target.code());
        Url::parse_with_params(&self.api_url, &[("q", text), ("langpair", pair.as_str())])
            .map_err(|e| ServiceError::InvalidResponse(format!("bad translation url: {e}")))
    }

    fn parse_response(body: &str) -> Result<String, ServiceError> {
        let resp: ApiResponse = serde_json::from_str(body)
            .map_err(|e| ServiceError::InvalidResponse(format!("{e}: {body}")))?;

        // the status is sometimes a number, sometimes a string
        let status = match &resp.response_status {
            serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
            serde_json::Value::String(s) => s.parse().unwrap_or(0),
            _ => 0,
        };
        if status != 200 {
            return Err(ServiceError::Http {
                service: "mymemory".to_string(),
                status: u16::try_from(status).unwrap_or(0),
                message: resp.response_details.unwrap_or_default(),
            });
        }

        let text = resp.response_data.translated_text;
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidResponse("empty translation".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        if target.is_base() || text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let url = self.request_url(text, target)?;
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Http {
                service: "mymemory".to_string(),
                status: status.as_u16(),
                message: body,
            });
        }
        Self::parse_response(&body)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    response_data: ResponseData,
    #[serde(default)]
    response_status: serde_json::Value,
    response_details: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: String,
}
