use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::llm::traits::FallbackClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};
use url::Url;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the hosted Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    request_timeout: Duration,
}

impl GeminiClient {
    /// Builds a client from configuration.
    ///
    /// Fails with `AppError::Config` when no API key is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))?
            .to_string();

        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        ))?;

        info!("Gemini client configured for model {}", config.model);
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
            model: config.model.clone(),
            request_timeout: config.timeout,
        })
    }
}

#[async_trait]
impl FallbackClient for GeminiClient {
    async fn generate(&self, prompt: String) -> Result<String, AppError> {
        info!("Gemini {} generating for prompt ({} chars)", self.model, prompt.len());

        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let request_future = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send();

        let res = timeout(self.request_timeout, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Gemini request failed with status {}", status);
            return Err(AppError::Llm(format!(
                "Gemini request failed with status {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Unreadable Gemini response: {}", e)))?;

        Ok(body.text())
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate; empty when the model returned none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
