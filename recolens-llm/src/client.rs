use async_trait::async_trait;
use crate::error::{RecommendationError, Result};
use crate::service::RecommendationService;
use crate::types::{GenerateRequest, GenerateResponse};
use recolens_core::LlmConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP client for the remote text-generation endpoint.
///
/// One POST per call, no retries. The endpoint and model are fixed when the
/// client is built.
pub struct RecommendationClient {
    client: Client,
    api_url: String,
    model: String,
}

impl RecommendationClient {
    /// Build from configuration; `api_url` overrides `config.api_url` when set.
    pub fn new(config: &LlmConfig, api_url: Option<String>) -> Result<Self> {
        let api_url = api_url.unwrap_or_else(|| config.api_url.clone());
        if api_url.trim().is_empty() {
            return Err(RecommendationError::Config("api_url is empty".to_string()));
        }
        Url::parse(&api_url).map_err(|e| {
            RecommendationError::Config(format!("invalid api_url {:?}: {}", api_url, e))
        })?;

        if config.default_model.trim().is_empty() {
            return Err(RecommendationError::Config("default_model is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RecommendationError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            model: config.default_model.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl RecommendationService for RecommendationClient {
    fn name(&self) -> &str {
        &self.api_url
    }

    async fn generate(&self, user_prompt: &str, system_prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            prompt: user_prompt,
            system_prompt,
            model: &self.model,
        };

        debug!(
            "Posting {} prompt chars to {} (model {})",
            user_prompt.len(),
            self.api_url,
            self.model
        );

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", self.api_url, e);
                RecommendationError::Transport(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!("{} answered HTTP {}", self.api_url, status);
            return Err(RecommendationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| RecommendationError::MalformedResponse(e.to_string()))?;

        info!("Received recommendations from {}", self.api_url);
        Ok(parsed.into_text())
    }
}
