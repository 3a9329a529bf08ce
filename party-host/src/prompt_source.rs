use async_trait::async_trait;
use party_core::fallback_prompts;
use party_types::Prompt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Supplies candidate prompts for a match.
///
/// Implementations always resolve: failures are absorbed into the static
/// fallback list rather than surfaced to the scheduler.
#[async_trait]
pub trait PromptSource: Send + Sync {
    async fn fetch_prompts(&self, count: usize) -> Vec<Prompt>;
}

/// Serves the built-in fallback list
#[derive(Debug, Clone, Default)]
pub struct StaticPromptSource;

#[async_trait]
impl PromptSource for StaticPromptSource {
    async fn fetch_prompts(&self, _count: usize) -> Vec<Prompt> {
        fallback_prompts()
    }
}

#[derive(Debug, Error)]
pub enum PromptFetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generator returned status {0}")]
    Status(StatusCode),
    #[error("generator returned no usable prompts")]
    Empty,
}

#[derive(Serialize)]
struct PromptRequest {
    count: usize,
}

#[derive(Deserialize)]
struct PromptBatch {
    prompts: Vec<Prompt>,
}

/// Asks an external generator for a batch: `POST {"count": n}` answered
/// with `{"prompts": [{"word", "category", "difficulty"}]}`
#[derive(Debug, Clone)]
pub struct HttpPromptSource {
    client: Client,
    endpoint: String,
}

impl HttpPromptSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PromptFetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub async fn request(&self, count: usize) -> Result<Vec<Prompt>, PromptFetchError> {
        debug!("Requesting {} prompts from {}", count, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PromptRequest { count })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PromptFetchError::Status(response.status()));
        }

        let batch: PromptBatch = response.json().await?;
        let prompts: Vec<Prompt> = batch
            .prompts
            .into_iter()
            .filter(|p| !p.word.trim().is_empty())
            .collect();
        if prompts.is_empty() {
            return Err(PromptFetchError::Empty);
        }
        Ok(prompts)
    }
}

#[async_trait]
impl PromptSource for HttpPromptSource {
    async fn fetch_prompts(&self, count: usize) -> Vec<Prompt> {
        match self.request(count).await {
            Ok(prompts) => {
                debug!("Generator returned {} prompts", prompts.len());
                prompts
            }
            Err(e) => {
                warn!("Prompt generation failed ({}), using fallback prompts", e);
                fallback_prompts()
            }
        }
    }
}
