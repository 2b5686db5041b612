use async_trait::async_trait;
use core_config::{env_or_default, env_parse_or, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

use super::EmbeddingProvider;
use crate::error::{SearchAIError, SearchAIResult};
use crate::retry::{RetryConfig, retry_transient};

pub const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-3-large";
pub const DEFAULT_OPENAI_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI embedding deployment settings
#[derive(Debug, Clone)]
pub struct AzureOpenAIConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl AzureOpenAIConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: DEFAULT_EMBEDDING_DEPLOYMENT.to_string(),
            api_version: DEFAULT_OPENAI_API_VERSION.to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn from_env() -> SearchAIResult<Self> {
        let endpoint = env_required("OPENAI_ENDPOINT")?;
        let api_key = env_required("OPENAI_KEY")?;

        Ok(Self::new(endpoint, api_key)
            .with_deployment(env_or_default(
                "OPENAI_EMBEDDING_DEPLOYMENT",
                DEFAULT_EMBEDDING_DEPLOYMENT,
            ))
            .with_api_version(env_or_default(
                "OPENAI_API_VERSION",
                DEFAULT_OPENAI_API_VERSION,
            ))
            .with_timeout(env_parse_or("OPENAI_TIMEOUT_SECS", 30)?))
    }

    fn embeddings_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        )
    }
}

/// Embedding provider backed by an Azure OpenAI deployment
pub struct AzureOpenAIProvider {
    client: Client,
    config: AzureOpenAIConfig,
    retry: RetryConfig,
}

impl AzureOpenAIProvider {
    pub fn new(config: AzureOpenAIConfig, retry: RetryConfig) -> SearchAIResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchAIError::Config(format!("Azure OpenAI client: {}", e)))?;

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    pub fn from_env() -> SearchAIResult<Self> {
        Self::new(AzureOpenAIConfig::from_env()?, RetryConfig::from_env()?)
    }

    async fn request_embedding(&self, request: &EmbeddingRequest<'_>) -> SearchAIResult<Vec<f32>> {
        let response = self
            .client
            .post(self.config.embeddings_url())
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchAIError::provider_status(status, &body));
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| SearchAIError::provider(format!("malformed embedding response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| SearchAIError::provider("no embedding returned"))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    dimensions: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for AzureOpenAIProvider {
    #[instrument(skip(self, text), fields(deployment = %self.config.deployment, text_len = text.len()))]
    async fn embed(&self, text: &str, dimensions: u32) -> SearchAIResult<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            dimensions,
        };

        retry_transient(|| self.request_embedding(&request), &self.retry).await
    }
}
