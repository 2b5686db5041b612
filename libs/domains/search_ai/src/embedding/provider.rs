use async_trait::async_trait;

use crate::error::SearchAIResult;

/// Turns text into a fixed-length embedding vector.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` into exactly `dimensions` floats.
    async fn embed(&self, text: &str, dimensions: u32) -> SearchAIResult<Vec<f32>>;
}
