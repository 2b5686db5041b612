mod azure_openai;
mod provider;

pub use azure_openai::{AzureOpenAIConfig, AzureOpenAIProvider};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
