//! Search AI Domain Library
//!
//! Turns product records into vector embeddings stored in a managed vector
//! index, and answers free-text queries with a k-nearest-neighbor search over
//! those vectors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   handlers (axum)    │  ← /AddProductToAzureSearchIndex, /SearchByVectorSimilarity
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │   SearchAIService    │  ← SearchPolicy: dimensions, k, vector fields
//! └─────┬──────────┬─────┘
//!       │          │ transformer::to_stored_product
//! ┌─────▼──────┐ ┌─▼────────────────┐
//! │ Embedding  │ │ VectorIndexStore │
//! │ Provider   │ │    (trait)       │
//! └─────┬──────┘ └─┬────────────────┘
//!       │          │
//! ┌─────▼──────────▼─┐
//! │ AzureOpenAI /    │  ← reqwest, bounded retry on transient faults
//! │ AzureSearchIndex │
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_search_ai::{
//!     AzureOpenAIProvider, AzureSearchIndex, InboundProduct, SearchAIService, SearchPolicy,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = SearchAIService::new(
//!     Arc::new(AzureOpenAIProvider::from_env()?),
//!     Arc::new(AzureSearchIndex::from_env()?),
//!     SearchPolicy::from_env()?,
//! )?;
//!
//! let outcome = service
//!     .add_product_to_index(&InboundProduct {
//!         id: "p1".into(),
//!         name: "Red Shoes".into(),
//!         image: "https://cdn.example.com/p1.png".into(),
//!         price: 199.9,
//!         description: "Comfortable running shoes".into(),
//!         product_skus: vec!["1001".into()],
//!     })
//!     .await;
//! assert!(outcome.success);
//!
//! let _matches = service.search_by_vector_similarity("running shoes").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod retry;
pub mod service;
pub mod transformer;

pub use config::SearchPolicy;
pub use embedding::{AzureOpenAIConfig, AzureOpenAIProvider, EmbeddingProvider};
pub use error::{SearchAIError, SearchAIResult};
pub use handlers::{ApiDoc, router};
pub use index::{
    AzureSearchConfig, AzureSearchIndex, SearchHit, SearchHitStream, UpsertReceipt,
    VectorIndexStore, VectorQuery,
};
pub use models::{BaseReturn, InboundProduct, OutboundProduct, SimilarityResult, StoredProduct};
pub use retry::RetryConfig;
pub use service::SearchAIService;
