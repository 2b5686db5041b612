use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SearchAIResult;
use crate::models::{OutboundProduct, StoredProduct};

/// Store response to a single-document upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertReceipt {
    /// HTTP-style status reported by the store
    pub status: u16,
    /// Per-document failure messages, populated on partial success
    pub failures: Vec<String>,
}

impl UpsertReceipt {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            failures: Vec::new(),
        }
    }

    pub fn with_failures(mut self, failures: Vec<String>) -> Self {
        self.failures = failures;
        self
    }
}

/// k-nearest-neighbor request against one or more vector fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub fields: Vec<String>,
    pub k: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub document: OutboundProduct,
    pub score: f64,
}

/// Hits in store ranking order. The stream may span several result pages.
pub type SearchHitStream = BoxStream<'static, SearchAIResult<SearchHit>>;

/// Vector index holding product documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndexStore: Send + Sync {
    /// Insert or replace the document keyed by its id.
    async fn upsert(&self, document: &StoredProduct) -> SearchAIResult<UpsertReceipt>;

    /// Run a vector query. An empty index yields an empty stream.
    async fn vector_search(&self, query: &VectorQuery) -> SearchAIResult<SearchHitStream>;

    /// Cheap reachability check used by readiness probes.
    async fn ping(&self) -> SearchAIResult<()>;
}
