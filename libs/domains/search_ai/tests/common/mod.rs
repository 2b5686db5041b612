//! Deterministic in-memory stand-ins for the embedding provider and vector index.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_search_ai::{
    EmbeddingProvider, InboundProduct, OutboundProduct, SearchAIError, SearchAIResult,
    SearchAIService, SearchHit, SearchHitStream, SearchPolicy, StoredProduct, UpsertReceipt,
    VectorIndexStore, VectorQuery,
};
use futures::{StreamExt, stream};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_DIMENSIONS: u32 = 256;

/// Bag-of-words embedding: each lowercase token bumps one hashed slot, then
/// the vector is L2-normalized. Texts sharing words end up close.
pub struct HashingEmbeddingProvider {
    pub calls: AtomicUsize,
}

impl HashingEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

pub fn hashed_embedding(text: &str, dimensions: u32) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions as usize];
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.to_lowercase().hash(&mut hasher);
        vector[(hasher.finish() % dimensions as u64) as usize] += 1.0;
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str, dimensions: u32) -> SearchAIResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hashed_embedding(text, dimensions))
    }
}

/// Always fails with a provider error carrying `message`.
pub struct FailingEmbeddingProvider {
    pub message: String,
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str, _dimensions: u32) -> SearchAIResult<Vec<f32>> {
        Err(SearchAIError::provider(self.message.clone()))
    }
}

/// Returns vectors of a fixed, possibly wrong, length.
pub struct FixedLengthEmbeddingProvider {
    pub length: usize,
}

#[async_trait]
impl EmbeddingProvider for FixedLengthEmbeddingProvider {
    async fn embed(&self, _text: &str, _dimensions: u32) -> SearchAIResult<Vec<f32>> {
        Ok(vec![0.1; self.length])
    }
}

/// Exact k-NN over stored documents, scoring each by its best matching field.
pub struct InMemoryIndex {
    documents: Mutex<Vec<StoredProduct>>,
    upsert_status: u16,
    pub upserts: AtomicUsize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::with_upsert_status(200)
    }

    /// Report `status` for every upsert; documents are only kept on 200/201.
    pub fn with_upsert_status(status: u16) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            upsert_status: status,
            upserts: AtomicUsize::new(0),
        }
    }

    pub fn documents(&self) -> Vec<StoredProduct> {
        self.documents.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<StoredProduct> {
        self.documents().into_iter().find(|d| d.id == id)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

fn field_vector<'a>(document: &'a StoredProduct, field: &str) -> Option<&'a [f32]> {
    match field {
        "productNameVector" => Some(&document.product_name_vector),
        "productDescriptionVector" => Some(&document.product_description_vector),
        _ => None,
    }
}

fn to_outbound(document: &StoredProduct) -> OutboundProduct {
    OutboundProduct {
        id: document.id.clone(),
        name: document.name.clone(),
        image: document.image.clone(),
        price: document.price,
        product_skus: document
            .product_skus
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect(),
    }
}

#[async_trait]
impl VectorIndexStore for InMemoryIndex {
    async fn upsert(&self, document: &StoredProduct) -> SearchAIResult<UpsertReceipt> {
        self.upserts.fetch_add(1, Ordering::SeqCst);

        if matches!(self.upsert_status, 200 | 201) {
            let mut documents = self.documents.lock().unwrap();
            documents.retain(|d| d.id != document.id);
            documents.push(document.clone());
        }
        Ok(UpsertReceipt::new(self.upsert_status))
    }

    async fn vector_search(&self, query: &VectorQuery) -> SearchAIResult<SearchHitStream> {
        let mut scored: Vec<SearchHit> = self
            .documents()
            .iter()
            .map(|document| {
                let score = query
                    .fields
                    .iter()
                    .filter_map(|field| field_vector(document, field))
                    .map(|vector| cosine(&query.vector, vector))
                    .fold(0.0, f64::max);
                SearchHit {
                    document: to_outbound(document),
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(query.k);

        Ok(stream::iter(scored.into_iter().map(Ok)).boxed())
    }

    async fn ping(&self) -> SearchAIResult<()> {
        Ok(())
    }
}

/// Index that is unreachable.
pub struct UnavailableIndex;

#[async_trait]
impl VectorIndexStore for UnavailableIndex {
    async fn upsert(&self, _document: &StoredProduct) -> SearchAIResult<UpsertReceipt> {
        Err(unavailable())
    }

    async fn vector_search(&self, _query: &VectorQuery) -> SearchAIResult<SearchHitStream> {
        Err(unavailable())
    }

    async fn ping(&self) -> SearchAIResult<()> {
        Err(unavailable())
    }
}

fn unavailable() -> SearchAIError {
    SearchAIError::Store {
        message: "(503 Service Unavailable) index offline".to_string(),
        transient: true,
    }
}

pub fn test_policy() -> SearchPolicy {
    SearchPolicy::new().with_dimensions(TEST_DIMENSIONS)
}

pub fn service_with(
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexStore>,
) -> SearchAIService {
    SearchAIService::new(embeddings, index, test_policy()).unwrap()
}

pub fn red_shoes() -> InboundProduct {
    InboundProduct {
        id: "p1".to_string(),
        name: "Red Shoes".to_string(),
        image: "u".to_string(),
        price: 10.0,
        description: "running shoes".to_string(),
        product_skus: vec!["A1".to_string()],
    }
}

pub fn wool_hat() -> InboundProduct {
    InboundProduct {
        id: "p2".to_string(),
        name: "Blue Hat".to_string(),
        image: "https://cdn.example.com/p2.png".to_string(),
        price: 25.5,
        description: "Warm wool hat for winter".to_string(),
        product_skus: vec!["2001".to_string(), "2002".to_string()],
    }
}

pub fn garden_hose() -> InboundProduct {
    InboundProduct {
        id: "p3".to_string(),
        name: "Garden Hose".to_string(),
        image: "https://cdn.example.com/p3.png".to_string(),
        price: 40.0,
        description: "Flexible hose with brass fittings".to_string(),
        product_skus: vec!["3001".to_string()],
    }
}
