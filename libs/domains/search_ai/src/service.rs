//! Search AI Service - indexing and similarity query orchestration

use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::SearchPolicy;
use crate::embedding::EmbeddingProvider;
use crate::error::{SearchAIError, SearchAIResult};
use crate::index::{UpsertReceipt, VectorIndexStore, VectorQuery};
use crate::models::{BaseReturn, InboundProduct, SimilarityResult};
use crate::transformer::to_stored_product;

pub const INSERT_SUCCESS_MESSAGE: &str = "Product inserted successfully.";
pub const INSERT_FAILURE_MESSAGE: &str = "Error inserting product.";

/// Orchestrates the embedding provider and the vector index.
///
/// Stateless per request; clones share the same upstream clients.
#[derive(Clone)]
pub struct SearchAIService {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexStore>,
    policy: SearchPolicy,
}

impl SearchAIService {
    /// Fails when `policy` does not validate.
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexStore>,
        policy: SearchPolicy,
    ) -> SearchAIResult<Self> {
        policy.validate()?;
        Ok(Self {
            embeddings,
            index,
            policy,
        })
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Embed `text`, rejecting vectors of the wrong length.
    async fn embed(&self, text: &str) -> SearchAIResult<Vec<f32>> {
        let expected = self.policy.embedding_dimensions;
        let vector = self.embeddings.embed(text, expected).await?;

        if vector.len() != expected as usize {
            return Err(SearchAIError::provider(format!(
                "expected {} dimensions, got {}",
                expected,
                vector.len()
            )));
        }
        Ok(vector)
    }

    /// Embed and upsert one product.
    ///
    /// A store status other than 200/201 is reported as an unsuccessful
    /// [`BaseReturn`]; provider, store and transport faults are returned as errors.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn index_product(&self, product: &InboundProduct) -> SearchAIResult<BaseReturn> {
        let (name_vector, description_vector) =
            tokio::try_join!(self.embed(&product.name), self.embed(&product.description))?;

        let document = to_stored_product(product, name_vector, description_vector);
        let receipt = self.index.upsert(&document).await?;

        Ok(classify_receipt(&receipt))
    }

    /// [`index_product`](Self::index_product) with every error folded into the envelope.
    pub async fn add_product_to_index(&self, product: &InboundProduct) -> BaseReturn {
        match self.index_product(product).await {
            Ok(outcome) => {
                if outcome.success {
                    info!(product_id = %product.id, "Product indexed");
                } else {
                    warn!(product_id = %product.id, message = %outcome.message, "Product not indexed");
                }
                outcome
            }
            Err(e) => {
                warn!(product_id = %product.id, error = %e, "Indexing failed");
                BaseReturn::failure(format!("Error inserting product: {}", e))
            }
        }
    }

    /// Embed `query` and return the k nearest products in store order.
    ///
    /// An empty index yields an empty list.
    #[instrument(skip(self, query), fields(query_len = query.len(), hits = tracing::field::Empty))]
    pub async fn search_by_vector_similarity(
        &self,
        query: &str,
    ) -> SearchAIResult<Vec<SimilarityResult>> {
        let vector = self.embed(query).await?;

        let request = VectorQuery {
            vector,
            fields: self.policy.vector_fields.clone(),
            k: self.policy.neighbors,
        };

        let hits: Vec<_> = self.index.vector_search(&request).await?.try_collect().await?;

        tracing::Span::current().record("hits", hits.len());

        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| SimilarityResult {
                document: hit.document,
                score: hit.score,
                rank: i + 1,
            })
            .collect())
    }

    /// Readiness of the underlying index.
    pub async fn check_index(&self) -> SearchAIResult<()> {
        self.index.ping().await
    }
}

fn classify_receipt(receipt: &UpsertReceipt) -> BaseReturn {
    match receipt.status {
        200 | 201 => BaseReturn::ok(INSERT_SUCCESS_MESSAGE),
        status if receipt.failures.is_empty() => {
            BaseReturn::failure(format!("{} (status {})", INSERT_FAILURE_MESSAGE, status))
        }
        status => BaseReturn::failure(format!(
            "{} (status {}: {})",
            INSERT_FAILURE_MESSAGE,
            status,
            receipt.failures.join("; ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::index::{MockVectorIndexStore, SearchHit};
    use crate::models::OutboundProduct;
    use futures::{StreamExt, stream};

    const DIMS: u32 = 4;

    fn policy() -> SearchPolicy {
        SearchPolicy::new().with_dimensions(DIMS)
    }

    fn product() -> InboundProduct {
        InboundProduct {
            id: "p1".into(),
            name: "Red Shoes".into(),
            image: "u".into(),
            price: 199.9,
            description: "Comfortable running shoes".into(),
            product_skus: vec!["1001".into()],
        }
    }

    fn hit(id: &str, score: f64) -> SearchHit {
        SearchHit {
            document: OutboundProduct {
                id: id.into(),
                name: id.into(),
                image: "u".into(),
                price: 1.0,
                product_skus: vec![],
            },
            score,
        }
    }

    fn embeddings_of_len(len: usize) -> MockEmbeddingProvider {
        let mut embeddings = MockEmbeddingProvider::new();
        embeddings
            .expect_embed()
            .returning(move |_, _| Ok(vec![0.5; len]));
        embeddings
    }

    fn service(embeddings: MockEmbeddingProvider, index: MockVectorIndexStore) -> SearchAIService {
        SearchAIService::new(Arc::new(embeddings), Arc::new(index), policy()).unwrap()
    }

    #[tokio::test]
    async fn test_index_product_success() {
        let mut index = MockVectorIndexStore::new();
        index
            .expect_upsert()
            .times(1)
            .returning(|doc| {
                assert_eq!(doc.id, "p1");
                assert_eq!(doc.product_name_vector.len(), DIMS as usize);
                assert_eq!(doc.product_description_vector.len(), DIMS as usize);
                Ok(UpsertReceipt::new(200))
            });

        let outcome = service(embeddings_of_len(DIMS as usize), index)
            .add_product_to_index(&product())
            .await;

        assert_eq!(outcome, BaseReturn::ok("Product inserted successfully."));
    }

    #[tokio::test]
    async fn test_created_status_is_success() {
        let mut index = MockVectorIndexStore::new();
        index
            .expect_upsert()
            .returning(|_| Ok(UpsertReceipt::new(201)));

        let outcome = service(embeddings_of_len(DIMS as usize), index)
            .add_product_to_index(&product())
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_failure() {
        let mut index = MockVectorIndexStore::new();
        index
            .expect_upsert()
            .returning(|_| Ok(UpsertReceipt::new(429)));

        let outcome = service(embeddings_of_len(DIMS as usize), index)
            .add_product_to_index(&product())
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Error inserting product. (status 429)");
    }

    #[tokio::test]
    async fn test_partial_failure_reports_document_errors() {
        let mut index = MockVectorIndexStore::new();
        index.expect_upsert().returning(|_| {
            Ok(UpsertReceipt::new(207).with_failures(vec!["p1: bad vector (400)".into()]))
        });

        let outcome = service(embeddings_of_len(DIMS as usize), index)
            .add_product_to_index(&product())
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("p1: bad vector (400)"));
    }

    #[tokio::test]
    async fn test_provider_fault_becomes_failure_envelope() {
        let mut embeddings = MockEmbeddingProvider::new();
        embeddings
            .expect_embed()
            .returning(|_, _| Err(SearchAIError::provider("quota exceeded")));
        let mut index = MockVectorIndexStore::new();
        index.expect_upsert().never();

        let outcome = service(embeddings, index)
            .add_product_to_index(&product())
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Error inserting product: "));
        assert!(outcome.message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_provider_error_and_nothing_written() {
        let mut index = MockVectorIndexStore::new();
        index.expect_upsert().never();

        let err = service(embeddings_of_len(3), index)
            .index_product(&product())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchAIError::Provider { .. }));
        assert!(err.to_string().contains("expected 4 dimensions, got 3"));
    }

    #[tokio::test]
    async fn test_search_assigns_ranks_in_store_order() {
        let mut index = MockVectorIndexStore::new();
        index.expect_vector_search().times(1).returning(|query| {
            assert_eq!(query.k, 2);
            assert_eq!(
                query.fields,
                vec!["productNameVector", "productDescriptionVector"]
            );
            assert_eq!(query.vector.len(), DIMS as usize);
            Ok(stream::iter(vec![Ok(hit("p1", 0.9)), Ok(hit("p2", 0.4))]).boxed())
        });

        let results = service(embeddings_of_len(DIMS as usize), index)
            .search_by_vector_similarity("running shoes")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.id, "p1");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].document.id, "p2");
        assert_eq!(results[1].rank, 2);
        assert_eq!(results[1].score, 0.4);
    }

    #[tokio::test]
    async fn test_search_on_empty_index_is_empty() {
        let mut index = MockVectorIndexStore::new();
        index
            .expect_vector_search()
            .returning(|_| Ok(stream::empty().boxed()));

        let results = service(embeddings_of_len(DIMS as usize), index)
            .search_by_vector_similarity("")
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_propagates_mid_stream_errors() {
        let mut index = MockVectorIndexStore::new();
        index.expect_vector_search().returning(|_| {
            Ok(stream::iter(vec![
                Ok(hit("p1", 0.9)),
                Err(SearchAIError::store("page 2 failed")),
            ])
            .boxed())
        });

        let err = service(embeddings_of_len(DIMS as usize), index)
            .search_by_vector_similarity("shoes")
            .await
            .unwrap_err();

        assert!(matches!(err, SearchAIError::Store { .. }));
    }

    #[tokio::test]
    async fn test_search_provider_error_is_returned() {
        let mut embeddings = MockEmbeddingProvider::new();
        embeddings
            .expect_embed()
            .returning(|_, _| Err(SearchAIError::provider_status(
                reqwest::StatusCode::UNAUTHORIZED,
                "invalid key",
            )));
        let mut index = MockVectorIndexStore::new();
        index.expect_vector_search().never();

        let err = service(embeddings, index)
            .search_by_vector_similarity("shoes")
            .await
            .unwrap_err();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_new_rejects_invalid_policy() {
        let result = SearchAIService::new(
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(MockVectorIndexStore::new()),
            SearchPolicy::new().with_neighbors(0),
        );
        assert!(matches!(result, Err(SearchAIError::Config(_))));
    }
}
