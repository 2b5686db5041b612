use async_stream::try_stream;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::config::AzureSearchConfig;
use super::schema::index_definition;
use super::store::{SearchHit, SearchHitStream, UpsertReceipt, VectorIndexStore, VectorQuery};
use crate::error::{SearchAIError, SearchAIResult};
use crate::models::{OutboundProduct, StoredProduct};
use crate::retry::{RetryConfig, retry_transient};

/// Fields returned by similarity queries; vectors are never selected.
const SELECT_FIELDS: &str = "id,name,image,price,productSKUs";

/// Vector index backed by the Azure AI Search REST API
pub struct AzureSearchIndex {
    client: Client,
    config: AzureSearchConfig,
    retry: RetryConfig,
}

impl AzureSearchIndex {
    pub fn new(config: AzureSearchConfig, retry: RetryConfig) -> SearchAIResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchAIError::Config(format!("Azure Search client: {}", e)))?;

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    pub fn from_env() -> SearchAIResult<Self> {
        Self::new(AzureSearchConfig::from_env()?, RetryConfig::from_env()?)
    }

    pub fn config(&self) -> &AzureSearchConfig {
        &self.config
    }

    /// Create the index with [`index_definition`] unless it already exists.
    ///
    /// Returns `true` when the index was created.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn ensure_index(&self, dimensions: u32) -> SearchAIResult<bool> {
        let url = self.config.index_url();

        let response = self
            .client
            .get(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                debug!("Index already exists");
                return Ok(false);
            }
            StatusCode::NOT_FOUND => {}
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(SearchAIError::store_status(status, &body));
            }
        }

        let definition = index_definition(&self.config.index_name, dimensions);
        let response = self
            .client
            .put(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(&definition)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchAIError::store_status(status, &body));
        }

        info!(dimensions, "Created search index");
        Ok(true)
    }

    fn docs_url(&self, operation: &str) -> String {
        format!("{}/docs/{}", self.config.index_url(), operation)
    }

    fn pager(&self) -> SearchPager {
        SearchPager {
            client: self.client.clone(),
            url: self.docs_url("search"),
            api_key: self.config.api_key.clone(),
            api_version: self.config.api_version.clone(),
            retry: self.retry.clone(),
        }
    }

    async fn send_batch(&self, batch: &IndexBatch<'_>) -> SearchAIResult<UpsertReceipt> {
        let response = self
            .client
            .post(self.docs_url("index"))
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(batch)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::MULTI_STATUS => {
                let receipt = UpsertReceipt::new(status.as_u16());
                Ok(receipt.with_failures(failed_documents(&body)))
            }
            _ => Err(SearchAIError::store_status(status, &body)),
        }
    }
}

/// Per-document failures from an indexing response body.
fn failed_documents(body: &str) -> Vec<String> {
    let Ok(result) = serde_json::from_str::<IndexResult>(body) else {
        return Vec::new();
    };

    result
        .value
        .into_iter()
        .filter(|doc| !doc.status)
        .map(|doc| {
            format!(
                "{}: {} ({})",
                doc.key,
                doc.error_message.unwrap_or_else(|| "unknown error".to_string()),
                doc.status_code
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct IndexBatch<'a> {
    value: Vec<IndexAction<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexAction<'a> {
    /// `upload` replaces the whole document, vectors included
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    document: &'a StoredProduct,
}

#[derive(Debug, Deserialize)]
struct IndexResult {
    #[serde(default)]
    value: Vec<IndexingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexingResult {
    key: String,
    status: bool,
    error_message: Option<String>,
    status_code: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    vector_queries: Vec<VectorQueryBody<'a>>,
    select: &'static str,
}

#[derive(Debug, Serialize)]
struct VectorQueryBody<'a> {
    kind: &'static str,
    vector: &'a [f32],
    k: usize,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    value: Vec<RawHit>,
    #[serde(rename = "@search.nextPageParameters")]
    next_page_parameters: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "@search.score")]
    score: f64,
    #[serde(flatten)]
    document: OutboundProduct,
}

/// Owned request context so result pages can be fetched after `vector_search` returns.
#[derive(Clone)]
struct SearchPager {
    client: Client,
    url: String,
    api_key: String,
    api_version: String,
    retry: RetryConfig,
}

impl SearchPager {
    async fn fetch(&self, body: &Value) -> SearchAIResult<SearchPage> {
        retry_transient(|| self.fetch_once(body), &self.retry).await
    }

    async fn fetch_once(&self, body: &Value) -> SearchAIResult<SearchPage> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SearchAIError::store_status(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| SearchAIError::store(format!("malformed search response: {}", e)))
    }
}

#[async_trait]
impl VectorIndexStore for AzureSearchIndex {
    #[instrument(skip(self, document), fields(index = %self.config.index_name, id = %document.id))]
    async fn upsert(&self, document: &StoredProduct) -> SearchAIResult<UpsertReceipt> {
        let batch = IndexBatch {
            value: vec![IndexAction {
                action: "upload",
                document,
            }],
        };

        retry_transient(|| self.send_batch(&batch), &self.retry).await
    }

    #[instrument(skip(self, query), fields(index = %self.config.index_name, k = query.k))]
    async fn vector_search(&self, query: &VectorQuery) -> SearchAIResult<SearchHitStream> {
        let request = SearchRequest {
            vector_queries: vec![VectorQueryBody {
                kind: "vector",
                vector: &query.vector,
                k: query.k,
                fields: query.fields.join(","),
            }],
            select: SELECT_FIELDS,
        };
        let body = serde_json::to_value(&request)?;

        let pager = self.pager();
        // First page eagerly so auth and schema faults surface here.
        let first = pager.fetch(&body).await?;

        let stream: SearchHitStream = Box::pin(try_stream! {
            let mut page = first;
            loop {
                for hit in page.value {
                    yield SearchHit { document: hit.document, score: hit.score };
                }
                match page.next_page_parameters {
                    Some(next) => {
                        debug!("Fetching next result page");
                        page = pager.fetch(&next).await?;
                    }
                    None => break,
                }
            }
        });

        Ok(stream)
    }

    async fn ping(&self) -> SearchAIResult<()> {
        let response = self
            .client
            .get(format!("{}/stats", self.config.index_url()))
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SearchAIError::store_status(status, &body))
        }
    }
}
