mod azure_search;
mod config;
mod schema;
mod store;

pub use azure_search::AzureSearchIndex;
pub use config::AzureSearchConfig;
pub use schema::{VECTOR_PROFILE, index_definition};
pub use store::{SearchHit, SearchHitStream, UpsertReceipt, VectorIndexStore, VectorQuery};

#[cfg(test)]
pub use store::MockVectorIndexStore;
