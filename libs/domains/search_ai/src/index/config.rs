use core_config::{env_or_default, env_parse_or, env_required};

use crate::error::SearchAIResult;

pub const DEFAULT_SEARCH_API_VERSION: &str = "2024-07-01";

/// Azure AI Search connection settings
#[derive(Debug, Clone)]
pub struct AzureSearchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
    pub api_version: String,
    pub timeout_secs: u64,
    /// Create the index at startup when it does not exist
    pub create_index: bool,
}

impl AzureSearchConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            index_name: index_name.into(),
            api_version: DEFAULT_SEARCH_API_VERSION.to_string(),
            timeout_secs: 30,
            create_index: false,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_create_index(mut self, create_index: bool) -> Self {
        self.create_index = create_index;
        self
    }

    pub fn from_env() -> SearchAIResult<Self> {
        let endpoint = env_required("AZURE_SEARCH_ENDPOINT")?;
        let api_key = env_required("AZURE_SEARCH_KEY")?;
        let index_name = env_required("AZURE_SEARCH_INDEX_NAME")?;

        Ok(Self::new(endpoint, api_key, index_name)
            .with_api_version(env_or_default(
                "AZURE_SEARCH_API_VERSION",
                DEFAULT_SEARCH_API_VERSION,
            ))
            .with_timeout(env_parse_or("AZURE_SEARCH_TIMEOUT_SECS", 30)?)
            .with_create_index(env_parse_or("AZURE_SEARCH_CREATE_INDEX", false)?))
    }

    pub(crate) fn index_url(&self) -> String {
        format!(
            "{}/indexes/{}",
            self.endpoint.trim_end_matches('/'),
            self.index_name
        )
    }
}
