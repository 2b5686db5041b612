use core_config::{env_or_default, env_parse_or};

use crate::error::{SearchAIError, SearchAIResult};

pub const DEFAULT_EMBEDDING_DIMENSIONS: u32 = 1024;
pub const DEFAULT_NEIGHBORS: usize = 2;
pub const NAME_VECTOR_FIELD: &str = "productNameVector";
pub const DESCRIPTION_VECTOR_FIELD: &str = "productDescriptionVector";

/// Retrieval policy shared by indexing and querying.
///
/// Indexing and querying must agree on `embedding_dimensions`, so both read it
/// from the same policy.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPolicy {
    pub embedding_dimensions: u32,
    /// k for the nearest-neighbor query
    pub neighbors: usize,
    pub vector_fields: Vec<String>,
}

impl SearchPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.embedding_dimensions = dimensions;
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Replace the searched fields. Names are trimmed, blanks dropped and
    /// duplicates removed, keeping first-seen order.
    pub fn with_vector_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for field in fields {
            let field = field.as_ref().trim();
            if !field.is_empty() && !normalized.iter().any(|f| f == field) {
                normalized.push(field.to_string());
            }
        }
        self.vector_fields = normalized;
        self
    }

    pub fn validate(&self) -> SearchAIResult<()> {
        if self.embedding_dimensions == 0 {
            return Err(SearchAIError::Config(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }
        if self.neighbors == 0 {
            return Err(SearchAIError::Config(
                "neighbor count must be greater than zero".to_string(),
            ));
        }
        if self.vector_fields.is_empty() {
            return Err(SearchAIError::Config(
                "at least one vector field must be searched".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads `EMBEDDING_DIMENSIONS`, `SEARCH_NEIGHBORS` and the comma-separated
    /// `SEARCH_VECTOR_FIELDS`, then validates the result.
    pub fn from_env() -> SearchAIResult<Self> {
        let dimensions = env_parse_or("EMBEDDING_DIMENSIONS", DEFAULT_EMBEDDING_DIMENSIONS)?;
        let neighbors = env_parse_or("SEARCH_NEIGHBORS", DEFAULT_NEIGHBORS)?;
        let fields = env_or_default(
            "SEARCH_VECTOR_FIELDS",
            &format!("{},{}", NAME_VECTOR_FIELD, DESCRIPTION_VECTOR_FIELD),
        );

        let policy = Self::new()
            .with_dimensions(dimensions)
            .with_neighbors(neighbors)
            .with_vector_fields(fields.split(','));
        policy.validate()?;
        Ok(policy)
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            neighbors: DEFAULT_NEIGHBORS,
            vector_fields: vec![
                NAME_VECTOR_FIELD.to_string(),
                DESCRIPTION_VECTOR_FIELD.to_string(),
            ],
        }
    }
}
