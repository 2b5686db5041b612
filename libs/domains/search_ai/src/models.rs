use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Product as submitted by callers for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundProduct {
    #[schema(example = "p1")]
    pub id: String,
    #[schema(example = "Red Shoes")]
    pub name: String,
    #[schema(example = "https://cdn.example.com/p1.png")]
    pub image: String,
    #[schema(example = 199.9)]
    pub price: f64,
    #[schema(example = "Comfortable running shoes")]
    pub description: String,
    #[serde(rename = "productSKUs", default)]
    #[schema(example = json!(["1001", "1002"]))]
    pub product_skus: Vec<String>,
}

/// Document persisted in the vector index.
///
/// Both vectors always carry the configured dimensionality. The description
/// text itself is not stored, only its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    #[serde(rename = "productSKUs")]
    pub product_skus: Vec<String>,
    pub product_name_vector: Vec<f32>,
    pub product_description_vector: Vec<f32>,
}

/// Product projection returned by similarity queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutboundProduct {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    #[serde(
        rename = "productSKUs",
        default,
        deserialize_with = "deserialize_numeric_skus"
    )]
    #[schema(example = json!([1001, 1002]))]
    pub product_skus: Vec<i64>,
}

/// One ranked match from a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarityResult {
    pub document: OutboundProduct,
    /// Store-assigned relevance; higher is closer
    pub score: f64,
    /// 1-based position in the store's ranking
    pub rank: usize,
}

/// Outcome envelope for indexing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BaseReturn {
    pub success: bool,
    pub message: String,
}

impl BaseReturn {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Query-string parameters for similarity search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimilarityParams {
    /// Free-text query. `textoConsulta` is accepted as an alias.
    #[serde(alias = "textoConsulta")]
    pub query: Option<String>,
}

/// JSON body alternative to the `query` parameter.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SimilarityRequest {
    #[schema(example = "running shoes")]
    pub query: String,
}

/// SKUs are stored as strings; entries that are not integers are skipped.
fn deserialize_numeric_skus<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sku {
        Number(i64),
        Text(String),
        Other(serde_json::Value),
    }

    let raw: Option<Vec<Sku>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|sku| match sku {
            Sku::Number(n) => Some(n),
            Sku::Text(s) => match s.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!(sku = %s, "Dropping non-numeric SKU from response");
                    None
                }
            },
            Sku::Other(v) => {
                tracing::warn!(sku = %v, "Dropping non-numeric SKU from response");
                None
            }
        })
        .collect())
}
