//! Index definition for product documents.

use serde_json::{Value, json};

use crate::config::{DESCRIPTION_VECTOR_FIELD, NAME_VECTOR_FIELD};

pub const VECTOR_PROFILE: &str = "product-vector-profile";
const HNSW_ALGORITHM: &str = "product-hnsw";

/// Azure AI Search index schema matching [`StoredProduct`](crate::models::StoredProduct).
///
/// Vectors are `Collection(Edm.Single)` of `dimensions` floats, searched with
/// HNSW under cosine distance. They are not retrievable, so query responses
/// stay small.
pub fn index_definition(index_name: &str, dimensions: u32) -> Value {
    let vector_field = |name: &str| {
        json!({
            "name": name,
            "type": "Collection(Edm.Single)",
            "searchable": true,
            "retrievable": false,
            "dimensions": dimensions,
            "vectorSearchProfile": VECTOR_PROFILE
        })
    };

    json!({
        "name": index_name,
        "fields": [
            { "name": "id", "type": "Edm.String", "key": true, "filterable": true },
            { "name": "name", "type": "Edm.String", "searchable": true },
            { "name": "image", "type": "Edm.String", "searchable": false },
            { "name": "price", "type": "Edm.Double", "filterable": true, "sortable": true },
            { "name": "productSKUs", "type": "Collection(Edm.String)", "filterable": true },
            vector_field(NAME_VECTOR_FIELD),
            vector_field(DESCRIPTION_VECTOR_FIELD)
        ],
        "vectorSearch": {
            "algorithms": [
                {
                    "name": HNSW_ALGORITHM,
                    "kind": "hnsw",
                    "hnswParameters": { "metric": "cosine", "m": 4, "efConstruction": 400, "efSearch": 500 }
                }
            ],
            "profiles": [
                { "name": VECTOR_PROFILE, "algorithm": HNSW_ALGORITHM }
            ]
        }
    })
}
