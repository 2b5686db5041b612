//! Inbound product to index document mapping.

use crate::models::{InboundProduct, StoredProduct};

/// Attach the name and description embeddings to a copy of `product`.
///
/// Identifying fields are carried over unchanged and the vectors verbatim.
/// The description text is represented only by its vector.
pub fn to_stored_product(
    product: &InboundProduct,
    name_vector: Vec<f32>,
    description_vector: Vec<f32>,
) -> StoredProduct {
    StoredProduct {
        id: product.id.clone(),
        name: product.name.clone(),
        image: product.image.clone(),
        price: product.price,
        product_skus: product.product_skus.clone(),
        product_name_vector: name_vector,
        product_description_vector: description_vector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> InboundProduct {
        InboundProduct {
            id: "p1".into(),
            name: "Red Shoes".into(),
            image: "https://cdn.example.com/p1.png".into(),
            price: 199.9,
            description: "Comfortable running shoes".into(),
            product_skus: vec!["1001".into(), "A1".into()],
        }
    }

    #[test]
    fn test_fields_and_vectors_are_carried_over() {
        let stored = to_stored_product(&product(), vec![0.1, 0.2], vec![0.3, 0.4]);

        assert_eq!(stored.id, "p1");
        assert_eq!(stored.name, "Red Shoes");
        assert_eq!(stored.image, "https://cdn.example.com/p1.png");
        assert_eq!(stored.price, 199.9);
        assert_eq!(stored.product_skus, vec!["1001", "A1"]);
        assert_eq!(stored.product_name_vector, vec![0.1, 0.2]);
        assert_eq!(stored.product_description_vector, vec![0.3, 0.4]);
    }

    #[test]
    fn test_empty_skus_stay_empty() {
        let mut inbound = product();
        inbound.product_skus.clear();

        let stored = to_stored_product(&inbound, vec![], vec![]);
        assert!(stored.product_skus.is_empty());
    }
}
