//! Wishlist entry documents.

use chrono::{DateTime, Utc};
use medimart_core::types::money;
use medimart_core::types::{ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// A wishlisted product, snapshotting name/price/image at toggle time.
///
/// Stored at a deterministic document id derived from (uid, product) so the
/// toggle is idempotent and needs no lookup before removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "money::lenient_price")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    #[must_use]
    pub fn from_product(user_id: UserId, product: &Product) -> Self {
        Self {
            user_id,
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            added_at: Utc::now(),
        }
    }

    /// Document id for a (user, product) pair.
    #[must_use]
    pub fn document_id_for(user_id: &UserId, product_id: &ProductId) -> String {
        format!("{user_id}_{product_id}")
    }

    #[must_use]
    pub fn document_id(&self) -> String {
        Self::document_id_for(&self.user_id, &self.product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::Document;
    use crate::models::ProductRecord;
    use serde_json::json;

    fn product() -> Product {
        let doc: Document<ProductRecord> = serde_json::from_value(json!({
            "id": "p5",
            "data": {
                "name": "Pulse Oximeter",
                "price": "1299.00",
                "category": "diagnostics",
                "imageUrl": "https://cdn.example/p5.jpg"
            }
        }))
        .unwrap();
        Product::from_document(doc)
    }

    #[test]
    fn test_from_product_snapshots_fields() {
        let entry = WishlistEntry::from_product(UserId::new("u1"), &product());
        assert_eq!(entry.product_id.as_str(), "p5");
        assert_eq!(entry.name, "Pulse Oximeter");
        assert_eq!(entry.price, "1299.00".parse::<Decimal>().unwrap());
        assert_eq!(entry.image_url.as_deref(), Some("https://cdn.example/p5.jpg"));
    }

    #[test]
    fn test_document_id_is_deterministic() {
        let entry = WishlistEntry::from_product(UserId::new("u1"), &product());
        assert_eq!(entry.document_id(), "u1_p5");
        assert_eq!(
            WishlistEntry::document_id_for(&UserId::new("u1"), &ProductId::new("p5")),
            "u1_p5"
        );
    }
}
