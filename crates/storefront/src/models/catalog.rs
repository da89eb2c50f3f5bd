//! Product catalog types.

use medimart_core::types::money;
use medimart_core::types::ProductId;
use medimart_core::CartLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backend::Document;

/// Product document payload.
///
/// Doubles as the admin create/update request body. Price and GST parse
/// leniently because catalog documents are schemaless on the platform side:
/// an unusable price reads as 0, an unusable GST as the 18% default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "money::lenient_price")]
    pub price: Decimal,
    #[serde(
        default = "money::default_gst_rate",
        deserialize_with = "money::lenient_gst"
    )]
    pub gst_percentage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// A catalog product with its document id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub gst_percentage: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
    pub in_stock: bool,
}

impl Product {
    #[must_use]
    pub fn from_document(doc: Document<ProductRecord>) -> Self {
        Self {
            id: ProductId::new(doc.id),
            name: doc.data.name,
            description: doc.data.description,
            price: doc.data.price,
            gst_percentage: doc.data.gst_percentage,
            image_url: doc.data.image_url,
            category: doc.data.category,
            in_stock: doc.data.in_stock,
        }
    }

    /// Snapshot this product into a cart line with the given quantity.
    #[must_use]
    pub fn to_cart_line(&self, quantity: u32) -> CartLine {
        CartLine {
            product_id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            quantity,
            gst_percentage: self.gst_percentage,
            image_url: self.image_url.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Document<ProductRecord> {
        serde_json::from_value(json!({
            "id": "p1",
            "data": {
                "name": "Digital Thermometer",
                "description": "Fast-read clinical thermometer",
                "price": "499.00",
                "gstPercentage": "12",
                "category": "diagnostics",
                "imageUrl": "https://cdn.example/p1.jpg"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_record_defaults() {
        let record: ProductRecord = serde_json::from_value(json!({
            "name": "BP Monitor",
            "category": "diagnostics"
        }))
        .unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.gst_percentage, Decimal::from(18));
        assert!(record.in_stock);
    }

    #[test]
    fn test_record_tolerates_garbage_numbers() {
        let record: ProductRecord = serde_json::from_value(json!({
            "name": "BP Monitor",
            "category": "diagnostics",
            "price": "not-a-price",
            "gstPercentage": {"nested": true}
        }))
        .unwrap();
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.gst_percentage, Decimal::from(18));
    }

    #[test]
    fn test_from_document_carries_id() {
        let product = Product::from_document(sample_document());
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price, "499.00".parse::<Decimal>().unwrap());
        assert_eq!(product.gst_percentage, Decimal::from(12));
    }

    #[test]
    fn test_to_cart_line_snapshots_product() {
        let product = Product::from_document(sample_document());
        let line = product.to_cart_line(3);
        assert_eq!(line.product_id, product.id);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, product.price);
        assert_eq!(line.gst_percentage, product.gst_percentage);
        assert_eq!(line.image_url.as_deref(), Some("https://cdn.example/p1.jpg"));
    }
}
