//! Order documents and the checkout shipping snapshot.

use chrono::{DateTime, Utc};
use medimart_core::types::{OrderId, OrderStatus, UserId};
use medimart_core::{CartLine, OrderSummary};
use serde::{Deserialize, Serialize};

use crate::backend::Document;

/// Contact and delivery details captured at checkout.
///
/// Stored verbatim on the order so later address changes on the profile do
/// not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub state: String,
    pub postal_code: String,
}

/// Order document payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
    #[serde(flatten)]
    pub summary: OrderSummary,
    #[serde(default)]
    pub status: OrderStatus,
    pub shipping: ShippingDetails,
    pub placed_at: DateTime<Utc>,
}

/// An order with its document id and server timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub status: OrderStatus,
    pub shipping: ShippingDetails,
    pub placed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    #[must_use]
    pub fn from_document(doc: Document<OrderRecord>) -> Self {
        Self {
            id: OrderId::new(doc.id),
            user_id: doc.data.user_id,
            lines: doc.data.lines,
            summary: doc.data.summary,
            status: doc.data.status,
            shipping: doc.data.shipping,
            placed_at: doc.data.placed_at,
            updated_at: doc.update_time,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_wire_shape_flattens_summary() {
        let record: OrderRecord = serde_json::from_value(json!({
            "userId": "u1",
            "lines": [{
                "productId": "p1",
                "name": "Thermometer",
                "unitPrice": "100",
                "quantity": 2,
                "gstPercentage": "18"
            }],
            "subtotal": "200.00",
            "gstTotal": "36.00",
            "shippingCost": "0.00",
            "total": "236.00",
            "shipping": {
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "9876543210",
                "address": "12 Hospital Road, T Nagar, Chennai",
                "state": "Tamil Nadu",
                "postalCode": "600001"
            },
            "placedAt": "2026-02-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.status, OrderStatus::Confirmed);
        assert_eq!(record.summary.total.to_string(), "236.00");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["subtotal"], "200.00");
        assert_eq!(value["status"], "confirmed");
    }

    #[test]
    fn test_from_document_maps_update_time() {
        let doc: Document<OrderRecord> = serde_json::from_value(json!({
            "id": "o9",
            "data": {
                "userId": "u1",
                "lines": [],
                "subtotal": "0",
                "gstTotal": "0",
                "shippingCost": "0",
                "total": "0",
                "status": "shipped",
                "shipping": {
                    "name": "Asha Rao",
                    "email": "asha@example.com",
                    "phone": "9876543210",
                    "address": "12 Hospital Road, T Nagar, Chennai",
                    "state": "Tamil Nadu",
                    "postalCode": "600001"
                },
                "placedAt": "2026-02-01T08:00:00Z"
            },
            "updateTime": "2026-02-03T12:00:00Z"
        }))
        .unwrap();
        let order = Order::from_document(doc);
        assert_eq!(order.id.as_str(), "o9");
        assert_eq!(order.status, OrderStatus::Shipped);
        assert!(order.updated_at.is_some());
    }
}
