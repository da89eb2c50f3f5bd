//! Cart history log entries.

use chrono::{DateTime, Utc};
use medimart_core::types::{ProductId, UserId};
use medimart_core::CartLine;
use serde::{Deserialize, Serialize};

/// One add-to-cart event, recorded best-effort for signed-in shoppers.
///
/// Write-only from the storefront's point of view; nothing here reads the
/// collection back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartHistoryEntry {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartHistoryEntry {
    #[must_use]
    pub fn from_line(user_id: UserId, line: &CartLine) -> Self {
        Self {
            user_id,
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            added_at: Utc::now(),
        }
    }
}
