//! Admin-configurable shipping costs.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipping cost configuration, stored as a single settings document.
///
/// Per-state overrides are keyed by state name; anything not listed falls
/// back to the default cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCostConfig {
    #[serde(rename = "default")]
    pub default_cost: Decimal,
    #[serde(default)]
    pub per_state: HashMap<String, Decimal>,
}

impl Default for ShippingCostConfig {
    fn default() -> Self {
        Self {
            default_cost: Decimal::from(50),
            per_state: HashMap::new(),
        }
    }
}

impl ShippingCostConfig {
    /// Shipping cost for a delivery state, case-insensitive on the name.
    #[must_use]
    pub fn cost_for_state(&self, state: &str) -> Decimal {
        let wanted = state.trim();
        self.per_state
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map_or(self.default_cost, |(_, cost)| *cost)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ShippingCostConfig {
        let mut per_state = HashMap::new();
        per_state.insert("Tamil Nadu".to_string(), Decimal::from(30));
        per_state.insert("Assam".to_string(), Decimal::from(90));
        ShippingCostConfig {
            default_cost: Decimal::from(50),
            per_state,
        }
    }

    #[test]
    fn test_listed_state_uses_override() {
        assert_eq!(config().cost_for_state("Tamil Nadu"), Decimal::from(30));
    }

    #[test]
    fn test_lookup_ignores_case_and_padding() {
        assert_eq!(config().cost_for_state("  tamil nadu "), Decimal::from(30));
    }

    #[test]
    fn test_unlisted_state_falls_back_to_default() {
        assert_eq!(config().cost_for_state("Kerala"), Decimal::from(50));
    }

    #[test]
    fn test_wire_shape_uses_default_key() {
        let value = serde_json::to_value(config()).unwrap();
        assert_eq!(value["default"], "50");
        assert_eq!(value["perState"]["Assam"], "90");
    }

    #[test]
    fn test_default_config() {
        let config = ShippingCostConfig::default();
        assert_eq!(config.default_cost, Decimal::from(50));
        assert!(config.per_state.is_empty());
    }
}
