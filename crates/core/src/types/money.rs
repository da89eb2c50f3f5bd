//! Money math and lenient numeric parsing.
//!
//! Prices are INR decimals. GST (goods and services tax) is charged per
//! line at the product's own rate, defaulting to the statutory 18% when a
//! document carries no rate.
//!
//! The commerce platform stores schemaless documents, so price fields can
//! arrive as numbers, numeric strings, or garbage written by older clients.
//! The lenient deserializers here never fail: an unusable price becomes
//! zero and an unusable GST rate becomes the default. Bad numeric input
//! must not block checkout.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Statutory default GST rate, in percent.
pub const DEFAULT_GST_PERCENT: u32 = 18;

/// The default GST rate as a decimal, for serde field defaults.
#[must_use]
pub fn default_gst_rate() -> Decimal {
    Decimal::from(DEFAULT_GST_PERCENT)
}

/// Round to two decimal places, midpoints away from zero.
///
/// This matches how totals are displayed on invoices: ₹0.125 becomes
/// ₹0.13, never ₹0.12.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Deserialize a price-like field, tolerating numbers, numeric strings,
/// and anything else. Unusable values become zero.
///
/// # Errors
///
/// Only fails if the underlying input is not valid JSON at all.
pub fn lenient_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_decimal(&value).unwrap_or(Decimal::ZERO))
}

/// Deserialize a GST rate field, tolerating numbers, numeric strings, and
/// anything else. Unusable values become [`DEFAULT_GST_PERCENT`].
///
/// # Errors
///
/// Only fails if the underlying input is not valid JSON at all.
pub fn lenient_gst<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_decimal(&value).unwrap_or_else(default_gst_rate))
}

fn parse_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed
                .parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(trimmed).ok())
        }
        _ => None,
    }
}
