//! Inspect and replace the shipping cost configuration.

use std::path::Path;

use medimart_storefront::models::ShippingCostConfig;
use tracing::info;

/// Show the current shipping cost configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be fetched.
pub async fn get() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = super::gateway_from_env()?;
    let envelope = gateway.get_shipping_costs().await;

    let Some(config) = envelope.data else {
        return Err(envelope
            .error
            .unwrap_or_else(|| "could not fetch shipping configuration".to_owned())
            .into());
    };

    info!("Shipping cost configuration");
    info!("  default: {}", config.default_cost);
    let mut states: Vec<_> = config.per_state.iter().collect();
    states.sort_by(|a, b| a.0.cmp(b.0));
    for (state, cost) in states {
        info!("  {state}: {cost}");
    }
    Ok(())
}

/// Replace the shipping cost configuration from a JSON file.
///
/// The file shape matches the stored document, e.g.
/// `{"default": "50.00", "perState": {"Tamil Nadu": "30.00"}}`.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or the
/// platform write fails.
pub async fn set(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: ShippingCostConfig = serde_json::from_str(&content)?;

    let gateway = super::gateway_from_env()?;
    let outcome = gateway.update_shipping_costs(&config).await;

    if outcome.success {
        info!(states = config.per_state.len(), "Shipping configuration updated");
        Ok(())
    } else {
        Err(outcome
            .error
            .unwrap_or_else(|| "shipping update failed".to_owned())
            .into())
    }
}
