//! Seed the product catalog from a JSON file.
//!
//! The file is a JSON array of product records in the same shape the
//! platform stores, e.g.
//! `[{"name": "...", "price": "499.00", "category": "...", ...}]`.

use std::path::Path;

use medimart_storefront::models::ProductRecord;
use tracing::{error, info};

/// Create every product in `file_path` on the platform.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, the platform
/// configuration is incomplete, or any product fails to create.
pub async fn seed_products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<ProductRecord> = serde_json::from_str(&content)?;

    info!(products = records.len(), "Parsed seed file");

    let gateway = super::gateway_from_env()?;

    let mut created = 0usize;
    let mut failed = 0usize;
    for record in records {
        let name = record.name.clone();
        let outcome = gateway.create_product(record).await;
        if outcome.success {
            created += 1;
        } else {
            failed += 1;
            error!(
                product = %name,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Create failed"
            );
        }
    }

    info!("Seeding complete!");
    info!("  Products created: {created}");

    if failed > 0 {
        return Err(format!("{failed} products failed to seed").into());
    }
    Ok(())
}
