//! CLI command implementations.

pub mod catalog;
pub mod shipping;
pub mod users;

use medimart_storefront::backend::{DataGateway, DocumentClient};
use medimart_storefront::config::StorefrontConfig;

/// Build a platform gateway from environment configuration.
///
/// Reads the same `MEDIMART_PLATFORM_*` variables the server does, so
/// the CLI works against whatever project the server is pointed at.
fn gateway_from_env() -> Result<DataGateway, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let documents = DocumentClient::new(&config.platform)?;
    Ok(DataGateway::new(documents))
}
