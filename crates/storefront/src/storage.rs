//! Durable local storage for the cart.
//!
//! One JSON file, rewritten in full on every mutation. Loading never fails:
//! a missing, unreadable, or corrupt file yields an empty cart with a
//! warning log, so a bad snapshot can never take the storefront down.
//! Writes are last-write-wins; concurrent processes are not coordinated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use medimart_core::Cart;
use thiserror::Error;

/// Errors writing the cart snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write cart file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to the cart snapshot file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the saved cart, or an empty cart if there is no usable snapshot.
    #[must_use]
    pub fn load(&self) -> Cart {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Cart::new(),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "cart file unreadable, starting empty"
                );
                return Cart::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "cart file corrupt, starting empty"
                );
                Cart::new()
            }
        }
    }

    /// Persist the cart, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the file write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(cart)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, contents).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use medimart_core::types::ProductId;
    use medimart_core::CartLine;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("medimart-cart-test-{}.json", Uuid::new_v4()))
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLine {
            product_id: ProductId::new("p1"),
            name: "Thermometer".to_string(),
            unit_price: Decimal::from(499),
            quantity: 2,
            gst_percentage: Decimal::from(18),
            image_url: None,
        });
        cart
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = LocalStore::new(scratch_path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let path = scratch_path();
        let store = LocalStore::new(&path);
        let cart = sample_cart();

        store.save(&cart).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.lines(), cart.lines());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = scratch_path();
        fs::write(&path, "{not json").unwrap();

        let store = LocalStore::new(&path);
        assert!(store.load().is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let path = scratch_path();
        let store = LocalStore::new(&path);

        store.save(&sample_cart()).unwrap();
        store.save(&Cart::new()).unwrap();
        assert!(store.load().is_empty());

        fs::remove_file(&path).unwrap();
    }
}
