//! The product persistence capability and its implementations.

mod dynamodb;
mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::Product;

pub use dynamodb::{product_from_item, product_to_item, products_from_items, DynamoDbStore};
pub use memory::MemoryStore;

/// Upper bound on the number of products a single listing returns.
pub const SCAN_LIMIT: usize = 20;

/// Persistence of [`Product`] entities, independent of the storage engine.
///
/// Each operation issues exactly one call to the backing store. Nothing is
/// retried, batched or cached at this layer.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by exact id. A missing product is `Ok(None)`.
    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Creates the product or fully overwrites the one with the same id.
    async fn put_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Removes the product if present. Deleting an unknown id succeeds.
    async fn delete_product(&self, id: &str) -> Result<(), StoreError>;

    /// Returns at most [`SCAN_LIMIT`] products in storage-defined order.
    /// There is no way to ask for the next page. Stored entries that can't be
    /// read back as a `Product` are skipped, not reported.
    async fn get_products(&self) -> Result<Vec<Product>, StoreError>;
}
