use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ProductStore, SCAN_LIMIT};
use crate::error::StoreError;
use crate::model::Product;

/// In-process [`ProductStore`], used to exercise handlers without a table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<BTreeMap<String, Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Number of stored products. Still answers after a poisoned lock; the
    /// trait operations are the ones that report poisoning.
    pub fn len(&self) -> usize {
        match self.products.read() {
            Ok(products) => products.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable {
        message: "in-memory product map lock poisoned".to_string(),
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.get(id).cloned())
    }

    async fn put_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.remove(id);
        Ok(())
    }

    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.values().take(SCAN_LIMIT).cloned().collect())
    }
}
