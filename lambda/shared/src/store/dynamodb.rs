use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{instrument, warn};

use super::{ProductStore, SCAN_LIMIT};
use crate::error::StoreError;
use crate::model::Product;

/// [`ProductStore`] backed by a DynamoDB table keyed on `id`.
///
/// The client is built once per process and cloned in here; clones share the
/// same connection pool and configuration.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ProductStore for DynamoDbStore {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|err| StoreError::remote("GetItem", err))?;

        result.item().map(product_from_item).transpose()
    }

    #[instrument(skip(self, product), fields(table = %self.table_name, id = %product.id))]
    async fn put_product(&self, product: &Product) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(product_to_item(product)))
            .send()
            .await
            .map_err(|err| StoreError::remote("PutItem", err))?;

        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|err| StoreError::remote("DeleteItem", err))?;

        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(SCAN_LIMIT as i32)
            .send()
            .await
            .map_err(|err| StoreError::remote("Scan", err))?;

        Ok(products_from_items(result.items()))
    }
}

/// Decodes scanned items one by one. Items that don't decode are logged and
/// left out so a single bad row can't fail the whole listing.
pub fn products_from_items(items: &[HashMap<String, AttributeValue>]) -> Vec<Product> {
    items
        .iter()
        .filter_map(|item| match product_from_item(item) {
            Ok(product) => Some(product),
            Err(err) => {
                let id = item.get("id").and_then(|v| v.as_s().ok());
                warn!(id = ?id, error = %err, "Skipping malformed product item");
                None
            }
        })
        .collect()
}

pub fn product_to_item(product: &Product) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(product.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(product.name.clone()));
    item.insert(
        "price".to_string(),
        AttributeValue::N(product.price.to_string()),
    );
    item
}

pub fn product_from_item(item: &HashMap<String, AttributeValue>) -> Result<Product, StoreError> {
    let id = string_attribute(item, "id")?;
    let name = string_attribute(item, "name")?;

    let price = item
        .get("price")
        .ok_or_else(|| StoreError::malformed("price", "missing"))?
        .as_n()
        .map_err(|_| StoreError::malformed("price", "not a number attribute"))?;
    let price = price
        .parse::<f64>()
        .map_err(|err| StoreError::malformed("price", format!("unparseable ({err})")))?;

    Ok(Product { id, name, price })
}

fn string_attribute(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<String, StoreError> {
    item.get(name)
        .ok_or_else(|| StoreError::malformed(name, "missing"))?
        .as_s()
        .cloned()
        .map_err(|_| StoreError::malformed(name, "not a string attribute"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
    use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
    use aws_sdk_dynamodb::operation::put_item::PutItemOutput;
    use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{mock, mock_client};

    fn id_key(id: &str) -> Option<AttributeValue> {
        Some(AttributeValue::S(id.to_string()))
    }

    fn not_found() -> ResourceNotFoundException {
        ResourceNotFoundException::builder()
            .message("Requested resource not found")
            .meta(
                ErrorMetadata::builder()
                    .code("ResourceNotFoundException")
                    .message("Requested resource not found")
                    .build(),
            )
            .build()
    }

    #[tokio::test]
    async fn get_sends_id_key_and_decodes_item() {
        let rule = mock!(Client::get_item)
            .match_requests(|req| {
                req.table_name() == Some("Products")
                    && req.key().and_then(|key| key.get("id")).cloned() == id_key("1")
            })
            .then_output(|| {
                GetItemOutput::builder()
                    .set_item(Some(product_to_item(&Product::new("1", "Widget", 9.99))))
                    .build()
            });
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let product = store.get_product("1").await.expect("get should succeed");

        assert_eq!(product, Some(Product::new("1", "Widget", 9.99)));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn get_without_item_is_absent() {
        let rule = mock!(Client::get_item).then_output(|| GetItemOutput::builder().build());
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let product = store.get_product("missing").await.expect("get should succeed");

        assert_eq!(product, None);
    }

    #[tokio::test]
    async fn get_error_becomes_remote_with_code() {
        let rule = mock!(Client::get_item)
            .then_error(|| GetItemError::ResourceNotFoundException(not_found()));
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let error = store.get_product("1").await.expect_err("get should fail");

        match error {
            StoreError::Remote {
                operation, code, ..
            } => {
                assert_eq!(operation, "GetItem");
                assert_eq!(code.as_deref(), Some("ResourceNotFoundException"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn put_sends_full_item() {
        let rule = mock!(Client::put_item)
            .match_requests(|req| {
                req.table_name() == Some("Products")
                    && req.item() == Some(&product_to_item(&Product::new("1", "Widget", 9.99)))
            })
            .then_output(|| PutItemOutput::builder().build());
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        store
            .put_product(&Product::new("1", "Widget", 9.99))
            .await
            .expect("put should succeed");

        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn delete_sends_id_key() {
        let rule = mock!(Client::delete_item)
            .match_requests(|req| {
                req.table_name() == Some("Products")
                    && req.key().and_then(|key| key.get("id")).cloned() == id_key("42")
            })
            .then_output(|| DeleteItemOutput::builder().build());
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        store.delete_product("42").await.expect("delete should succeed");

        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn scan_is_limited_to_one_page() {
        let rule = mock!(Client::scan)
            .match_requests(|req| {
                req.table_name() == Some("Products") && req.limit() == Some(SCAN_LIMIT as i32)
            })
            .then_output(|| {
                ScanOutput::builder()
                    .items(product_to_item(&Product::new("1", "Widget", 9.99)))
                    .items(product_to_item(&Product::new("2", "Gadget", 4.5)))
                    .build()
            });
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let products = store.get_products().await.expect("scan should succeed");

        assert_eq!(products.len(), 2);
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn scan_keeps_good_items_next_to_a_malformed_one() {
        let mut bad = product_to_item(&Product::new("2", "Gadget", 4.5));
        bad.insert("price".to_string(), AttributeValue::S("4.50".to_string()));
        let rule = mock!(Client::scan).then_output(move || {
            ScanOutput::builder()
                .items(product_to_item(&Product::new("1", "Widget", 9.99)))
                .items(bad.clone())
                .build()
        });
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let products = store.get_products().await.expect("scan should succeed");

        assert_eq!(products, vec![Product::new("1", "Widget", 9.99)]);
    }

    #[tokio::test]
    async fn scan_error_becomes_remote() {
        let rule = mock!(Client::scan)
            .then_error(|| ScanError::ResourceNotFoundException(not_found()));
        let store = DynamoDbStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), "Products");

        let error = store.get_products().await.expect_err("scan should fail");

        assert!(matches!(error, StoreError::Remote { operation: "Scan", .. }));
    }

    #[test]
    fn malformed_items_are_skipped() {
        let mut bad = product_to_item(&Product::new("2", "Gadget", 4.5));
        bad.insert("price".to_string(), AttributeValue::S("4.50".to_string()));
        let mut nameless = product_to_item(&Product::new("3", "Bolt", 1.0));
        nameless.remove("name");

        let products = products_from_items(&[
            product_to_item(&Product::new("1", "Widget", 9.99)),
            bad,
            nameless,
        ]);

        assert_eq!(products, vec![Product::new("1", "Widget", 9.99)]);
    }

    #[test]
    fn item_carries_typed_attributes() {
        let item = product_to_item(&Product::new("1", "Widget", 9.99));

        assert_eq!(item.get("id"), Some(&AttributeValue::S("1".to_string())));
        assert_eq!(
            item.get("name"),
            Some(&AttributeValue::S("Widget".to_string()))
        );
        assert_eq!(
            item.get("price"),
            Some(&AttributeValue::N("9.99".to_string()))
        );
    }

    #[test]
    fn decodes_item_written_by_put() {
        let product = Product::new("abc", "Gadget", 120.5);
        let decoded =
            product_from_item(&product_to_item(&product)).expect("item should decode");
        assert_eq!(decoded, product);
    }

    #[test]
    fn decodes_integer_price() {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S("7".to_string()));
        item.insert("name".to_string(), AttributeValue::S("Bolt".to_string()));
        item.insert("price".to_string(), AttributeValue::N("3".to_string()));

        let product = product_from_item(&item).expect("item should decode");
        assert_eq!(product.price, 3.0);
    }

    #[test]
    fn rejects_item_without_name() {
        let mut item = product_to_item(&Product::new("1", "Widget", 1.0));
        item.remove("name");

        let error = product_from_item(&item).expect_err("missing name should fail");
        assert!(matches!(
            error,
            StoreError::MalformedItem { ref attribute, .. } if attribute == "name"
        ));
    }

    #[test]
    fn rejects_string_typed_price() {
        let mut item = product_to_item(&Product::new("1", "Widget", 1.0));
        item.insert("price".to_string(), AttributeValue::S("1.0".to_string()));

        let error = product_from_item(&item).expect_err("string price should fail");
        assert_eq!(
            error.to_string(),
            "item attribute `price` is not a number attribute"
        );
    }

    #[test]
    fn store_keeps_configured_table() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .region(aws_sdk_dynamodb::config::Region::new("us-east-1"))
            .build();
        let store = DynamoDbStore::new(Client::from_conf(config), "Products");
        assert_eq!(store.table_name(), "Products");
    }
}
