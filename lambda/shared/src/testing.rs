use std::collections::HashMap;

use async_trait::async_trait;
use lambda_http::{Body, Request, RequestExt};

use crate::error::StoreError;
use crate::model::Product;
use crate::observability::MetricsConfig;
use crate::store::ProductStore;

/// Store whose every operation fails the way a throttled table would.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    pub fn error(operation: &'static str) -> StoreError {
        StoreError::Remote {
            operation,
            code: Some("ProvisionedThroughputExceededException".to_string()),
            message: "The level of configured provisioned throughput for the table was exceeded"
                .to_string(),
        }
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn get_product(&self, _id: &str) -> Result<Option<Product>, StoreError> {
        Err(Self::error("GetItem"))
    }

    async fn put_product(&self, _product: &Product) -> Result<(), StoreError> {
        Err(Self::error("PutItem"))
    }

    async fn delete_product(&self, _id: &str) -> Result<(), StoreError> {
        Err(Self::error("DeleteItem"))
    }

    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        Err(Self::error("Scan"))
    }
}

pub fn metrics_config() -> MetricsConfig {
    MetricsConfig {
        namespace: "test-namespace".to_string(),
        service: "test-service".to_string(),
    }
}

/// API Gateway style request with an optional `{id}` path parameter.
pub fn request(method: &str, path: &str, id: Option<&str>, body: Body) -> Request {
    let request = lambda_http::http::Request::builder()
        .method(method)
        .uri(path)
        .body(body)
        .expect("test request should build");

    match id {
        Some(id) => request.with_path_parameters(HashMap::from([(
            "id".to_string(),
            id.to_string(),
        )])),
        None => request,
    }
}
