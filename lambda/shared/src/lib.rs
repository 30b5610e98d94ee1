//! Shared building blocks for the product Lambdas.
//!
//! Every function crate under `lambda/` links this crate for the `Product`
//! model, the [`store::ProductStore`] capability and its DynamoDB and
//! in-memory implementations, process configuration, and the logging/metrics
//! helpers wrapped around each invocation.

pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod response;
pub mod store;

pub use config::Config;
pub use error::{ConfigError, StoreError};
pub use model::Product;
pub use store::{DynamoDbStore, MemoryStore, ProductStore, SCAN_LIMIT};

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
