use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata};
use serde::Serialize;
use thiserror::Error;

/// Failure of a [`crate::store::ProductStore`] operation.
///
/// The handlers serialize this value verbatim into the body of a 500
/// response, so the SDK error code and message reach the HTTP caller.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum StoreError {
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("item attribute `{attribute}` is {reason}")]
    MalformedItem { attribute: String, reason: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Wraps an SDK error from the named table operation.
    pub fn remote<E>(operation: &'static str, err: E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        StoreError::Remote {
            operation,
            code: err.code().map(str::to_string),
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    pub fn malformed(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::MalformedItem {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}
