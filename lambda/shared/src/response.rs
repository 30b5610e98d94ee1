//! Response envelopes shared by the product handlers. Every response is
//! JSON, including failures.

use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use serde_json::json;

use crate::error::StoreError;

pub const CONTENT_TYPE: &str = "application/json";

pub fn json_response(status: u16, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .body(Body::Text(body))?)
}

pub fn serialized_response(status: u16, payload: &impl Serialize) -> Result<Response<Body>, Error> {
    json_response(status, serde_json::to_string(payload)?)
}

/// `{"message": ...}` body, used for client errors and acknowledgements.
pub fn message_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, json!({ "message": message }).to_string())
}

/// 500 carrying the store error as-is.
pub fn store_error_response(error: &StoreError) -> Result<Response<Body>, Error> {
    serialized_response(500, error)
}

/// The `{id}` path parameter, if present and non-empty.
pub fn path_id(event: &Request) -> Option<String> {
    event
        .path_parameters()
        .first("id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
