#![allow(dead_code)]

use std::sync::Arc;

use bnpl_client::api::MobileApiClient;
use bnpl_client::storage::{MemoryStore, SessionStore};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

/// Client whose identity and app domains both point at the mock server,
/// with a bearer token already in the session.
pub async fn client(server: &ServerGuard) -> MobileApiClient {
    let session = SessionStore::new(Arc::new(MemoryStore::new()));
    session.set_token("test-token").await.unwrap();
    MobileApiClient::new(server.url(), server.url(), session)
}

pub fn envelope(status_code: u16, message: &str, data: Value) -> String {
    json!({ "statusCode": status_code, "message": message, "data": data }).to_string()
}

/// Mocks one backend function, matched on the envelope's function name and
/// (partially) its payload.
pub async fn mock_function(
    server: &mut ServerGuard,
    function_name: &str,
    payload: Value,
    body: String,
) -> Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "functionName": function_name,
            "payload": payload,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
