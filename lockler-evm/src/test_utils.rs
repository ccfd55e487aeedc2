//! JSON-RPC mock server helpers shared by the unit tests.

use std::collections::HashMap;

use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers JSON-RPC requests by method name, echoing the request id.
#[derive(Debug, Clone, Default)]
pub(crate) struct RpcMock {
    replies: HashMap<&'static str, Value>,
}

impl RpcMock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn result(mut self, rpc_method: &'static str, result: Value) -> Self {
        self.replies.insert(rpc_method, json!({ "result": result }));
        self
    }

    pub(crate) fn error(mut self, rpc_method: &'static str, code: i64, message: &str) -> Self {
        self.replies.insert(
            rpc_method,
            json!({ "error": { "code": code, "message": message } }),
        );
        self
    }

    fn reply(&self, call: &Value) -> Value {
        let rpc_method = call["method"].as_str().unwrap_or_default();
        let mut reply = self.replies.get(rpc_method).cloned().unwrap_or_else(|| {
            json!({ "error": { "code": -32601, "message": "the method does not exist" } })
        });
        reply["jsonrpc"] = json!("2.0");
        reply["id"] = call["id"].clone();
        reply
    }
}

impl Respond for RpcMock {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().unwrap_or(Value::Null);
        let reply = match &body {
            Value::Array(calls) => Value::Array(calls.iter().map(|c| self.reply(c)).collect()),
            call => self.reply(call),
        };
        ResponseTemplate::new(200).set_body_json(reply)
    }
}

/// Starts a mock server answering every POST with `mock`.
pub(crate) async fn mock_rpc(mock: RpcMock) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(mock)
        .mount(&server)
        .await;
    server
}
