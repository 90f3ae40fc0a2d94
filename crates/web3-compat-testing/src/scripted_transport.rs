use async_trait::async_trait;
use serde_json::Value;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::RpcRequest,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};
use web3_compat::{Connection, ConnectionConfig, RpcTransport};

/// A scripted node reply: a JSON result, or a transport failure message
pub type ScriptedReply = Result<Value, String>;

/// One request as seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: RpcRequest,
    pub params: Value,
}

/// In-memory [`RpcTransport`] that answers from per-method scripts.
///
/// Replies for a method are consumed in order; the last one repeats forever.
/// A method with no script fails like an unreachable node.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<RpcRequest, VecDeque<ScriptedReply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `method`
    pub fn reply(self, method: RpcRequest, result: Value) -> Self {
        self.push(method, Ok(result));
        self
    }

    /// Queue a transport failure for `method`
    pub fn fail(self, method: RpcRequest, message: &str) -> Self {
        self.push(method, Err(message.to_string()));
        self
    }

    pub fn push(&self, method: RpcRequest, reply: ScriptedReply) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made for `method`
    pub fn calls(&self, method: RpcRequest) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method == method)
            .count()
    }

    pub fn last_params(&self, method: RpcRequest) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|request| request.method == method)
            .map(|request| request.params.clone())
    }

    fn next_reply(&self, method: RpcRequest) -> ScriptedReply {
        let mut scripts = self.scripts.lock().unwrap();
        let Some(queue) = scripts.get_mut(&method) else {
            return Err(format!("no scripted reply for {method}"));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err("script drained".to_string()))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(format!("no scripted reply for {method}")))
        }
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, request: RpcRequest, params: Value) -> Result<Value, ClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request,
            params,
        });
        self.next_reply(request)
            .map_err(|message| ClientError::from(ClientErrorKind::Custom(message)))
    }

    fn url(&self) -> String {
        "scripted://localhost".to_string()
    }
}

/// A connection backed by `transport`
pub fn scripted_connection(
    transport: &Arc<ScriptedTransport>,
    config: impl Into<ConnectionConfig>,
) -> Connection {
    Connection::with_transport(transport.clone(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_last_reply_repeats() {
        let transport = ScriptedTransport::new()
            .reply(RpcRequest::GetBalance, json!(1))
            .reply(RpcRequest::GetBalance, json!(2));

        let first = transport.call(RpcRequest::GetBalance, json!([])).await.unwrap();
        let second = transport.call(RpcRequest::GetBalance, json!([])).await.unwrap();
        let third = transport.call(RpcRequest::GetBalance, json!([])).await.unwrap();

        assert_eq!((first, second, third), (json!(1), json!(2), json!(2)));
        assert_eq!(transport.calls(RpcRequest::GetBalance), 3);
    }

    #[tokio::test]
    async fn test_unscripted_method_fails() {
        let transport = ScriptedTransport::new();
        let result = transport.call(RpcRequest::GetSlot, json!([])).await;
        assert!(result.is_err());
        assert_eq!(transport.requests().len(), 1);
    }
}
