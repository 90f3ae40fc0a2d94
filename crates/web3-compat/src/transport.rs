//! The RPC endpoint seen by [`Connection`](crate::Connection).
use async_trait::async_trait;
use serde_json::Value;
use solana_client::{
    client_error::ClientError, nonblocking::rpc_client::RpcClient,
    rpc_request::RpcRequest,
};

/// A JSON-RPC request/response channel to a Solana node.
///
/// Errors are returned exactly as the transport produced them; this layer
/// never retries.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, request: RpcRequest, params: Value) -> Result<Value, ClientError>;

    fn url(&self) -> String;
}

#[async_trait]
impl RpcTransport for RpcClient {
    async fn call(&self, request: RpcRequest, params: Value) -> Result<Value, ClientError> {
        RpcClient::send::<Value>(self, request, params).await
    }

    fn url(&self) -> String {
        RpcClient::url(self)
    }
}
