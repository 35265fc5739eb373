use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::*;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use super::{Rpc, RpcRequest, RpcResponse};
use crate::error::Result;

/// Value of the `Authorization` header for HTTP Basic credentials.
pub fn basic_authorization(login: &str, password: &str) -> String {
    let credentials = format!("{}:{}", login, password);
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// RPC transport over plain HTTP.
///
/// Idle connections are never pooled, so each call opens its own connection
/// and drops it once the response has been read.
pub struct HttpRpcClient {
    client: reqwest::Client,
    base_url: String,
    authorization: String,
}

impl HttpRpcClient {
    /// `address` is a host or `host:port`, as accepted for `--ip-address`.
    pub fn new(address: &str, login: &str, password: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("http://{}", address),
            authorization: basic_authorization(login, password),
        })
    }

    pub fn url(&self, request: &RpcRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

#[async_trait]
impl Rpc for HttpRpcClient {
    async fn call(&self, request: &RpcRequest) -> Result<RpcResponse> {
        let url = self.url(request);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} -> {} ({} bytes)", request.command, status, body.len());

        Ok(RpcResponse { status, body })
    }
}
