//! Remote procedure calls against the `/Set.cmd` endpoint of the device.
//!
//! Every RPC is a single HTTP GET whose query string carries the command
//! name followed by `+KEY=VALUE` pairs. The firmware is sensitive to the
//! order of those pairs, so requests keep them exactly as they were added.

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod request;

pub use client::{basic_authorization, HttpRpcClient};
pub use request::{RpcCommand, RpcRequest};

use async_trait::async_trait;

use crate::error::{FenceError, Result};

/// Raw answer of the device to one RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: String,
}

impl RpcResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Return the body if the device answered with 200, an RPC error otherwise.
    pub fn into_body(self, command: RpcCommand) -> Result<String> {
        if self.status != 200 {
            return Err(FenceError::Rpc {
                command: command.as_str(),
                status: self.status,
            });
        }
        Ok(self.body)
    }
}

/// Something able to carry an [`RpcRequest`] to the device.
#[async_trait]
pub trait Rpc: Send + Sync {
    async fn call(&self, request: &RpcRequest) -> Result<RpcResponse>;
}
