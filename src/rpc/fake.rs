use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Rpc, RpcCommand, RpcRequest, RpcResponse};
use crate::error::Result;

/// In-memory device that answers like the firmware and records every call.
pub struct FakeDevice {
    outlets: Mutex<BTreeMap<u8, bool>>,
    time: String,
    failing: Option<RpcCommand>,
    calls: Mutex<Vec<RpcRequest>>,
}

impl FakeDevice {
    pub fn new(outlet_count: u8) -> Self {
        Self {
            outlets: Mutex::new((1..=outlet_count).map(|n| (n, false)).collect()),
            time: "<html><body>2024-02-29 23:59:55</body></html>".to_string(),
            failing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outlet(self, outlet: u8, on: bool) -> Self {
        self.outlets.lock().unwrap().insert(outlet, on);
        self
    }

    pub fn with_time(mut self, body: &str) -> Self {
        self.time = body.to_string();
        self
    }

    pub fn failing(mut self, command: RpcCommand) -> Self {
        self.failing = Some(command);
        self
    }

    pub fn commands(&self) -> Vec<RpcCommand> {
        self.calls.lock().unwrap().iter().map(|r| r.command).collect()
    }

    pub fn calls(&self) -> Vec<RpcRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn outlet(&self, outlet: u8) -> Option<bool> {
        self.outlets.lock().unwrap().get(&outlet).copied()
    }
}

#[async_trait]
impl Rpc for FakeDevice {
    async fn call(&self, request: &RpcRequest) -> Result<RpcResponse> {
        self.calls.lock().unwrap().push(request.clone());

        if self.failing == Some(request.command) {
            return Ok(RpcResponse::new(500, "Internal Error"));
        }

        let body = match request.command {
            RpcCommand::GetPower => {
                let outlets = self.outlets.lock().unwrap();
                let pairs: Vec<String> = outlets
                    .iter()
                    .map(|(n, on)| format!("P{}={}", 59 + n, u8::from(*on)))
                    .collect();
                format!("<html>{}</html>", pairs.join(","))
            }
            RpcCommand::SetPower => {
                let mut outlets = self.outlets.lock().unwrap();
                for (key, value) in &request.args {
                    let n: u8 = key[1..].parse().unwrap();
                    outlets.insert(n - 59, value == "1");
                }
                "<html>$A0</html>".to_string()
            }
            RpcCommand::GetTime => self.time.clone(),
            RpcCommand::SetSchedule => "<html>$A0</html>".to_string(),
        };

        Ok(RpcResponse::new(200, body))
    }
}
