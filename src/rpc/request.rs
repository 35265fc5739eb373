use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCommand {
    GetPower,
    SetPower,
    GetTime,
    SetSchedule,
}

impl RpcCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcCommand::GetPower => "GetPower",
            RpcCommand::SetPower => "SetPower",
            RpcCommand::GetTime => "GetTime",
            RpcCommand::SetSchedule => "SetSchedule",
        }
    }
}

impl fmt::Display for RpcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub command: RpcCommand,
    pub args: Vec<(String, String)>,
}

impl RpcRequest {
    pub fn new(command: RpcCommand) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    /// Append an argument. Arguments are sent in insertion order.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path and query of the request, e.g. `/Set.cmd?CMD=SetPower+P60=1`.
    pub fn path(&self) -> String {
        let mut path = format!("/Set.cmd?CMD={}", self.command);
        for (key, value) in &self.args {
            path.push('+');
            path.push_str(key);
            path.push('=');
            path.push_str(value);
        }
        path
    }
}
