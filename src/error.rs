use thiserror::Error;

#[derive(Error, Debug)]
pub enum FenceError {
    #[error("\"{command}\" RPC returned status {status}")]
    Rpc { command: &'static str, status: u16 },

    #[error("Could not parse output of \"{command}\" RPC: {reason}")]
    Parse {
        command: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Connection to device failed: {0}")]
    Connection(#[from] reqwest::Error),
}

impl FenceError {
    pub fn parse(command: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            command,
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, FenceError>;
