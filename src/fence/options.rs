use std::time::Duration;

use crate::device::Variant;
use crate::error::{FenceError, Result};

pub const DEFAULT_LOGIN: &str = "admin";
pub const DEFAULT_DELAY_SECS: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_DELAY_SECS: u32 = 86_400;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
    #[default]
    Reboot,
    Status,
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "on" => Ok(Action::On),
            "off" => Ok(Action::Off),
            "reboot" => Ok(Action::Reboot),
            "status" => Ok(Action::Status),
            _ => Err(format!("illegal action: {}", s)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::On => write!(f, "on"),
            Action::Off => write!(f, "off"),
            Action::Reboot => write!(f, "reboot"),
            Action::Status => write!(f, "status"),
        }
    }
}

/// Options as supplied on the command line or on standard input, before
/// any checking.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub ipaddr: Option<String>,
    pub login: Option<String>,
    pub passwd: Option<String>,
    pub port: Option<i64>,
    pub option: Option<String>,
    pub delay: Option<u32>,
    pub timeout: Option<u64>,
    pub debug: bool,
    pub variant: Variant,
    /// Keys read from stdin that this agent does not know.
    pub ignored: Vec<String>,
}

impl RawOptions {
    /// Read newline separated `key=value` pairs, the way fence daemons pass
    /// arguments to agents. Unknown keys are ignored.
    pub fn from_key_values(input: &str) -> Result<Self> {
        let mut raw = RawOptions::default();

        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (key, value) = line.split_once('=').ok_or_else(|| {
                FenceError::Validation(format!("malformed input line: {}", line))
            })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "ipaddr" => raw.ipaddr = Some(value.to_string()),
                "login" => raw.login = Some(value.to_string()),
                "passwd" => raw.passwd = Some(value.to_string()),
                "option" => raw.option = Some(value.to_string()),
                "port" => raw.port = Some(parse_number(key, value)?),
                "delay" => raw.delay = Some(parse_number(key, value)?),
                "timeout" => raw.timeout = Some(parse_number(key, value)?),
                "debug" => raw.debug = parse_number::<i64>(key, value)? != 0,
                _ => raw.ignored.push(key.to_string()),
            }
        }

        Ok(raw)
    }

    /// Check everything that can be checked without talking to the device.
    pub fn validate(self) -> Result<Options> {
        let ipaddr = required(self.ipaddr, "IPADDR")?;
        let passwd = required(self.passwd, "PASSWD")?;

        let port = match self.port {
            None | Some(0) => return Err(missing("PORT")),
            Some(port) => port,
        };
        let outlets = i64::from(self.variant.outlets());
        if !(1..=outlets).contains(&port) {
            return Err(FenceError::Validation(format!("illegal port: {}", port)));
        }

        let option = self.option.unwrap_or_else(|| Action::default().to_string());
        let action: Action = option.parse().map_err(FenceError::Validation)?;
        if action == Action::Status && !self.variant.supports_status() {
            return Err(FenceError::Validation(format!("illegal action: {}", option)));
        }

        let delay = self.delay.unwrap_or(DEFAULT_DELAY_SECS);
        if delay > MAX_DELAY_SECS {
            return Err(FenceError::Validation(format!(
                "illegal reboot delay: {}",
                delay
            )));
        }

        Ok(Options {
            ipaddr,
            login: self.login.unwrap_or_else(|| DEFAULT_LOGIN.to_string()),
            passwd,
            outlet: port as u8,
            action,
            delay,
            timeout: Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            debug: self.debug,
            variant: self.variant,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| FenceError::Validation(format!("invalid value for {}: {}", key, value)))
}

fn missing(name: &str) -> FenceError {
    FenceError::Validation(format!("missing required argument: {}", name))
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| missing(name))
}

/// Validated options for one invocation.
#[derive(Debug, Clone)]
pub struct Options {
    pub ipaddr: String,
    pub login: String,
    pub passwd: String,
    pub outlet: u8,
    pub action: Action,
    /// Seconds the outlet stays off during a reboot.
    pub delay: u32,
    pub timeout: Duration,
    pub debug: bool,
    pub variant: Variant,
}

impl Options {
    /// Lines echoed before execution in debug mode. The password is masked.
    pub fn debug_lines(&self) -> Vec<String> {
        vec![
            format!("IPADDR: {}", self.ipaddr),
            format!("LOGIN: {}", self.login),
            format!("PASSWD: {}", "*".repeat(self.passwd.len())),
            format!("PORT: {}", self.outlet),
            format!("OPTION: {}", self.action),
            format!("DEBUG: {}", self.debug),
        ]
    }
}
