//! # fence-ip9258
//!
//! Fencing driver for the IP Power 9258 remote power switch.
//!
//! ## Example
//!
//! ```no_run
//! use fence_ip9258::{fence, RawOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = RawOptions {
//!         ipaddr: Some("192.168.1.100".to_string()),
//!         passwd: Some("12345678".to_string()),
//!         port: Some(3),
//!         option: Some("reboot".to_string()),
//!         ..Default::default()
//!     }
//!     .validate()?;
//!
//!     println!("{}", fence(&options).await?);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod fence;
pub mod rpc;

pub use device::{PowerStatus, PowerSwitch, RebootStrategy, Variant};
pub use error::{FenceError, Result};
pub use fence::{Action, Options, Outcome, RawOptions};
pub use rpc::{HttpRpcClient, Rpc, RpcCommand, RpcRequest, RpcResponse};

/// Run the configured action against the device over HTTP.
pub async fn fence(options: &Options) -> Result<Outcome> {
    let client = HttpRpcClient::new(
        &options.ipaddr,
        &options.login,
        &options.passwd,
        options.timeout,
    )?;
    let switch = PowerSwitch::new(client);
    fence::run(&switch, options).await
}
