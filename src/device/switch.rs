use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use tracing::{debug, info, warn};

use super::{outlet_param, parse_power, parse_time, PowerStatus, SCHEDULE_PAD_SECS};
use crate::error::{FenceError, Result};
use crate::rpc::{Rpc, RpcCommand, RpcRequest};

/// `PARAM` value of a schedule entry that fires once and then disarms.
const SCHEDULE_ONE_SHOT: &str = "128";

/// Handle on one power switch, talking through any [`Rpc`] transport.
pub struct PowerSwitch<R> {
    rpc: R,
}

impl<R: Rpc> PowerSwitch<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    async fn execute(&self, request: RpcRequest) -> Result<String> {
        let response = self.rpc.call(&request).await?;
        response.into_body(request.command)
    }

    /// Query the power state of every outlet.
    pub async fn power_status(&self) -> Result<PowerStatus> {
        let body = self.execute(RpcRequest::new(RpcCommand::GetPower)).await?;
        parse_power(&body)
    }

    pub async fn get_power(&self, outlet: u8) -> Result<bool> {
        self.power_status().await?.outlet(outlet)
    }

    /// Switch one outlet. The new state is not read back.
    pub async fn set_power(&self, outlet: u8, on: bool) -> Result<()> {
        let request = RpcRequest::new(RpcCommand::SetPower)
            .arg(outlet_param(outlet), if on { "1" } else { "0" });
        self.execute(request).await?;
        info!("Outlet {} powered {}", outlet, if on { "on" } else { "off" });
        Ok(())
    }

    /// Current time according to the device clock.
    pub async fn device_time(&self) -> Result<NaiveDateTime> {
        let body = self.execute(RpcRequest::new(RpcCommand::GetTime)).await?;
        parse_time(&body)
    }

    /// Program a one-shot power-on of `outlet` at `at`, in device time.
    pub async fn schedule_power_on(&self, outlet: u8, at: NaiveDateTime) -> Result<()> {
        let request = RpcRequest::new(RpcCommand::SetSchedule)
            .arg("Power", format!("{}A", outlet))
            .arg("YY", format!("{:04}", at.year()))
            .arg("MM", format!("{:02}", at.month()))
            .arg("DD", format!("{:02}", at.day()))
            .arg("HH", format!("{:02}", at.hour()))
            .arg("MN", format!("{:02}", at.minute()))
            .arg("SS", format!("{:02}", at.second()))
            .arg("PARAM", SCHEDULE_ONE_SHOT)
            .arg("ONOFF", "1");
        self.execute(request).await?;
        info!("Scheduled power on of outlet {} at {}", outlet, at);
        Ok(())
    }

    /// Reboot `outlet` even if this process runs on the machine behind it.
    ///
    /// The power-on is committed to the device before power is cut, so the
    /// outlet comes back even if we never run again. If scheduling fails the
    /// outlet is left untouched. Returns the scheduled power-on time.
    pub async fn scheduled_reboot(&self, outlet: u8, delay_secs: u32) -> Result<NaiveDateTime> {
        let now = self.device_time().await?;
        debug!("Device time is {}", now);

        let at = TimeDelta::try_seconds(i64::from(SCHEDULE_PAD_SECS) + i64::from(delay_secs))
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| {
                FenceError::parse("GetTime", format!("{} is out of range", now))
            })?;

        self.schedule_power_on(outlet, at).await?;
        self.set_power(outlet, false).await?;
        Ok(at)
    }

    /// Reboot `outlet` by switching it off, sleeping, and switching it on.
    ///
    /// Not safe when fencing the node running this process: power is never
    /// restored if we die during the sleep.
    pub async fn sequential_reboot(&self, outlet: u8, delay: Duration) -> Result<()> {
        warn!(
            "Outlet {} is rebooted from this process; it stays off if this node loses power",
            outlet
        );
        self.set_power(outlet, false).await?;
        tokio::time::sleep(delay).await;
        self.set_power(outlet, true).await
    }
}
