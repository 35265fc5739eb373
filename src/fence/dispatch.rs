use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::{Action, Options};
use crate::device::{PowerSwitch, RebootStrategy};
use crate::error::Result;
use crate::rpc::Rpc;

/// What an action did, printed as the single result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyOn,
    PoweredOn,
    AlreadyOff,
    PoweredOff,
    RebootScheduled(NaiveDateTime),
    Rebooted,
    Status(bool),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadyOn => write!(f, "Success: Already ON"),
            Outcome::PoweredOn => write!(f, "Success: Powered ON"),
            Outcome::AlreadyOff => write!(f, "Success: Already OFF"),
            Outcome::PoweredOff => write!(f, "Success: Powered OFF"),
            Outcome::RebootScheduled(_) => {
                write!(f, "Success: Powered OFF and scheduled power ON")
            }
            Outcome::Rebooted => write!(f, "Success: Rebooted"),
            Outcome::Status(true) => write!(f, "Status: ON"),
            Outcome::Status(false) => write!(f, "Status: OFF"),
        }
    }
}

/// Carry out the requested action on the configured outlet.
pub async fn run<R: Rpc>(switch: &PowerSwitch<R>, options: &Options) -> Result<Outcome> {
    let outlet = options.outlet;
    info!("Running {} on outlet {}", options.action, outlet);

    let outcome = match options.action {
        Action::On => {
            if switch.get_power(outlet).await? {
                Outcome::AlreadyOn
            } else {
                switch.set_power(outlet, true).await?;
                Outcome::PoweredOn
            }
        }
        Action::Off => {
            if switch.get_power(outlet).await? {
                switch.set_power(outlet, false).await?;
                Outcome::PoweredOff
            } else {
                Outcome::AlreadyOff
            }
        }
        Action::Reboot => match options.variant.reboot_strategy() {
            RebootStrategy::Scheduled => {
                let was_on = switch.get_power(outlet).await?;
                debug!(
                    "Outlet {} is {} before reboot",
                    outlet,
                    if was_on { "on" } else { "off" }
                );
                let at = switch.scheduled_reboot(outlet, options.delay).await?;
                Outcome::RebootScheduled(at)
            }
            RebootStrategy::Sequential => {
                let delay = Duration::from_secs(u64::from(options.delay));
                switch.sequential_reboot(outlet, delay).await?;
                Outcome::Rebooted
            }
        },
        Action::Status => Outcome::Status(switch.get_power(outlet).await?),
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Variant;
    use crate::error::FenceError;
    use crate::fence::RawOptions;
    use crate::rpc::fake::FakeDevice;
    use crate::rpc::RpcCommand;

    fn options(action: &str, variant: Variant, port: i64) -> Options {
        RawOptions {
            ipaddr: Some("10.0.0.1".to_string()),
            passwd: Some("pw".to_string()),
            port: Some(port),
            option: Some(action.to_string()),
            delay: Some(0),
            variant,
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_on_when_off() {
        let switch = PowerSwitch::new(FakeDevice::new(8));
        let outcome = run(&switch, &options("on", Variant::EightPort, 2)).await.unwrap();

        assert_eq!(outcome, Outcome::PoweredOn);
        assert_eq!(outcome.to_string(), "Success: Powered ON");
        assert_eq!(switch.rpc().outlet(2), Some(true));
    }

    #[tokio::test]
    async fn test_on_when_already_on_skips_set() {
        let switch = PowerSwitch::new(FakeDevice::new(8).with_outlet(2, true));
        let outcome = run(&switch, &options("on", Variant::EightPort, 2)).await.unwrap();

        assert_eq!(outcome.to_string(), "Success: Already ON");
        assert_eq!(switch.rpc().commands(), vec![RpcCommand::GetPower]);
    }

    #[tokio::test]
    async fn test_off() {
        let switch = PowerSwitch::new(FakeDevice::new(8).with_outlet(6, true));
        let outcome = run(&switch, &options("off", Variant::EightPort, 6)).await.unwrap();
        assert_eq!(outcome, Outcome::PoweredOff);
        assert_eq!(switch.rpc().outlet(6), Some(false));

        let outcome = run(&switch, &options("off", Variant::EightPort, 6)).await.unwrap();
        assert_eq!(outcome.to_string(), "Success: Already OFF");
    }

    #[tokio::test]
    async fn test_status_is_read_only() {
        let switch = PowerSwitch::new(FakeDevice::new(8).with_outlet(1, true));
        let outcome = run(&switch, &options("status", Variant::EightPort, 1))
            .await
            .unwrap();

        assert_eq!(outcome.to_string(), "Status: ON");
        assert_eq!(switch.rpc().commands(), vec![RpcCommand::GetPower]);
    }

    #[tokio::test]
    async fn test_reboot_eight_port_schedules_first() {
        let switch = PowerSwitch::new(FakeDevice::new(8).with_outlet(5, true));
        let outcome = run(&switch, &options("reboot", Variant::EightPort, 5))
            .await
            .unwrap();

        assert_eq!(
            outcome.to_string(),
            "Success: Powered OFF and scheduled power ON"
        );
        assert_eq!(
            switch.rpc().commands(),
            vec![
                RpcCommand::GetPower,
                RpcCommand::GetTime,
                RpcCommand::SetSchedule,
                RpcCommand::SetPower
            ]
        );
    }

    #[tokio::test]
    async fn test_reboot_aborts_when_outlet_unreadable() {
        let switch = PowerSwitch::new(FakeDevice::new(4));
        let err = run(&switch, &options("reboot", Variant::EightPort, 7))
            .await
            .unwrap_err();

        assert!(matches!(err, FenceError::Parse { command: "GetPower", .. }));
        assert_eq!(switch.rpc().commands(), vec![RpcCommand::GetPower]);
    }

    #[tokio::test]
    async fn test_reboot_aborts_when_power_query_fails() {
        let device = FakeDevice::new(8)
            .with_outlet(1, true)
            .failing(RpcCommand::GetPower);
        let switch = PowerSwitch::new(device);
        let err = run(&switch, &options("reboot", Variant::EightPort, 1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FenceError::Rpc {
                command: "GetPower",
                status: 500
            }
        ));
        assert_eq!(switch.rpc().commands(), vec![RpcCommand::GetPower]);
        assert_eq!(switch.rpc().outlet(1), Some(true));
    }

    #[tokio::test]
    async fn test_reboot_four_port_is_sequential() {
        let switch = PowerSwitch::new(FakeDevice::new(4).with_outlet(3, true));
        let outcome = run(&switch, &options("reboot", Variant::FourPort, 3))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Rebooted);
        assert_eq!(
            switch.rpc().commands(),
            vec![RpcCommand::SetPower, RpcCommand::SetPower]
        );
        assert_eq!(switch.rpc().outlet(3), Some(true));
    }

    #[tokio::test]
    async fn test_missing_outlet_in_report() {
        let switch = PowerSwitch::new(FakeDevice::new(4));
        let err = run(&switch, &options("status", Variant::EightPort, 7))
            .await
            .unwrap_err();
        assert!(matches!(err, FenceError::Parse { .. }));
    }
}
