use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use fence_ip9258::fence::{DEFAULT_DELAY_SECS, DEFAULT_LOGIN, DEFAULT_TIMEOUT_SECS};
use fence_ip9258::{RawOptions, Variant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fence_ip9258")]
#[command(author, version, about = "Fencing driver for the IP Power 9258 remote power switch", long_about = None)]
struct Cli {
    /// IP address or hostname of the power switch
    #[arg(short = 'a', long = "ip-address")]
    ip_address: Option<String>,

    /// Login name
    #[arg(short, long, default_value = DEFAULT_LOGIN)]
    login: String,

    /// Password
    #[arg(short, long)]
    passwd: Option<String>,

    /// Outlet number
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    outlet: Option<i64>,

    /// Action (on, off, reboot, status)
    #[arg(short = 'o', long, default_value = "reboot")]
    action: String,

    /// Seconds the outlet stays off during a reboot
    #[arg(short, long, default_value_t = DEFAULT_DELAY_SECS)]
    reboot_delay: u32,

    /// Seconds to wait for each request to the switch
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Device variant (eight-port, four-port)
    #[arg(long, default_value = "eight-port")]
    variant: String,

    /// Echo options and report errors in full
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_raw(self) -> Result<RawOptions> {
        let variant: Variant = self.variant.parse().map_err(|e: String| anyhow::anyhow!(e))?;

        Ok(RawOptions {
            ipaddr: self.ip_address,
            login: Some(self.login),
            passwd: self.passwd,
            port: self.outlet,
            option: Some(self.action),
            delay: Some(self.reboot_delay),
            timeout: Some(self.timeout),
            debug: self.debug,
            variant,
            ignored: Vec::new(),
        })
    }
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Without arguments the options come as `key=value` lines on stdin.
fn read_options() -> Result<RawOptions> {
    if std::env::args_os().len() > 1 {
        return Cli::parse().into_raw();
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(RawOptions::from_key_values(&input)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let raw = match read_options() {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    setup_logging(raw.debug);
    for key in &raw.ignored {
        debug!("Ignoring unknown option {:?}", key);
    }

    let options = match raw.validate() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if options.debug {
        for line in options.debug_lines() {
            println!("{}", line);
        }
    }

    match fence_ip9258::fence(&options).await {
        Ok(outcome) => {
            println!("{}", outcome);
            ExitCode::SUCCESS
        }
        Err(err) if err.is_validation() => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) if options.debug => {
            eprintln!("Error: {:?}", anyhow::Error::from(err));
            ExitCode::FAILURE
        }
        Err(_) => {
            eprintln!("An error occurred. Try --debug.");
            ExitCode::FAILURE
        }
    }
}
