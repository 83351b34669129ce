//! CLI argument parsing

use clap::Parser;
use std::net::IpAddr;

/// Address of the interface captured on when none is given
pub const DEFAULT_INTERFACE_IP: &str = "192.168.13.68";

/// Session length in seconds when none is given
pub const DEFAULT_DURATION_SECS: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "netcount")]
#[command(
    version,
    about = "Capture traffic on one interface and count packets per protocol layer",
    long_about = None
)]
pub struct Cli {
    /// IP address assigned to the interface to capture on
    #[arg(short = 'i', long, value_name = "ADDR", default_value = DEFAULT_INTERFACE_IP)]
    pub interface_ip: IpAddr,

    /// Capture duration in seconds
    #[arg(short = 'd', long, value_name = "SECONDS", default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u64,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level directive for the netcount crates
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
