//! Session configuration resolved from the command line

use crate::args::Cli;
use netcount_capture::CaptureConfig;
use netcount_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;

/// Everything one capture run needs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Address used to pick the capture interface
    pub interface_ip: IpAddr,
    /// How long to capture
    pub duration: Duration,
    /// pcap handle settings
    pub capture: CaptureConfig,
}

impl SessionConfig {
    /// Validate the parsed arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.duration == 0 {
            return Err(Error::InvalidConfig(
                "capture duration must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            interface_ip: cli.interface_ip,
            duration: Duration::from_secs(cli.duration),
            capture: CaptureConfig::default(),
        })
    }
}
