//! Example: Count protocol layers on the interface that owns an address
//!
//! Note: Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example layer_counts -- 192.168.13.68

use netcount_capture::{interface_by_ip, LiveDevice, PacketStats, StopHandle};
use std::net::IpAddr;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ip: IpAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1".to_string())
        .parse()?;

    let iface = interface_by_ip(ip)?;
    print!("{}", iface.describe());

    let mut device = LiveDevice::new(iface);
    device.open()?;
    let link_type = device.link_type()?;

    let mut stats = PacketStats::new();
    let summary = device.capture_blocking(Duration::from_secs(3), &StopHandle::new(), |frame| {
        stats.consume_frame(&frame, link_type);
        false
    })?;

    println!("\n{}", summary.format());
    println!("\n{}", stats);
    Ok(())
}
