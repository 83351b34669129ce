//! Live packet capture and per-layer statistics for netcount
//!
//! This crate finds capture devices, runs bounded blocking capture sessions
//! on them and tallies how many captured frames carry each tracked protocol
//! layer.
//!
//! ## Features
//!
//! - **Device Registry**: Process-wide interface list with lookup by address or name
//! - **Live Capture**: pcap-backed device lifecycle and a blocking, time-bounded session loop
//! - **Statistics**: Per-layer packet counters plus per-session capture metrics
//!
//! ## Example
//!
//! ```no_run
//! use netcount_capture::{DeviceRegistry, LiveDevice, PacketStats, StopHandle};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let iface = DeviceRegistry::global().find_by_ip("192.168.13.68".parse()?)?;
//! let mut device = LiveDevice::new(iface);
//! device.open()?;
//! let link_type = device.link_type()?;
//!
//! let mut stats = PacketStats::new();
//! device.capture_blocking(Duration::from_secs(5), &StopHandle::new(), |frame| {
//!     stats.consume_frame(&frame, link_type);
//!     false
//! })?;
//!
//! print!("{}", stats);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod interface;
pub mod stats;

// Re-export main types
pub use capture::{run_session, CaptureConfig, FrameSource, LiveDevice, StopHandle};
pub use interface::{
    get_interface, interface_by_ip, list_interfaces, DeviceRegistry, InterfaceInfo,
};
pub use stats::{CaptureSummary, KernelStats, PacketStats, StopReason};
