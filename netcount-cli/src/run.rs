//! One capture run: find the device, capture, report

use crate::config::SessionConfig;
use netcount_capture::{
    CaptureSummary, DeviceRegistry, InterfaceInfo, LiveDevice, PacketStats, StopHandle,
};
use netcount_core::{Frame, Result};
use netcount_packet::LinkType;
use std::io::Write;
use tracing::{debug, info};

/// Printed before anything else
pub const BANNER: &str = "This is a test program for capturing traffic at the network level";

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct Report {
    pub interface: InterfaceInfo,
    pub stats: PacketStats,
    pub summary: CaptureSummary,
}

/// Capture on the interface owning the configured address and write the
/// interface block and layer counts to `out`
pub fn run<W: Write>(config: &SessionConfig, out: &mut W) -> Result<Report> {
    run_with_registry(DeviceRegistry::global(), config, out)
}

/// Same as [`run`], resolving the interface through `registry`
pub fn run_with_registry<W: Write>(
    registry: &DeviceRegistry,
    config: &SessionConfig,
    out: &mut W,
) -> Result<Report> {
    writeln!(out, "{}\n", BANNER)?;

    let interface = registry.find_by_ip(config.interface_ip)?;
    debug!("Selected {} for {}", interface.name, config.interface_ip);
    write!(out, "{}", interface.describe())?;

    let mut device = LiveDevice::with_config(interface.clone(), config.capture.clone());
    device.open()?;
    let link_type = device.link_type()?;

    let mut stats = PacketStats::new();
    let summary = capture_and_report(&mut stats, link_type, out, |on_frame| {
        device.capture_blocking(config.duration, &StopHandle::new(), on_frame)
    })?;
    device.close();

    Ok(Report {
        interface,
        stats,
        summary,
    })
}

/// Zero `stats`, run one session through `capture` counting every frame,
/// then write the layer counts to `out`
pub fn capture_and_report<W, C>(
    stats: &mut PacketStats,
    link_type: LinkType,
    out: &mut W,
    capture: C,
) -> Result<CaptureSummary>
where
    W: Write,
    C: FnOnce(&mut dyn FnMut(Frame) -> bool) -> Result<CaptureSummary>,
{
    writeln!(out, "\nStarting capture in blocking mode...")?;
    out.flush()?;

    stats.reset();
    let summary = capture(&mut |frame: Frame| {
        stats.consume_frame(&frame, link_type);
        false
    })?;

    info!("Capture finished:\n{}", summary.format());

    writeln!(out, "\nResults:")?;
    write!(out, "{}", stats)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Cli;
    use clap::Parser;
    use netcount_capture::{run_session, FrameSource, StopReason};
    use netcount_core::Error;
    use netcount_packet::FrameBuilder;
    use std::collections::VecDeque;
    use std::net::Ipv4Addr;
    use std::time::{Duration, SystemTime};

    struct QueuedFrames(VecDeque<Frame>);

    impl FrameSource for QueuedFrames {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            Ok(self.0.pop_front())
        }
    }

    fn frame(data: Vec<u8>) -> Frame {
        Frame::new(SystemTime::now(), data)
    }

    fn config_for(addr: &str) -> SessionConfig {
        let cli = Cli::try_parse_from(["netcount", "--interface-ip", addr]).unwrap();
        SessionConfig::from_cli(&cli).unwrap()
    }

    #[test]
    fn test_capture_and_report() {
        let client = Ipv4Addr::new(192, 168, 13, 68);
        let server = Ipv4Addr::new(192, 168, 13, 1);
        let http = FrameBuilder::new()
            .ethernet()
            .ipv4(client, server)
            .tcp(51000, 80)
            .payload(b"GET / HTTP/1.1\r\n\r\n".to_vec())
            .build();
        let dns = FrameBuilder::new()
            .ethernet()
            .ipv4(client, server)
            .udp(40000, 53)
            .payload(vec![0u8; 12])
            .build();

        // Counts left over from an earlier session must not leak in
        let mut stats = PacketStats::new();
        stats.consume_frame(&frame(http.clone()), LinkType::Ethernet);
        assert!(!stats.is_zero());

        let mut source = QueuedFrames(VecDeque::from([
            frame(http),
            frame(dns),
            frame(vec![0xFF; 4]),
        ]));

        let mut out = Vec::new();
        let summary = capture_and_report(&mut stats, LinkType::Ethernet, &mut out, |on_frame| {
            run_session(&mut source, Duration::from_millis(20), &StopHandle::new(), on_frame)
        })
        .unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.reason, StopReason::BudgetElapsed);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("\nStarting capture in blocking mode...\n"));
        let results = printed.split("\nResults:\n").nth(1).unwrap();
        assert_eq!(
            results.lines().collect::<Vec<_>>(),
            vec![
                "Ethernet packet count: 2",
                "IPv4 packet count:     2",
                "IPv6 packet count:     0",
                "TCP packet count:      1",
                "UDP packet count:      1",
                "DNS packet count:      1",
                "HTTP packet count:     1",
                "SSL packet count:      0",
            ]
        );
    }

    #[test]
    fn test_capture_error_skips_results() {
        let mut stats = PacketStats::new();
        let mut out = Vec::new();
        let err = capture_and_report(&mut stats, LinkType::Ethernet, &mut out, |_| {
            Err(Error::capture("interface went down"))
        })
        .unwrap_err();

        assert!(matches!(err, Error::Capture(_)));
        assert!(!String::from_utf8(out).unwrap().contains("Results:"));
    }

    #[test]
    fn test_unknown_address_fails_after_banner() {
        let registry = DeviceRegistry::from_devices(Vec::new());
        let config = config_for("203.0.113.7");

        let mut out = Vec::new();
        let err = run_with_registry(&registry, &config, &mut out).unwrap_err();

        assert!(matches!(err, Error::DeviceNotFound(_)));
        assert_eq!(
            err.to_string(),
            "Cannot find interface with address '203.0.113.7'"
        );
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n\n", BANNER));
    }

    #[test]
    fn test_unopenable_device_reports_open_error() {
        let interface = InterfaceInfo {
            name: "netcount-test-missing0".to_string(),
            description: String::new(),
            mac: None,
            networks: vec!["203.0.113.7/32".parse().unwrap()],
            is_up: true,
            is_loopback: false,
            mtu: None,
            default_gateway: None,
            dns_servers: Vec::new(),
        };
        let registry = DeviceRegistry::from_devices(vec![interface]);
        let config = config_for("203.0.113.7");

        let mut out = Vec::new();
        let err = run_with_registry(&registry, &config, &mut out).unwrap_err();

        assert!(matches!(err, Error::DeviceOpen { .. }));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(BANNER));
        assert!(printed.contains("Interface info:"));
        assert!(!printed.contains("Results:"));
    }
}
