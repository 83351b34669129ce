//! Per-layer packet counters and capture session statistics

use netcount_core::Frame;
use netcount_packet::{LayerKind, LinkType, ParsedPacket};
use std::fmt;
use std::time::Duration;

/// Width of the label column in the counter report
const LABEL_WIDTH: usize = 23;

/// Per-layer packet counters.
///
/// Each of the eight tracked layer kinds has its own counter. A frame bumps
/// every counter whose layer appears anywhere in its chain, so one frame
/// usually counts several times (Ethernet, IPv4 and TCP at least).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketStats {
    counts: [u64; LayerKind::COUNT],
}

impl PacketStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        self.counts = [0; LayerKind::COUNT];
    }

    /// Count one parsed packet
    pub fn consume(&mut self, packet: &ParsedPacket) {
        for kind in LayerKind::ALL {
            if packet.is_packet_of_type(kind) {
                self.counts[kind.index()] += 1;
            }
        }
    }

    /// Dissect a captured frame and count it
    pub fn consume_frame(&mut self, frame: &Frame, link_type: LinkType) {
        self.consume(&ParsedPacket::from_frame(frame, link_type));
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> PacketStats {
        *self
    }

    /// Counter for one kind
    pub fn count(&self, kind: LayerKind) -> u64 {
        self.counts[kind.index()]
    }

    /// Counters in report order
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, u64)> + '_ {
        LayerKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.count(kind)))
    }

    /// Check if nothing has been counted
    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Format counters as the console report, one line per kind
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PacketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in self.iter() {
            let label = format!("{} packet count:", kind.label());
            writeln!(f, "{:<width$}{}", label, count, width = LABEL_WIDTH)?;
        }
        Ok(())
    }
}

/// Why a capture session ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// The session duration elapsed
    #[default]
    BudgetElapsed,
    /// The frame callback asked to stop
    Requested,
    /// The stop handle was triggered
    Stopped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BudgetElapsed => write!(f, "duration elapsed"),
            StopReason::Requested => write!(f, "requested by callback"),
            StopReason::Stopped => write!(f, "stopped"),
        }
    }
}

/// Counters kept by the kernel for a capture handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelStats {
    /// Packets that passed the filter
    pub received: u64,
    /// Packets dropped for lack of buffer space
    pub dropped: u64,
    /// Packets dropped by the interface or its driver
    pub if_dropped: u64,
}

impl From<pcap::Stat> for KernelStats {
    fn from(stats: pcap::Stat) -> Self {
        Self {
            received: stats.received as u64,
            dropped: stats.dropped as u64,
            if_dropped: stats.if_dropped as u64,
        }
    }
}

impl KernelStats {
    /// Calculate drop rate as percentage
    pub fn drop_rate(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        (self.dropped as f64 / self.received as f64) * 100.0
    }
}

/// Statistics for one capture session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSummary {
    /// Frames handed to the callback
    pub frames: u64,
    /// Captured bytes handed to the callback
    pub bytes: u64,
    /// Session wall time
    pub elapsed: Duration,
    /// How the session ended
    pub reason: StopReason,
    /// Kernel counters, when the source reports them
    pub kernel: Option<KernelStats>,
}

impl CaptureSummary {
    pub(crate) fn record_frame(&mut self, size: usize) {
        self.frames += 1;
        self.bytes += size as u64;
    }

    /// Frames per second over the session
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        let mut out = format!(
            "Captured: {} frames ({} bytes)\n\
             Duration: {:.2}s ({})\n\
             Rate: {:.2} fps",
            self.frames,
            self.bytes,
            self.elapsed.as_secs_f64(),
            self.reason,
            self.frames_per_second(),
        );
        if let Some(kernel) = self.kernel {
            out.push_str(&format!(
                "\nKernel: {} received, {} dropped ({:.2}%), {} IF dropped",
                kernel.received,
                kernel.dropped,
                kernel.drop_rate(),
                kernel.if_dropped
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcount_packet::{FrameBuilder, Protocol};
    use std::net::Ipv4Addr;
    use std::time::SystemTime;

    fn http_packet() -> ParsedPacket {
        ParsedPacket::from_layers([
            Protocol::Ethernet,
            Protocol::Ipv4,
            Protocol::Tcp,
            Protocol::Http,
        ])
    }

    fn dns_packet() -> ParsedPacket {
        ParsedPacket::from_layers([
            Protocol::Ethernet,
            Protocol::Ipv4,
            Protocol::Udp,
            Protocol::Dns,
        ])
    }

    fn expect(stats: &PacketStats, expected: [u64; LayerKind::COUNT]) {
        for kind in LayerKind::ALL {
            assert_eq!(stats.count(kind), expected[kind.index()], "{} counter", kind);
        }
    }

    #[test]
    fn test_new_is_zero() {
        let stats = PacketStats::new();
        assert!(stats.is_zero());
        assert_eq!(stats, PacketStats::default());
    }

    #[test]
    fn test_http_packet_counts() {
        let mut stats = PacketStats::new();
        stats.consume(&http_packet());
        //             eth ip4 ip6 tcp udp dns http ssl
        expect(&stats, [1, 1, 0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn test_dns_packet_counts() {
        let mut stats = PacketStats::new();
        stats.consume(&dns_packet());
        expect(&stats, [1, 1, 0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_counters_are_independent() {
        let mut stats = PacketStats::new();
        for kind in LayerKind::ALL {
            let before = stats.snapshot();
            let packet = ParsedPacket::from_layers(
                [
                    Protocol::Ethernet,
                    Protocol::Ipv4,
                    Protocol::Ipv6,
                    Protocol::Tcp,
                    Protocol::Udp,
                    Protocol::Dns,
                    Protocol::Http,
                    Protocol::Ssl,
                ]
                .into_iter()
                .filter(|layer| layer.kind() == Some(kind)),
            );
            stats.consume(&packet);
            for other in LayerKind::ALL {
                let delta = stats.count(other) - before.count(other);
                assert_eq!(delta, u64::from(other == kind), "{} after {}", other, kind);
            }
        }
    }

    #[test]
    fn test_unrecognized_frame_changes_nothing() {
        let mut stats = PacketStats::new();
        stats.consume(&http_packet());
        let before = stats.snapshot();

        stats.consume(&ParsedPacket::default());
        stats.consume(&ParsedPacket::from_layers([Protocol::Vlan, Protocol::Payload]));

        assert_eq!(stats, before);
    }

    #[test]
    fn test_reset_then_sequence_matches_fresh() {
        let sequence = [http_packet(), dns_packet(), http_packet()];

        let mut fresh = PacketStats::new();
        for packet in &sequence {
            fresh.consume(packet);
        }

        let mut reused = PacketStats::new();
        reused.consume(&dns_packet());
        reused.consume(&dns_packet());
        reused.reset();
        assert!(reused.is_zero());
        for packet in &sequence {
            reused.consume(packet);
        }

        assert_eq!(reused, fresh);
    }

    #[test]
    fn test_counters_monotonic() {
        let mut stats = PacketStats::new();
        let sequence = [
            http_packet(),
            ParsedPacket::default(),
            dns_packet(),
            http_packet(),
        ];

        let mut previous = stats.snapshot();
        for packet in &sequence {
            stats.consume(packet);
            for kind in LayerKind::ALL {
                assert!(stats.count(kind) >= previous.count(kind));
            }
            previous = stats.snapshot();
        }
    }

    #[test]
    fn test_identical_frames_counted_each_time() {
        let mut stats = PacketStats::new();
        for _ in 0..3 {
            stats.consume(&http_packet());
        }
        assert_eq!(stats.count(LayerKind::Http), 3);
        assert_eq!(stats.count(LayerKind::Ethernet), 3);
    }

    #[test]
    fn test_consume_frame() {
        let data = FrameBuilder::new()
            .ethernet()
            .ipv4(Ipv4Addr::new(192, 168, 13, 68), Ipv4Addr::new(192, 168, 13, 1))
            .udp(40000, 53)
            .payload(vec![0u8; 12])
            .build();
        let frame = Frame::new(SystemTime::now(), data);

        let mut stats = PacketStats::new();
        stats.consume_frame(&frame, LinkType::Ethernet);
        expect(&stats, [1, 1, 0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut stats = PacketStats::new();
        stats.consume(&http_packet());
        let snapshot = stats.snapshot();
        stats.consume(&http_packet());

        assert_eq!(snapshot.count(LayerKind::Tcp), 1);
        assert_eq!(stats.count(LayerKind::Tcp), 2);
    }

    #[test]
    fn test_format_zero() {
        let text = PacketStats::new().format();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        for line in &lines {
            assert!(line.ends_with(" 0"), "{:?}", line);
        }
    }

    #[test]
    fn test_format_layout() {
        let mut stats = PacketStats::new();
        for _ in 0..12 {
            stats.consume(&http_packet());
        }

        let text = stats.format();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Ethernet packet count: 12",
                "IPv4 packet count:     12",
                "IPv6 packet count:     0",
                "TCP packet count:      12",
                "UDP packet count:      0",
                "DNS packet count:      0",
                "HTTP packet count:     12",
                "SSL packet count:      0",
            ]
        );
        assert_eq!(text, stats.to_string());
    }

    #[test]
    fn test_iter_report_order() {
        let kinds: Vec<LayerKind> = PacketStats::new().iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, LayerKind::ALL.to_vec());
    }

    #[test]
    fn test_kernel_drop_rate() {
        let kernel = KernelStats {
            received: 100,
            dropped: 10,
            if_dropped: 0,
        };
        assert_eq!(kernel.drop_rate(), 10.0);
        assert_eq!(KernelStats::default().drop_rate(), 0.0);
    }

    #[test]
    fn test_summary_format() {
        let mut summary = CaptureSummary {
            elapsed: Duration::from_secs(2),
            ..Default::default()
        };
        summary.record_frame(64);
        summary.record_frame(128);

        assert_eq!(summary.frames, 2);
        assert_eq!(summary.bytes, 192);
        assert_eq!(summary.frames_per_second(), 1.0);

        let formatted = summary.format();
        assert!(formatted.contains("2 frames (192 bytes)"));
        assert!(formatted.contains("duration elapsed"));
        assert!(!formatted.contains("Kernel"));

        summary.kernel = Some(KernelStats {
            received: 2,
            dropped: 0,
            if_dropped: 0,
        });
        assert!(summary.format().contains("Kernel: 2 received"));
    }

    #[test]
    fn test_summary_zero_elapsed_rate() {
        assert_eq!(CaptureSummary::default().frames_per_second(), 0.0);
    }
}
