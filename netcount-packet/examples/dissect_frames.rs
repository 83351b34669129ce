//! Example: Dissect a handful of hand-built frames
//!
//! Run with: cargo run -p netcount-packet --example dissect_frames

use netcount_packet::{FrameBuilder, LinkType, ParsedPacket};
use std::net::{Ipv4Addr, Ipv6Addr};

fn main() {
    let client = Ipv4Addr::new(192, 168, 1, 10);
    let server = Ipv4Addr::new(93, 184, 216, 34);

    let frames = vec![
        (
            "HTTP request",
            FrameBuilder::new()
                .ethernet()
                .ipv4(client, server)
                .tcp(51000, 80)
                .payload(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n".to_vec())
                .build(),
        ),
        (
            "DNS query",
            FrameBuilder::new()
                .ethernet()
                .ipv4(client, Ipv4Addr::new(1, 1, 1, 1))
                .udp(53124, 53)
                .payload(vec![0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0])
                .build(),
        ),
        (
            "TLS over IPv6, VLAN 42",
            FrameBuilder::new()
                .ethernet()
                .vlan(42)
                .ipv6(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST)
                .tcp(50000, 443)
                .payload(vec![0x16, 0x03, 0x01, 0x00, 0x01, 0x01])
                .build(),
        ),
        ("Runt frame", vec![0xAA; 8]),
    ];

    for (name, bytes) in frames {
        let packet = ParsedPacket::parse(&bytes, LinkType::Ethernet);
        let kinds: Vec<String> = packet.kinds().iter().map(|k| k.to_string()).collect();
        println!(
            "{:<24} {:>4} bytes  [{}]  counted: {}",
            name,
            bytes.len(),
            packet,
            kinds.join(", ")
        );
    }
}
