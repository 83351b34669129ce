//! Layer-by-layer dissection of captured frames
//!
//! Each stage pushes the layer it recognised and hands the remaining bytes
//! to the next stage. A stage that cannot read its header returns without
//! pushing, which ends the chain. Nothing here can fail.

use crate::app;
use crate::ethernet::{EtherType, EthernetHeader, VlanTag};
use crate::ip::{IpProtocol, Ipv4Header, Ipv6Header};
use crate::layer::{ParsedPacket, Protocol};
use crate::link::{loopback_family, LinkType, LoopbackFamily, SllHeader, LOOPBACK_HEADER_SIZE};
use crate::tcp::{TcpHeader, TcpPort};
use crate::udp::UdpHeader;

/// Deepest IP-in-IP nesting followed
const MAX_TUNNEL_DEPTH: usize = 4;

/// Deepest VLAN tag stack followed
const MAX_VLAN_TAGS: usize = 4;

pub(crate) fn dissect(data: &[u8], link_type: LinkType, packet: &mut ParsedPacket) {
    match link_type {
        LinkType::Ethernet => ethernet(data, packet),
        LinkType::LinuxSll => {
            if let Some(sll) = SllHeader::parse(data) {
                ethertype(sll.protocol, sll.payload, packet);
            }
        }
        LinkType::Null | LinkType::Loop => {
            match loopback_family(data) {
                Some(LoopbackFamily::Inet) => ipv4(&data[LOOPBACK_HEADER_SIZE..], packet, 0),
                Some(LoopbackFamily::Inet6) => ipv6(&data[LOOPBACK_HEADER_SIZE..], packet, 0),
                _ => {}
            }
        }
        LinkType::Raw => raw_ip(data, packet, 0),
        LinkType::Ipv4 => ipv4(data, packet, 0),
        LinkType::Ipv6 => ipv6(data, packet, 0),
        LinkType::Unknown(_) => {}
    }
}

fn ethernet(data: &[u8], packet: &mut ParsedPacket) {
    let Some(header) = EthernetHeader::parse(data) else {
        return;
    };
    if let EtherType::Length(_) = header.ethertype {
        packet.push(Protocol::EthernetDot3);
        return;
    }
    packet.push(Protocol::Ethernet);
    ethertype(header.ethertype, header.payload, packet);
}

fn ethertype(mut ethertype: EtherType, mut data: &[u8], packet: &mut ParsedPacket) {
    let mut tags = 0;
    while ethertype.is_vlan_tag() && tags < MAX_VLAN_TAGS {
        let Some(tag) = VlanTag::parse(data) else {
            return;
        };
        packet.push(Protocol::Vlan);
        ethertype = tag.ethertype;
        data = tag.payload;
        tags += 1;
    }

    match ethertype {
        EtherType::IPv4 => ipv4(data, packet, 0),
        EtherType::IPv6 => ipv6(data, packet, 0),
        EtherType::ARP if !data.is_empty() => packet.push(Protocol::Arp),
        _ => {}
    }
}

fn raw_ip(data: &[u8], packet: &mut ParsedPacket, depth: usize) {
    match data.first().map(|b| b >> 4) {
        Some(4) => ipv4(data, packet, depth),
        Some(6) => ipv6(data, packet, depth),
        _ => {}
    }
}

fn ipv4(data: &[u8], packet: &mut ParsedPacket, depth: usize) {
    let Some(header) = Ipv4Header::parse(data) else {
        return;
    };
    packet.push(Protocol::Ipv4);

    if header.is_fragment() {
        payload(header.payload, packet);
        return;
    }
    ip_payload(header.protocol, header.payload, packet, depth);
}

fn ipv6(data: &[u8], packet: &mut ParsedPacket, depth: usize) {
    let Some(header) = Ipv6Header::parse(data) else {
        return;
    };
    packet.push(Protocol::Ipv6);

    if header.is_fragment() {
        payload(header.payload, packet);
        return;
    }
    ip_payload(header.protocol, header.payload, packet, depth);
}

fn ip_payload(protocol: IpProtocol, data: &[u8], packet: &mut ParsedPacket, depth: usize) {
    match protocol {
        IpProtocol::TCP => tcp(data, packet),
        IpProtocol::UDP => udp(data, packet),
        IpProtocol::ICMP if !data.is_empty() => packet.push(Protocol::Icmp),
        IpProtocol::ICMPv6 if !data.is_empty() => packet.push(Protocol::Icmpv6),
        IpProtocol::IPv4 if depth < MAX_TUNNEL_DEPTH => ipv4(data, packet, depth + 1),
        IpProtocol::IPv6 if depth < MAX_TUNNEL_DEPTH => ipv6(data, packet, depth + 1),
        _ => payload(data, packet),
    }
}

fn udp(data: &[u8], packet: &mut ParsedPacket) {
    let Some(header) = UdpHeader::parse(data) else {
        return;
    };
    packet.push(Protocol::Udp);

    if header.is_dns_port() && app::is_dns_message(header.payload) {
        packet.push(Protocol::Dns);
    } else {
        payload(header.payload, packet);
    }
}

fn tcp(data: &[u8], packet: &mut ParsedPacket) {
    let Some(header) = TcpHeader::parse(data) else {
        return;
    };
    packet.push(Protocol::Tcp);

    let body = header.payload;
    if body.is_empty() {
        return;
    }

    let is_http = (header.destination_port.is_http() && app::is_http_request(body))
        || (header.source_port.is_http() && app::is_http_response(body));

    let layer = if is_http {
        Protocol::Http
    } else if (header.source_port.is_tls() || header.destination_port.is_tls())
        && app::tls_record_type(body).is_some()
    {
        Protocol::Ssl
    } else if header.has_port(TcpPort::DNS) && app::is_dns_over_tcp_message(body) {
        Protocol::Dns
    } else {
        Protocol::Payload
    };
    packet.push(layer);
}

fn payload(data: &[u8], packet: &mut ParsedPacket) {
    if !data.is_empty() {
        packet.push(Protocol::Payload);
    }
}
