//! Frame builder with a fluent API
//!
//! Builds Ethernet (optionally VLAN-tagged) frames or bare IP packets
//! carrying TCP, UDP or an arbitrary IP payload. Checksums are left at zero;
//! the dissector does not verify them.

use crate::ethernet::{EtherType, EthernetHeader, MacAddress};
use crate::ip::{IpProtocol, Ipv4Header, Ipv6Header};
use crate::tcp::TcpHeader;
use crate::udp::UdpHeader;
use bytes::{BufMut, BytesMut};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Minimum Ethernet frame size (without FCS)
const MIN_FRAME_SIZE: usize = 60;

#[derive(Debug, Clone)]
struct Link {
    src: MacAddress,
    dst: MacAddress,
    ethertype: Option<EtherType>,
    vlan_ids: Vec<u16>,
}

#[derive(Debug, Clone, Copy)]
enum Network {
    Ipv4 { src: Ipv4Addr, dst: Ipv4Addr },
    Ipv6 { src: Ipv6Addr, dst: Ipv6Addr },
}

#[derive(Debug, Clone, Copy)]
enum Transport {
    Tcp { src_port: u16, dst_port: u16 },
    Udp { src_port: u16, dst_port: u16 },
    Raw(IpProtocol),
}

/// Frame builder
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use netcount_packet::{FrameBuilder, LayerKind, LinkType, ParsedPacket};
///
/// let frame = FrameBuilder::new()
///     .ethernet()
///     .ipv4(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2))
///     .tcp(40000, 80)
///     .payload(b"GET / HTTP/1.1\r\n\r\n".to_vec())
///     .build();
///
/// let packet = ParsedPacket::parse(&frame, LinkType::Ethernet);
/// assert!(packet.is_packet_of_type(LayerKind::Http));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    link: Option<Link>,
    network: Option<Network>,
    transport: Option<Transport>,
    payload: Vec<u8>,
}

impl FrameBuilder {
    /// Create a new frame builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an Ethernet header; the EtherType follows the network layer
    pub fn ethernet(mut self) -> Self {
        self.link = Some(Link {
            src: MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
            dst: MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]),
            ethertype: None,
            vlan_ids: Vec::new(),
        });
        self
    }

    /// Add an Ethernet header with an explicit EtherType
    pub fn ethernet_type(self, ethertype: EtherType) -> Self {
        let mut builder = self.ethernet();
        if let Some(link) = builder.link.as_mut() {
            link.ethertype = Some(ethertype);
        }
        builder
    }

    /// Push an 802.1Q tag; tags are written outermost first
    ///
    /// Must be called after `ethernet()`.
    pub fn vlan(mut self, vlan_id: u16) -> Self {
        if let Some(link) = self.link.as_mut() {
            link.vlan_ids.push(vlan_id & 0x0FFF);
        }
        self
    }

    /// Add an IPv4 header
    pub fn ipv4(mut self, src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        self.network = Some(Network::Ipv4 { src, dst });
        self
    }

    /// Add an IPv6 header
    pub fn ipv6(mut self, src: Ipv6Addr, dst: Ipv6Addr) -> Self {
        self.network = Some(Network::Ipv6 { src, dst });
        self
    }

    /// Carry the payload directly in IP with the given protocol number
    pub fn ip_protocol(mut self, protocol: u8) -> Self {
        self.transport = Some(Transport::Raw(IpProtocol::from_u8(protocol)));
        self
    }

    /// Add a TCP header (PSH+ACK, no options)
    pub fn tcp(mut self, src_port: u16, dst_port: u16) -> Self {
        self.transport = Some(Transport::Tcp { src_port, dst_port });
        self
    }

    /// Add a UDP header
    pub fn udp(mut self, src_port: u16, dst_port: u16) -> Self {
        self.transport = Some(Transport::Udp { src_port, dst_port });
        self
    }

    /// Set the innermost payload
    pub fn payload(mut self, data: Vec<u8>) -> Self {
        self.payload = data;
        self
    }

    /// Serialize the frame
    pub fn build(self) -> Vec<u8> {
        let (protocol, segment) = match self.transport {
            Some(transport) => encode_transport(transport, &self.payload),
            None => (IpProtocol::NoNextHeader, self.payload),
        };

        let (network_type, packet) = match self.network {
            Some(Network::Ipv4 { src, dst }) => {
                (Some(EtherType::IPv4), encode_ipv4(src, dst, protocol, &segment))
            }
            Some(Network::Ipv6 { src, dst }) => {
                (Some(EtherType::IPv6), encode_ipv6(src, dst, protocol, &segment))
            }
            None => (None, segment),
        };

        match self.link {
            Some(link) => encode_ethernet(link, network_type, &packet),
            None => packet,
        }
    }
}

fn encode_transport(transport: Transport, payload: &[u8]) -> (IpProtocol, Vec<u8>) {
    match transport {
        Transport::Tcp { src_port, dst_port } => {
            let mut buffer = BytesMut::with_capacity(TcpHeader::MIN_HEADER_SIZE + payload.len());
            buffer.put_u16(src_port);
            buffer.put_u16(dst_port);
            buffer.put_u32(1); // sequence
            buffer.put_u32(1); // acknowledgment
            buffer.put_u8(5 << 4); // data offset
            buffer.put_u8(0x18); // PSH, ACK
            buffer.put_u16(65535); // window
            buffer.put_u16(0); // checksum
            buffer.put_u16(0); // urgent pointer
            buffer.put_slice(payload);
            (IpProtocol::TCP, buffer.to_vec())
        }
        Transport::Udp { src_port, dst_port } => {
            let length = (UdpHeader::HEADER_SIZE + payload.len()) as u16;
            let mut buffer = BytesMut::with_capacity(length as usize);
            buffer.put_u16(src_port);
            buffer.put_u16(dst_port);
            buffer.put_u16(length);
            buffer.put_u16(0); // checksum
            buffer.put_slice(payload);
            (IpProtocol::UDP, buffer.to_vec())
        }
        Transport::Raw(protocol) => (protocol, payload.to_vec()),
    }
}

fn encode_ipv4(src: Ipv4Addr, dst: Ipv4Addr, protocol: IpProtocol, payload: &[u8]) -> Vec<u8> {
    let total_length = (Ipv4Header::MIN_HEADER_SIZE + payload.len()) as u16;
    let mut buffer = BytesMut::with_capacity(total_length as usize);
    buffer.put_u8(0x45); // version 4, IHL 5
    buffer.put_u8(0); // TOS
    buffer.put_u16(total_length);
    buffer.put_u16(0x1234); // identification
    buffer.put_u16(0x4000); // don't fragment
    buffer.put_u8(64); // TTL
    buffer.put_u8(protocol.to_u8());
    buffer.put_u16(0); // checksum
    buffer.put_slice(&src.octets());
    buffer.put_slice(&dst.octets());
    buffer.put_slice(payload);
    buffer.to_vec()
}

fn encode_ipv6(src: Ipv6Addr, dst: Ipv6Addr, protocol: IpProtocol, payload: &[u8]) -> Vec<u8> {
    let mut buffer = BytesMut::with_capacity(Ipv6Header::HEADER_SIZE + payload.len());
    buffer.put_u32(6 << 28); // version, traffic class, flow label
    buffer.put_u16(payload.len() as u16);
    buffer.put_u8(protocol.to_u8());
    buffer.put_u8(64); // hop limit
    buffer.put_slice(&src.octets());
    buffer.put_slice(&dst.octets());
    buffer.put_slice(payload);
    buffer.to_vec()
}

fn encode_ethernet(link: Link, network_type: Option<EtherType>, payload: &[u8]) -> Vec<u8> {
    let inner_type = link
        .ethertype
        .or(network_type)
        .unwrap_or(EtherType::Custom(0x88B5));

    let mut buffer = BytesMut::with_capacity(
        EthernetHeader::HEADER_SIZE + link.vlan_ids.len() * 4 + payload.len(),
    );
    buffer.put_slice(&link.dst.0);
    buffer.put_slice(&link.src.0);

    for vlan_id in &link.vlan_ids {
        buffer.put_u16(EtherType::VLAN.to_u16());
        buffer.put_u16(*vlan_id);
    }
    buffer.put_u16(inner_type.to_u16());
    buffer.put_slice(payload);

    let mut frame = buffer.to_vec();
    if frame.len() < MIN_FRAME_SIZE {
        frame.resize(MIN_FRAME_SIZE, 0);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ethernet_frame_is_padded() {
        let frame = FrameBuilder::new().ethernet().build();
        assert_eq!(frame.len(), MIN_FRAME_SIZE);
        assert_eq!(u16::from_be_bytes([frame[12], frame[13]]), 0x88B5);
    }

    #[test]
    fn test_ethertype_follows_network_layer() {
        let frame = FrameBuilder::new()
            .ethernet()
            .ipv6(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST)
            .build();
        let header = EthernetHeader::parse(&frame).unwrap();
        assert_eq!(header.ethertype, EtherType::IPv6);
    }

    #[test]
    fn test_vlan_tags_in_order() {
        let frame = FrameBuilder::new()
            .ethernet()
            .vlan(10)
            .vlan(20)
            .ipv4(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST)
            .build();

        assert_eq!(&frame[12..14], &[0x81, 0x00]);
        assert_eq!(&frame[14..16], &10u16.to_be_bytes());
        assert_eq!(&frame[16..18], &[0x81, 0x00]);
        assert_eq!(&frame[18..20], &20u16.to_be_bytes());
        assert_eq!(&frame[20..22], &[0x08, 0x00]);
    }

    #[test]
    fn test_ipv4_udp_lengths() {
        let packet = FrameBuilder::new()
            .ipv4(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2))
            .udp(1234, 53)
            .payload(vec![0xAB; 4])
            .build();

        assert_eq!(packet.len(), 20 + 8 + 4);
        let ip = Ipv4Header::parse(&packet).unwrap();
        assert_eq!(ip.total_length, 32);
        assert_eq!(ip.protocol, IpProtocol::UDP);

        let udp = UdpHeader::parse(ip.payload).unwrap();
        assert_eq!(udp.length, 12);
        assert_eq!(udp.payload, &[0xAB; 4]);
    }

    #[test]
    fn test_tcp_segment_fields() {
        let packet = FrameBuilder::new()
            .ipv6(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST)
            .tcp(40000, 443)
            .build();

        let ip = Ipv6Header::parse(&packet).unwrap();
        assert_eq!(ip.protocol, IpProtocol::TCP);
        let tcp = TcpHeader::parse(ip.payload).unwrap();
        assert_eq!(tcp.source_port.0, 40000);
        assert_eq!(tcp.destination_port.0, 443);
        assert!(tcp.payload.is_empty());
    }

    #[test]
    fn test_default_macs() {
        let frame = FrameBuilder::new().ethernet().build();
        let header = EthernetHeader::parse(&frame).unwrap();
        assert_eq!(header.source.to_string(), "02:00:00:00:00:01");
        assert_eq!(header.destination.to_string(), "02:00:00:00:00:02");
    }
}
