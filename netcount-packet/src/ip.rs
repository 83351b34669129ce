//! IPv4 and IPv6 header parsing
//!
//! Only the fields needed to find the next layer are decoded. IPv6
//! extension headers are walked until an upper-layer protocol is reached.

use std::net::{Ipv4Addr, Ipv6Addr};

/// IP protocol / IPv6 next-header numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// IPv6 Hop-by-Hop options (0)
    HopByHop,
    /// ICMP (1)
    ICMP,
    /// IPv4 encapsulation (4)
    IPv4,
    /// TCP (6)
    TCP,
    /// UDP (17)
    UDP,
    /// IPv6 encapsulation (41)
    IPv6,
    /// IPv6 Routing header (43)
    Routing,
    /// IPv6 Fragment header (44)
    Fragment,
    /// Authentication header (51)
    AH,
    /// ICMPv6 (58)
    ICMPv6,
    /// IPv6 no next header (59)
    NoNextHeader,
    /// IPv6 Destination options (60)
    DestinationOptions,
    /// Custom protocol number
    Custom(u8),
}

impl IpProtocol {
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::HopByHop => 0,
            IpProtocol::ICMP => 1,
            IpProtocol::IPv4 => 4,
            IpProtocol::TCP => 6,
            IpProtocol::UDP => 17,
            IpProtocol::IPv6 => 41,
            IpProtocol::Routing => 43,
            IpProtocol::Fragment => 44,
            IpProtocol::AH => 51,
            IpProtocol::ICMPv6 => 58,
            IpProtocol::NoNextHeader => 59,
            IpProtocol::DestinationOptions => 60,
            IpProtocol::Custom(val) => val,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => IpProtocol::HopByHop,
            1 => IpProtocol::ICMP,
            4 => IpProtocol::IPv4,
            6 => IpProtocol::TCP,
            17 => IpProtocol::UDP,
            41 => IpProtocol::IPv6,
            43 => IpProtocol::Routing,
            44 => IpProtocol::Fragment,
            51 => IpProtocol::AH,
            58 => IpProtocol::ICMPv6,
            59 => IpProtocol::NoNextHeader,
            60 => IpProtocol::DestinationOptions,
            val => IpProtocol::Custom(val),
        }
    }
}

/// IPv4 header view
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Header<'a> {
    /// Internet Header Length in 32-bit words
    pub ihl: u8,
    /// Total length (header + data) in bytes
    pub total_length: u16,
    /// More-fragments flag
    pub more_fragments: bool,
    /// Fragment offset (in 8-byte blocks)
    pub fragment_offset: u16,
    /// Protocol of the payload
    pub protocol: IpProtocol,
    /// Source IP address
    pub source: Ipv4Addr,
    /// Destination IP address
    pub destination: Ipv4Addr,
    /// Payload, bounded by the total length when it fits the capture
    pub payload: &'a [u8],
}

impl<'a> Ipv4Header<'a> {
    /// Minimum IPv4 header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    /// Parse an IPv4 header
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return None;
        }

        let version = data[0] >> 4;
        let ihl = data[0] & 0x0F;
        if version != 4 || ihl < 5 {
            return None;
        }

        let header_len = (ihl as usize) * 4;
        if data.len() < header_len {
            return None;
        }

        let total_length = u16::from_be_bytes([data[2], data[3]]);
        let flags_and_offset = u16::from_be_bytes([data[6], data[7]]);

        // Ethernet padding follows short datagrams; trim it when the total
        // length is sane.
        let end = match total_length as usize {
            len if len >= header_len && len <= data.len() => len,
            _ => data.len(),
        };

        Some(Ipv4Header {
            ihl,
            total_length,
            more_fragments: flags_and_offset & 0x2000 != 0,
            fragment_offset: flags_and_offset & 0x1FFF,
            protocol: IpProtocol::from_u8(data[9]),
            source: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            destination: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
            payload: &data[header_len..end],
        })
    }

    /// Get the header size in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl as usize) * 4
    }

    /// Whether this datagram is any part of a fragmented packet
    pub fn is_fragment(&self) -> bool {
        self.more_fragments || self.fragment_offset != 0
    }
}

/// IPv6 header view, positioned after any extension headers
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Header<'a> {
    /// Payload length from the fixed header
    pub payload_length: u16,
    /// Upper-layer protocol after the extension headers
    pub protocol: IpProtocol,
    /// Hop limit
    pub hop_limit: u8,
    /// Source IP address
    pub source: Ipv6Addr,
    /// Destination IP address
    pub destination: Ipv6Addr,
    /// Fragment offset of the fragment header, if one was seen
    pub fragment_offset: Option<u16>,
    /// Upper-layer payload
    pub payload: &'a [u8],
}

impl<'a> Ipv6Header<'a> {
    /// Fixed IPv6 header size
    pub const HEADER_SIZE: usize = 40;

    /// Fragment extension header size
    const FRAGMENT_HEADER_SIZE: usize = 8;

    /// Parse an IPv6 header and skip its extension headers
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE || data[0] >> 4 != 6 {
            return None;
        }

        let payload_length = u16::from_be_bytes([data[4], data[5]]);
        let mut source = [0u8; 16];
        source.copy_from_slice(&data[8..24]);
        let mut destination = [0u8; 16];
        destination.copy_from_slice(&data[24..40]);

        let end = match Self::HEADER_SIZE + payload_length as usize {
            len if payload_length > 0 && len <= data.len() => len,
            _ => data.len(),
        };

        let mut protocol = IpProtocol::from_u8(data[6]);
        let mut rest = &data[Self::HEADER_SIZE..end];
        let mut fragment_offset = None;

        loop {
            let ext_len = match protocol {
                IpProtocol::HopByHop | IpProtocol::Routing | IpProtocol::DestinationOptions => {
                    if rest.len() < 2 {
                        break;
                    }
                    (rest[1] as usize + 1) * 8
                }
                IpProtocol::Fragment => {
                    if rest.len() < Self::FRAGMENT_HEADER_SIZE {
                        break;
                    }
                    fragment_offset = Some(u16::from_be_bytes([rest[2], rest[3]]) >> 3);
                    Self::FRAGMENT_HEADER_SIZE
                }
                IpProtocol::AH => {
                    if rest.len() < 2 {
                        break;
                    }
                    (rest[1] as usize + 2) * 4
                }
                _ => break,
            };

            if rest.len() < ext_len {
                break;
            }
            protocol = IpProtocol::from_u8(rest[0]);
            rest = &rest[ext_len..];
        }

        Some(Ipv6Header {
            payload_length,
            protocol,
            hop_limit: data[7],
            source: Ipv6Addr::from(source),
            destination: Ipv6Addr::from(destination),
            fragment_offset,
            payload: rest,
        })
    }

    /// Whether the packet carried a fragment header, first fragment included
    pub fn is_fragment(&self) -> bool {
        self.fragment_offset.is_some()
    }
}
