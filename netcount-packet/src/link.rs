//! Data-link encapsulations reported by capture devices

use crate::ethernet::EtherType;
use std::fmt;

/// Link-layer header type of a capture device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkType {
    /// Ethernet II (DLT_EN10MB)
    #[default]
    Ethernet,
    /// Linux cooked capture v1 (DLT_LINUX_SLL)
    LinuxSll,
    /// BSD loopback, host byte order family (DLT_NULL)
    Null,
    /// OpenBSD loopback, network byte order family (DLT_LOOP)
    Loop,
    /// Raw IP, version taken from the first nibble (DLT_RAW)
    Raw,
    /// Raw IPv4 (DLT_IPV4)
    Ipv4,
    /// Raw IPv6 (DLT_IPV6)
    Ipv6,
    /// Anything else; frames on it are not dissected
    Unknown(i32),
}

impl LinkType {
    /// Map a pcap DLT / LINKTYPE value
    pub fn from_dlt(value: i32) -> Self {
        match value {
            0 => LinkType::Null,
            1 => LinkType::Ethernet,
            12 | 14 | 101 => LinkType::Raw,
            108 => LinkType::Loop,
            113 => LinkType::LinuxSll,
            228 => LinkType::Ipv4,
            229 => LinkType::Ipv6,
            other => LinkType::Unknown(other),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Ethernet => write!(f, "Ethernet"),
            LinkType::LinuxSll => write!(f, "Linux cooked"),
            LinkType::Null => write!(f, "BSD loopback"),
            LinkType::Loop => write!(f, "OpenBSD loopback"),
            LinkType::Raw => write!(f, "raw IP"),
            LinkType::Ipv4 => write!(f, "raw IPv4"),
            LinkType::Ipv6 => write!(f, "raw IPv6"),
            LinkType::Unknown(dlt) => write!(f, "DLT {}", dlt),
        }
    }
}

/// Linux cooked capture header view
#[derive(Debug, Clone, Copy)]
pub struct SllHeader<'a> {
    /// Packet type (to us, broadcast, ...)
    pub packet_type: u16,
    /// Protocol, interpreted like an EtherType
    pub protocol: EtherType,
    /// Bytes following the header
    pub payload: &'a [u8],
}

impl<'a> SllHeader<'a> {
    /// Cooked header size
    pub const HEADER_SIZE: usize = 16;

    /// Parse a Linux cooked capture header
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }

        Some(SllHeader {
            packet_type: u16::from_be_bytes([data[0], data[1]]),
            protocol: EtherType::from_u16(u16::from_be_bytes([data[14], data[15]])),
            payload: &data[Self::HEADER_SIZE..],
        })
    }
}

/// Address family carried by a loopback header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopbackFamily {
    Inet,
    Inet6,
    Other(u32),
}

/// Loopback header size
pub const LOOPBACK_HEADER_SIZE: usize = 4;

/// Decode the address family of a DLT_NULL / DLT_LOOP header.
///
/// The family is written in the capturing host's byte order, so both
/// orders are tried. AF_INET6 differs between BSDs (24, 28, 30).
pub fn loopback_family(data: &[u8]) -> Option<LoopbackFamily> {
    let bytes: [u8; LOOPBACK_HEADER_SIZE] = data.get(..LOOPBACK_HEADER_SIZE)?.try_into().ok()?;
    let le = u32::from_le_bytes(bytes);
    let be = u32::from_be_bytes(bytes);

    let family = |value: u32| match value {
        2 => Some(LoopbackFamily::Inet),
        24 | 28 | 30 => Some(LoopbackFamily::Inet6),
        _ => None,
    };

    Some(
        family(le)
            .or_else(|| family(be))
            .unwrap_or(LoopbackFamily::Other(le)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dlt() {
        assert_eq!(LinkType::from_dlt(1), LinkType::Ethernet);
        assert_eq!(LinkType::from_dlt(113), LinkType::LinuxSll);
        assert_eq!(LinkType::from_dlt(0), LinkType::Null);
        assert_eq!(LinkType::from_dlt(108), LinkType::Loop);
        assert_eq!(LinkType::from_dlt(12), LinkType::Raw);
        assert_eq!(LinkType::from_dlt(101), LinkType::Raw);
        assert_eq!(LinkType::from_dlt(228), LinkType::Ipv4);
        assert_eq!(LinkType::from_dlt(229), LinkType::Ipv6);
        assert_eq!(LinkType::from_dlt(127), LinkType::Unknown(127));
    }

    #[test]
    fn test_sll_header() {
        let mut data = vec![0u8; 16];
        data[14] = 0x08;
        data[15] = 0x00;
        data.push(0x45);

        let header = SllHeader::parse(&data).unwrap();
        assert_eq!(header.protocol, EtherType::IPv4);
        assert_eq!(header.payload, &[0x45]);
        assert!(SllHeader::parse(&data[..15]).is_none());
    }

    #[test]
    fn test_loopback_family_both_orders() {
        assert_eq!(loopback_family(&[2, 0, 0, 0]), Some(LoopbackFamily::Inet));
        assert_eq!(loopback_family(&[0, 0, 0, 2]), Some(LoopbackFamily::Inet));
        assert_eq!(loopback_family(&[30, 0, 0, 0]), Some(LoopbackFamily::Inet6));
        assert_eq!(loopback_family(&[0, 0, 0, 24]), Some(LoopbackFamily::Inet6));
        assert_eq!(loopback_family(&[7, 0, 0, 0]), Some(LoopbackFamily::Other(7)));
        assert_eq!(loopback_family(&[2, 0]), None);
    }
}
