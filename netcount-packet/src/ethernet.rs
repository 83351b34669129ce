//! Ethernet II and 802.1Q header parsing
//!
//! Headers are parsed as borrowed views over the captured bytes. Parsing
//! never panics: a buffer that is too short yields `None`.

use std::fmt;

/// EtherType values the dissector dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// ARP (0x0806)
    ARP,
    /// VLAN-tagged frame (0x8100)
    VLAN,
    /// IPv6 (0x86DD)
    IPv6,
    /// Q-in-Q/802.1ad (0x88A8)
    QinQ,
    /// Pre-standard Q-in-Q (0x9100)
    QinQLegacy,
    /// 802.3 frame: the type field carries a length (<= 1500)
    Length(u16),
    /// Any other EtherType
    Custom(u16),
}

impl EtherType {
    /// Largest value that is an 802.3 length rather than an EtherType
    pub const MAX_LENGTH: u16 = 1500;

    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => 0x0800,
            EtherType::ARP => 0x0806,
            EtherType::VLAN => 0x8100,
            EtherType::IPv6 => 0x86DD,
            EtherType::QinQ => 0x88A8,
            EtherType::QinQLegacy => 0x9100,
            EtherType::Length(len) => len,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0800 => EtherType::IPv4,
            0x0806 => EtherType::ARP,
            0x8100 => EtherType::VLAN,
            0x86DD => EtherType::IPv6,
            0x88A8 => EtherType::QinQ,
            0x9100 => EtherType::QinQLegacy,
            len if len <= Self::MAX_LENGTH => EtherType::Length(len),
            val => EtherType::Custom(val),
        }
    }

    /// Whether this EtherType introduces a VLAN tag
    pub fn is_vlan_tag(self) -> bool {
        matches!(
            self,
            EtherType::VLAN | EtherType::QinQ | EtherType::QinQLegacy
        )
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::IPv4 => write!(f, "IPv4"),
            EtherType::ARP => write!(f, "ARP"),
            EtherType::VLAN => write!(f, "VLAN"),
            EtherType::IPv6 => write!(f, "IPv6"),
            EtherType::QinQ => write!(f, "Q-in-Q"),
            EtherType::QinQLegacy => write!(f, "Q-in-Q (legacy)"),
            EtherType::Length(len) => write!(f, "802.3 length {}", len),
            EtherType::Custom(val) => write!(f, "0x{:04X}", val),
        }
    }
}

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Create a MAC address from a slice
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 6] = slice.try_into().ok()?;
        Some(MacAddress(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

/// Ethernet II header view
#[derive(Debug, Clone, Copy)]
pub struct EthernetHeader<'a> {
    /// Destination MAC address
    pub destination: MacAddress,
    /// Source MAC address
    pub source: MacAddress,
    /// EtherType or 802.3 length
    pub ethertype: EtherType,
    /// Bytes following the header
    pub payload: &'a [u8],
}

impl<'a> EthernetHeader<'a> {
    /// Ethernet header size (dst + src + type/length)
    pub const HEADER_SIZE: usize = 14;

    /// Parse an Ethernet II header
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }

        Some(EthernetHeader {
            destination: MacAddress::from_slice(&data[0..6])?,
            source: MacAddress::from_slice(&data[6..12])?,
            ethertype: EtherType::from_u16(u16::from_be_bytes([data[12], data[13]])),
            payload: &data[Self::HEADER_SIZE..],
        })
    }
}

/// 802.1Q / 802.1ad tag view (the 4 bytes after a VLAN EtherType)
#[derive(Debug, Clone, Copy)]
pub struct VlanTag<'a> {
    /// Priority code point
    pub priority: u8,
    /// VLAN identifier
    pub vlan_id: u16,
    /// Encapsulated EtherType
    pub ethertype: EtherType,
    /// Bytes following the tag
    pub payload: &'a [u8],
}

impl<'a> VlanTag<'a> {
    /// Tag size (TCI + inner EtherType)
    pub const SIZE: usize = 4;

    /// Parse a VLAN tag
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::SIZE {
            return None;
        }

        let tci = u16::from_be_bytes([data[0], data[1]]);
        Some(VlanTag {
            priority: (tci >> 13) as u8,
            vlan_id: tci & 0x0FFF,
            ethertype: EtherType::from_u16(u16::from_be_bytes([data[2], data[3]])),
            payload: &data[Self::SIZE..],
        })
    }
}
