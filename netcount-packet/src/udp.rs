//! UDP header parsing

/// UDP port with the well-known values the dissector cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpPort(pub u16);

impl UdpPort {
    /// DNS (53)
    pub const DNS: UdpPort = UdpPort(53);

    /// Multicast DNS (5353)
    pub const MDNS: UdpPort = UdpPort(5353);

    /// LLMNR (5355)
    pub const LLMNR: UdpPort = UdpPort(5355);

    pub fn new(port: u16) -> Self {
        UdpPort(port)
    }

    /// Port carrying DNS-formatted messages
    pub fn is_dns(self) -> bool {
        self == Self::DNS || self == Self::MDNS || self == Self::LLMNR
    }
}

/// UDP header view
#[derive(Debug, Clone, Copy)]
pub struct UdpHeader<'a> {
    /// Source port
    pub source_port: UdpPort,
    /// Destination port
    pub destination_port: UdpPort,
    /// Length (header + data)
    pub length: u16,
    /// Datagram payload
    pub payload: &'a [u8],
}

impl<'a> UdpHeader<'a> {
    /// UDP header size in bytes
    pub const HEADER_SIZE: usize = 8;

    /// Parse a UDP header
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }

        Some(UdpHeader {
            source_port: UdpPort::new(u16::from_be_bytes([data[0], data[1]])),
            destination_port: UdpPort::new(u16::from_be_bytes([data[2], data[3]])),
            length: u16::from_be_bytes([data[4], data[5]]),
            payload: &data[Self::HEADER_SIZE..],
        })
    }

    /// Whether either endpoint is a DNS port
    pub fn is_dns_port(&self) -> bool {
        self.source_port.is_dns() || self.destination_port.is_dns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_dns_ports() {
        assert!(UdpPort::DNS.is_dns());
        assert!(UdpPort(5353).is_dns());
        assert!(UdpPort(5355).is_dns());
        assert!(!UdpPort(67).is_dns());
    }

    #[test]
    fn test_udp_header_parse() {
        let data = [0xC0, 0x00, 0x00, 0x35, 0x00, 0x0A, 0x00, 0x00, 0xDE, 0xAD];
        let header = UdpHeader::parse(&data).unwrap();
        assert_eq!(header.source_port, UdpPort(0xC000));
        assert_eq!(header.destination_port, UdpPort::DNS);
        assert_eq!(header.length, 10);
        assert_eq!(header.payload, &[0xDE, 0xAD]);
        assert!(header.is_dns_port());
    }

    #[test]
    fn test_udp_header_too_short() {
        assert!(UdpHeader::parse(&[0u8; 7]).is_none());
        let header = UdpHeader::parse(&[0u8; 8]).unwrap();
        assert!(header.payload.is_empty());
    }
}
