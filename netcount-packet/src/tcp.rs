//! TCP header parsing and well-known port sets

/// TCP port with the well-known values the dissector cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpPort(pub u16);

impl TcpPort {
    /// DNS over TCP (53)
    pub const DNS: TcpPort = TcpPort(53);

    /// HTTP (80)
    pub const HTTP: TcpPort = TcpPort(80);

    /// HTTP alternate (8080)
    pub const HTTP_ALT: TcpPort = TcpPort(8080);

    /// HTTPS (443)
    pub const HTTPS: TcpPort = TcpPort(443);

    /// Ports carrying TLS-wrapped protocols by default
    pub const TLS_PORTS: [u16; 13] = [
        261, // NSIIOPS
        443, // HTTPS
        448, // DDM-SSL
        465, // SMTPS
        563, // NNTPS
        614, // SSHELL
        636, // LDAPS
        989, // FTPS data
        990, // FTPS control
        992, // Telnet over TLS
        993, // IMAPS
        994, // IRCS
        995, // POP3S
    ];

    pub fn new(port: u16) -> Self {
        TcpPort(port)
    }

    /// Port on which HTTP is expected
    pub fn is_http(self) -> bool {
        self == Self::HTTP || self == Self::HTTP_ALT
    }

    /// Port on which TLS records are expected
    pub fn is_tls(self) -> bool {
        Self::TLS_PORTS.contains(&self.0)
    }
}

/// TCP header view
#[derive(Debug, Clone, Copy)]
pub struct TcpHeader<'a> {
    /// Source port
    pub source_port: TcpPort,
    /// Destination port
    pub destination_port: TcpPort,
    /// Data offset in 32-bit words
    pub data_offset: u8,
    /// Raw flag bits
    pub flags: u8,
    /// Segment payload
    pub payload: &'a [u8],
}

impl<'a> TcpHeader<'a> {
    /// Minimum TCP header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    /// Parse a TCP header
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return None;
        }

        let data_offset = data[12] >> 4;
        let header_len = (data_offset as usize) * 4;
        if header_len < Self::MIN_HEADER_SIZE || data.len() < header_len {
            return None;
        }

        Some(TcpHeader {
            source_port: TcpPort::new(u16::from_be_bytes([data[0], data[1]])),
            destination_port: TcpPort::new(u16::from_be_bytes([data[2], data[3]])),
            data_offset,
            flags: data[13],
            payload: &data[header_len..],
        })
    }

    /// Get the header size in bytes
    pub fn header_len(&self) -> usize {
        (self.data_offset as usize) * 4
    }

    /// Whether either endpoint uses the given port
    pub fn has_port(&self, port: TcpPort) -> bool {
        self.source_port == port || self.destination_port == port
    }
}
