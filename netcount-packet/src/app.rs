//! Application-layer recognizers
//!
//! These only answer "does this payload look like protocol X". Nothing past
//! the first bytes of a message is decoded.

/// Size of the fixed DNS message header
pub const DNS_HEADER_SIZE: usize = 12;

/// Size of the length prefix in front of DNS messages carried over TCP
pub const DNS_TCP_LENGTH_PREFIX: usize = 2;

/// Size of a TLS record header (type, version, length)
pub const TLS_RECORD_HEADER_SIZE: usize = 5;

/// HTTP request methods recognised at the start of a request line
const HTTP_METHODS: [&[u8]; 9] = [
    b"GET",
    b"HEAD",
    b"POST",
    b"PUT",
    b"DELETE",
    b"TRACE",
    b"OPTIONS",
    b"CONNECT",
    b"PATCH",
];

/// HTTP versions recognised at the start of a status line
const HTTP_VERSIONS: [&[u8]; 3] = [b"HTTP/0.9 ", b"HTTP/1.0 ", b"HTTP/1.1 "];

/// Whether the payload begins with an HTTP request line
pub fn is_http_request(payload: &[u8]) -> bool {
    HTTP_METHODS.iter().any(|method| {
        payload.len() > method.len()
            && payload.starts_with(method)
            && payload[method.len()] == b' '
    })
}

/// Whether the payload begins with an HTTP status line
pub fn is_http_response(payload: &[u8]) -> bool {
    HTTP_VERSIONS
        .iter()
        .any(|version| payload.starts_with(version))
}

/// TLS record content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
}

impl TlsContentType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(TlsContentType::ChangeCipherSpec),
            21 => Some(TlsContentType::Alert),
            22 => Some(TlsContentType::Handshake),
            23 => Some(TlsContentType::ApplicationData),
            _ => None,
        }
    }
}

/// Parse the content type of a TLS record header.
///
/// Accepts SSL 3.0 through TLS 1.3 record versions.
pub fn tls_record_type(payload: &[u8]) -> Option<TlsContentType> {
    if payload.len() < TLS_RECORD_HEADER_SIZE {
        return None;
    }

    let content_type = TlsContentType::from_u8(payload[0])?;
    let version = u16::from_be_bytes([payload[1], payload[2]]);
    (0x0300..=0x0304)
        .contains(&version)
        .then_some(content_type)
}

/// Whether the payload holds at least a DNS header
pub fn is_dns_message(payload: &[u8]) -> bool {
    payload.len() >= DNS_HEADER_SIZE
}

/// Whether the payload holds a length-prefixed DNS header
pub fn is_dns_over_tcp_message(payload: &[u8]) -> bool {
    payload.len() >= DNS_TCP_LENGTH_PREFIX + DNS_HEADER_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_requests() {
        assert!(is_http_request(b"GET / HTTP/1.1\r\n"));
        assert!(is_http_request(b"OPTIONS * HTTP/1.1\r\n"));
        assert!(is_http_request(b"PATCH /x HTTP/1.1\r\n"));
        assert!(!is_http_request(b"GETX / HTTP/1.1\r\n"));
        assert!(!is_http_request(b"GET"));
        assert!(!is_http_request(b"get / HTTP/1.1\r\n"));
        assert!(!is_http_request(b""));
    }

    #[test]
    fn test_http_responses() {
        assert!(is_http_response(b"HTTP/1.1 200 OK\r\n"));
        assert!(is_http_response(b"HTTP/1.0 404 Not Found\r\n"));
        assert!(is_http_response(b"HTTP/0.9 200 OK\r\n"));
        assert!(!is_http_response(b"HTTP/2 200\r\n"));
        assert!(!is_http_response(b"HTTP/1.1"));
    }

    #[test]
    fn test_tls_record_types() {
        let client_hello = [0x16, 0x03, 0x01, 0x00, 0x2F, 0x01];
        assert_eq!(tls_record_type(&client_hello), Some(TlsContentType::Handshake));

        let app_data = [0x17, 0x03, 0x03, 0x00, 0x10];
        assert_eq!(tls_record_type(&app_data), Some(TlsContentType::ApplicationData));

        let ssl3_alert = [0x15, 0x03, 0x00, 0x00, 0x02];
        assert_eq!(tls_record_type(&ssl3_alert), Some(TlsContentType::Alert));
    }

    #[test]
    fn test_tls_rejects_non_records() {
        assert_eq!(tls_record_type(&[0x16, 0x03, 0x01, 0x00]), None);
        assert_eq!(tls_record_type(&[0x18, 0x03, 0x01, 0x00, 0x01]), None);
        assert_eq!(tls_record_type(&[0x16, 0x02, 0x00, 0x00, 0x01]), None);
        assert_eq!(tls_record_type(&[0x16, 0x03, 0x05, 0x00, 0x01]), None);
    }

    #[test]
    fn test_dns_sizes() {
        assert!(is_dns_message(&[0u8; 12]));
        assert!(!is_dns_message(&[0u8; 11]));
        assert!(is_dns_over_tcp_message(&[0u8; 14]));
        assert!(!is_dns_over_tcp_message(&[0u8; 13]));
    }
}
