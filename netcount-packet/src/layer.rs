//! Layer chains and the tracked layer kinds

use crate::dissect;
use crate::link::LinkType;
use netcount_core::Frame;
use std::fmt;

/// A protocol layer that can appear in a parsed packet's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ethernet,
    /// IEEE 802.3 frame, whose type field holds a length
    EthernetDot3,
    Vlan,
    Arp,
    Ipv4,
    Ipv6,
    Icmp,
    Icmpv6,
    Tcp,
    Udp,
    Dns,
    Http,
    Ssl,
    /// Bytes no recognizer claimed
    Payload,
}

impl Protocol {
    /// The tracked kind this layer counts towards, if any
    pub fn kind(self) -> Option<LayerKind> {
        match self {
            Protocol::Ethernet => Some(LayerKind::Ethernet),
            Protocol::Ipv4 => Some(LayerKind::Ipv4),
            Protocol::Ipv6 => Some(LayerKind::Ipv6),
            Protocol::Tcp => Some(LayerKind::Tcp),
            Protocol::Udp => Some(LayerKind::Udp),
            Protocol::Dns => Some(LayerKind::Dns),
            Protocol::Http => Some(LayerKind::Http),
            Protocol::Ssl => Some(LayerKind::Ssl),
            Protocol::EthernetDot3
            | Protocol::Vlan
            | Protocol::Arp
            | Protocol::Icmp
            | Protocol::Icmpv6
            | Protocol::Payload => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Ethernet => "Ethernet",
            Protocol::EthernetDot3 => "802.3",
            Protocol::Vlan => "VLAN",
            Protocol::Arp => "ARP",
            Protocol::Ipv4 => "IPv4",
            Protocol::Ipv6 => "IPv6",
            Protocol::Icmp => "ICMP",
            Protocol::Icmpv6 => "ICMPv6",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Dns => "DNS",
            Protocol::Http => "HTTP",
            Protocol::Ssl => "SSL",
            Protocol::Payload => "Payload",
        };
        f.write_str(name)
    }
}

/// The eight layer kinds that are counted, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Ethernet,
    Ipv4,
    Ipv6,
    Tcp,
    Udp,
    Dns,
    Http,
    Ssl,
}

impl LayerKind {
    /// Number of tracked kinds
    pub const COUNT: usize = 8;

    /// All kinds in report order
    pub const ALL: [LayerKind; LayerKind::COUNT] = [
        LayerKind::Ethernet,
        LayerKind::Ipv4,
        LayerKind::Ipv6,
        LayerKind::Tcp,
        LayerKind::Udp,
        LayerKind::Dns,
        LayerKind::Http,
        LayerKind::Ssl,
    ];

    /// Position in report order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label used in reports
    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Ethernet => "Ethernet",
            LayerKind::Ipv4 => "IPv4",
            LayerKind::Ipv6 => "IPv6",
            LayerKind::Tcp => "TCP",
            LayerKind::Udp => "UDP",
            LayerKind::Dns => "DNS",
            LayerKind::Http => "HTTP",
            LayerKind::Ssl => "SSL",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of tracked layer kinds, one bit per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerSet(u8);

impl LayerSet {
    /// The empty set
    pub const EMPTY: LayerSet = LayerSet(0);

    pub fn insert(&mut self, kind: LayerKind) {
        self.0 |= 1 << kind.index();
    }

    pub fn contains(self, kind: LayerKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in report order
    pub fn iter(self) -> impl Iterator<Item = LayerKind> {
        LayerKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<LayerKind> for LayerSet {
    fn from_iter<I: IntoIterator<Item = LayerKind>>(iter: I) -> Self {
        let mut set = LayerSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// A captured frame broken into its layer chain.
///
/// Parsing is best-effort: the chain holds every layer recognised before
/// the first header that could not be read. A frame that yields nothing has
/// an empty chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPacket {
    layers: Vec<Protocol>,
    kinds: LayerSet,
}

impl ParsedPacket {
    /// Dissect a frame captured on the given link type
    pub fn parse(data: &[u8], link_type: LinkType) -> Self {
        let mut packet = ParsedPacket::default();
        dissect::dissect(data, link_type, &mut packet);
        packet
    }

    /// Dissect a captured frame
    pub fn from_frame(frame: &Frame, link_type: LinkType) -> Self {
        Self::parse(frame.data(), link_type)
    }

    /// Build a packet from an explicit chain
    pub fn from_layers<I: IntoIterator<Item = Protocol>>(layers: I) -> Self {
        let mut packet = ParsedPacket::default();
        for layer in layers {
            packet.push(layer);
        }
        packet
    }

    pub(crate) fn push(&mut self, layer: Protocol) {
        if let Some(kind) = layer.kind() {
            self.kinds.insert(kind);
        }
        self.layers.push(layer);
    }

    /// Whether a layer of this kind is anywhere in the chain
    pub fn is_packet_of_type(&self, kind: LayerKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Tracked kinds present in the chain
    pub fn kinds(&self) -> LayerSet {
        self.kinds
    }

    /// The layer chain, outermost first
    pub fn layers(&self) -> &[Protocol] {
        &self.layers
    }

    /// Whether no layer was recognised
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Display for ParsedPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", layer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_kind_order() {
        for (i, kind) in LayerKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(LayerKind::Ssl.label(), "SSL");
    }

    #[test]
    fn test_protocol_kind_mapping() {
        assert_eq!(Protocol::Tcp.kind(), Some(LayerKind::Tcp));
        assert_eq!(Protocol::Vlan.kind(), None);
        assert_eq!(Protocol::EthernetDot3.kind(), None);
        assert_eq!(Protocol::Payload.kind(), None);
    }

    #[test]
    fn test_layer_set() {
        let mut set = LayerSet::EMPTY;
        assert!(set.is_empty());

        set.insert(LayerKind::Udp);
        set.insert(LayerKind::Ethernet);
        set.insert(LayerKind::Udp);

        assert_eq!(set.len(), 2);
        assert!(set.contains(LayerKind::Udp));
        assert!(!set.contains(LayerKind::Tcp));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![LayerKind::Ethernet, LayerKind::Udp]
        );
    }

    #[test]
    fn test_parsed_packet_membership() {
        let packet = ParsedPacket::from_layers([
            Protocol::Ethernet,
            Protocol::Vlan,
            Protocol::Ipv6,
            Protocol::Icmpv6,
        ]);

        assert!(packet.is_packet_of_type(LayerKind::Ethernet));
        assert!(packet.is_packet_of_type(LayerKind::Ipv6));
        assert!(!packet.is_packet_of_type(LayerKind::Ipv4));
        assert_eq!(packet.kinds().len(), 2);
        assert_eq!(packet.layers().len(), 4);
        assert_eq!(packet.to_string(), "Ethernet -> VLAN -> IPv6 -> ICMPv6");
    }

    #[test]
    fn test_empty_packet() {
        let packet = ParsedPacket::default();
        assert!(packet.is_empty());
        assert!(packet.kinds().is_empty());
        assert_eq!(packet.to_string(), "");
    }
}
