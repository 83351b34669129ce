//! Layer dissection for captured frames
//!
//! This crate turns the raw bytes of a captured frame into a
//! [`ParsedPacket`]: the chain of protocol layers it carries, outermost
//! first. Parsing is best-effort and never fails; a frame that cannot be
//! read past some header keeps the layers recognised before it.
//!
//! # Architecture
//!
//! - [`link`] - data-link types and cooked / loopback headers
//! - [`ethernet`] - Ethernet II and VLAN tags
//! - [`ip`] - IPv4 and IPv6 (with extension headers)
//! - [`tcp`], [`udp`] - transport headers and well-known ports
//! - [`app`] - DNS, HTTP and TLS recognizers
//! - [`layer`] - layer chains, [`LayerKind`] and [`LayerSet`]
//! - [`builder`] - fluent construction of frames
//!
//! # Quick Start
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use netcount_packet::{FrameBuilder, LayerKind, LinkType, ParsedPacket};
//!
//! let frame = FrameBuilder::new()
//!     .ethernet()
//!     .ipv4(Ipv4Addr::new(192, 168, 1, 10), Ipv4Addr::new(1, 1, 1, 1))
//!     .udp(53124, 53)
//!     .payload(vec![0u8; 12])
//!     .build();
//!
//! let packet = ParsedPacket::parse(&frame, LinkType::Ethernet);
//! assert!(packet.is_packet_of_type(LayerKind::Dns));
//! assert!(!packet.is_packet_of_type(LayerKind::Tcp));
//! ```

pub mod app;
pub mod builder;
mod dissect;
pub mod ethernet;
pub mod ip;
pub mod layer;
pub mod link;
pub mod tcp;
pub mod udp;

pub use builder::FrameBuilder;
pub use ethernet::{EtherType, MacAddress};
pub use ip::IpProtocol;
pub use layer::{LayerKind, LayerSet, ParsedPacket, Protocol};
pub use link::LinkType;
