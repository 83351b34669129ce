//! Network interface enumeration and lookup
//!
//! Interfaces are enumerated once per process into the [`DeviceRegistry`]
//! and looked up from there, either by name or by one of their addresses.

use ipnetwork::IpNetwork;
use netcount_core::{Error, Result};
use parking_lot::RwLock;
use pnet_datalink::{self, NetworkInterface};
use std::fmt::{self, Write as _};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Information about a network interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "eth0", "wlan0")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// MAC address if available
    pub mac: Option<String>,
    /// Networks assigned to this interface
    pub networks: Vec<IpNetwork>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
    /// MTU (Maximum Transmission Unit), when the OS reports it
    pub mtu: Option<u32>,
    /// Default IPv4 gateway routed through this interface
    pub default_gateway: Option<Ipv4Addr>,
    /// System DNS servers
    pub dns_servers: Vec<IpAddr>,
}

impl From<&NetworkInterface> for InterfaceInfo {
    fn from(iface: &NetworkInterface) -> Self {
        InterfaceInfo {
            name: iface.name.clone(),
            description: iface.description.clone(),
            mac: iface.mac.map(|mac| mac.to_string()),
            networks: iface.ips.clone(),
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
            mtu: None,
            default_gateway: None,
            dns_servers: Vec::new(),
        }
    }
}

impl InterfaceInfo {
    /// Fill in MTU, gateway and DNS servers from the operating system
    pub fn with_system_details(mut self) -> Self {
        self.mtu = system::mtu(&self.name);
        self.default_gateway = system::default_gateway(&self.name);
        self.dns_servers = system::dns_servers();
        self
    }

    /// Addresses assigned to this interface
    pub fn ips(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.networks.iter().map(|network| network.ip())
    }

    /// Whether the address is assigned to this interface
    pub fn has_ip(&self, ip: IpAddr) -> bool {
        self.ips().any(|assigned| assigned == ip)
    }

    /// Get the primary IPv4 address if available
    pub fn primary_ipv4(&self) -> Option<IpAddr> {
        self.ips().find(|ip| ip.is_ipv4())
    }

    /// Render the interface info block printed before a capture
    pub fn describe(&self) -> String {
        fn or_na<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
        }

        let mut out = String::new();
        let _ = writeln!(out, "Interface info:");
        let _ = writeln!(out, "   Interface name:        {}", self.name);
        let _ = writeln!(out, "   Interface description: {}", self.description);
        let _ = writeln!(out, "   MAC address:           {}", or_na(self.mac.as_deref()));
        let _ = writeln!(out, "   Default gateway:       {}", or_na(self.default_gateway));
        let _ = writeln!(out, "   Interface MTU:         {}", or_na(self.mtu));
        if let Some(dns) = self.dns_servers.first() {
            let _ = writeln!(out, "   DNS server:            {}", dns);
        }
        out
    }
}

/// Process-wide view of the capture-capable interfaces
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<Vec<InterfaceInfo>>,
}

static REGISTRY: OnceLock<DeviceRegistry> = OnceLock::new();

impl DeviceRegistry {
    /// The registry for this process, enumerated on first use
    pub fn global() -> &'static DeviceRegistry {
        REGISTRY.get_or_init(|| {
            let registry = DeviceRegistry::from_devices(enumerate());
            info!("Device registry initialized with {} interfaces", registry.len());
            registry
        })
    }

    /// Build a registry over a fixed set of interfaces
    pub fn from_devices(devices: Vec<InterfaceInfo>) -> Self {
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// Re-enumerate the system interfaces, returning how many were found
    pub fn refresh(&self) -> usize {
        let devices = enumerate();
        let count = devices.len();
        *self.devices.write() = devices;
        debug!("Device registry refreshed: {} interfaces", count);
        count
    }

    /// All known interfaces
    pub fn devices(&self) -> Vec<InterfaceInfo> {
        self.devices.read().clone()
    }

    /// Number of known interfaces
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Check if no interfaces are known
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Find the interface that carries the given address
    pub fn find_by_ip(&self, ip: IpAddr) -> Result<InterfaceInfo> {
        self.devices
            .read()
            .iter()
            .find(|iface| iface.has_ip(ip))
            .cloned()
            .ok_or(Error::DeviceNotFound(ip))
    }

    /// Find an interface by name
    pub fn find_by_name(&self, name: &str) -> Result<InterfaceInfo> {
        self.devices
            .read()
            .iter()
            .find(|iface| iface.name == name)
            .cloned()
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }
}

fn enumerate() -> Vec<InterfaceInfo> {
    pnet_datalink::interfaces()
        .iter()
        .map(|iface| InterfaceInfo::from(iface).with_system_details())
        .collect()
}

/// List all available network interfaces
pub fn list_interfaces() -> Result<Vec<InterfaceInfo>> {
    let devices = DeviceRegistry::global().devices();

    if devices.is_empty() {
        return Err(Error::Capture(
            "No network interfaces found. Are you running with sufficient privileges?".to_string(),
        ));
    }

    Ok(devices)
}

/// Get information about a specific interface by name
pub fn get_interface(name: &str) -> Result<InterfaceInfo> {
    DeviceRegistry::global().find_by_name(name)
}

/// Get the interface that owns an address
pub fn interface_by_ip(ip: IpAddr) -> Result<InterfaceInfo> {
    DeviceRegistry::global().find_by_ip(ip)
}

/// Best-effort reads of interface details pnet does not expose
mod system {
    use std::net::{IpAddr, Ipv4Addr};

    #[cfg(target_os = "linux")]
    pub fn mtu(name: &str) -> Option<u32> {
        std::fs::read_to_string(format!("/sys/class/net/{}/mtu", name))
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    #[cfg(not(target_os = "linux"))]
    pub fn mtu(_name: &str) -> Option<u32> {
        None
    }

    #[cfg(target_os = "linux")]
    pub fn default_gateway(name: &str) -> Option<Ipv4Addr> {
        let table = std::fs::read_to_string("/proc/net/route").ok()?;
        parse_route_table(&table, name)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn default_gateway(_name: &str) -> Option<Ipv4Addr> {
        None
    }

    pub fn dns_servers() -> Vec<IpAddr> {
        std::fs::read_to_string("/etc/resolv.conf")
            .map(|contents| parse_resolv_conf(&contents))
            .unwrap_or_default()
    }

    /// Default route gateway for `name` from a /proc/net/route table.
    ///
    /// Addresses are hex dumps of the in-memory (network order) value.
    pub fn parse_route_table(table: &str, name: &str) -> Option<Ipv4Addr> {
        table.lines().skip(1).find_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [iface, "00000000", gateway, ..] if *iface == name => {
                    let raw = u32::from_str_radix(gateway, 16).ok()?;
                    Some(Ipv4Addr::from(raw.to_ne_bytes()))
                }
                _ => None,
            }
        })
    }

    /// `nameserver` entries of a resolv.conf file
    pub fn parse_resolv_conf(contents: &str) -> Vec<IpAddr> {
        contents
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                match parts.next() {
                    Some("nameserver") => parts.next()?.parse().ok(),
                    _ => None,
                }
            })
            .collect()
    }
}
