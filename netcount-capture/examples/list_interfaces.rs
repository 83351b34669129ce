//! Example: List the interfaces the device registry knows about
//!
//! Run with: cargo run --example list_interfaces

use netcount_capture::DeviceRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DeviceRegistry::global();
    println!("=== Network Interfaces ({}) ===\n", registry.len());

    for iface in registry.devices() {
        print!("{}", iface.describe());

        println!("   Addresses:");
        for network in &iface.networks {
            println!("     - {}", network);
        }
        println!("   Up: {}, Loopback: {}", iface.is_up, iface.is_loopback);
        println!();
    }

    Ok(())
}
