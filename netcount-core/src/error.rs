//! Error types for netcount

use std::net::IpAddr;
use thiserror::Error;

/// Result type alias for netcount operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netcount
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No interface carries the requested address
    #[error("Cannot find interface with address '{0}'")]
    DeviceNotFound(IpAddr),

    /// No interface with the requested name
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// The capture device refused to open
    #[error("Cannot open device '{name}': {reason}")]
    DeviceOpen { name: String, reason: String },

    /// Capture error while a session is running
    #[error("Packet capture error: {0}")]
    Capture(String),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a device-open error
    pub fn device_open<N: Into<String>, R: ToString>(name: N, reason: R) -> Self {
        Error::DeviceOpen {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a capture error with a custom message
    pub fn capture<S: Into<String>>(msg: S) -> Self {
        Error::Capture(msg.into())
    }

    /// Whether this error stops the program before any capture starts
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::DeviceNotFound(_)
                | Error::InterfaceNotFound(_)
                | Error::DeviceOpen { .. }
                | Error::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_device_not_found_message() {
        let err = Error::DeviceNotFound(IpAddr::V4(Ipv4Addr::new(192, 168, 13, 68)));
        assert_eq!(
            err.to_string(),
            "Cannot find interface with address '192.168.13.68'"
        );
        assert!(err.is_setup_failure());
    }

    #[test]
    fn test_device_open_message() {
        let err = Error::device_open("eth0", "permission denied");
        assert_eq!(err.to_string(), "Cannot open device 'eth0': permission denied");
        assert!(err.is_setup_failure());
    }

    #[test]
    fn test_capture_error_is_not_setup_failure() {
        let err = Error::capture("read failed");
        assert!(!err.is_setup_failure());
    }
}
