//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Raw device files / serial ports (`/dev/usb/lp0`, `COM3`)
//! - Windows driver printers (raw spooler jobs via Win32 API)

mod device;
mod network;
mod target;
#[cfg(windows)]
mod windows;

use std::fmt;
use std::time::Duration;

use crate::error::{PrintError, PrintResult};

pub use device::DevicePrinter;
pub use network::NetworkPrinter;
pub use target::{DEFAULT_NETWORK_PORT, PrinterTarget};
#[cfg(windows)]
pub use windows::WindowsPrinter;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Any supported transport, selected from a [`PrinterTarget`]
#[derive(Debug, Clone)]
pub enum AnyPrinter {
    Network(NetworkPrinter),
    Device(DevicePrinter),
    #[cfg(windows)]
    Windows(WindowsPrinter),
}

impl AnyPrinter {
    /// Create the adapter for a target
    ///
    /// Windows driver targets are rejected on other platforms.
    pub fn connect(target: &PrinterTarget) -> PrintResult<Self> {
        match target {
            PrinterTarget::Network { host, port } => {
                Ok(Self::Network(NetworkPrinter::new(host, *port)?))
            }
            PrinterTarget::Device { path } => Ok(Self::Device(DevicePrinter::new(path))),
            #[cfg(windows)]
            PrinterTarget::Windows { name } => Ok(Self::Windows(WindowsPrinter::new(name))),
            #[cfg(not(windows))]
            PrinterTarget::Windows { name } => Err(PrintError::Unsupported(format!(
                "Driver printing not supported on this platform (printer: {})",
                name
            ))),
        }
    }

    /// Set the connect/write timeout (network printers only)
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match self {
            Self::Network(p) => Self::Network(p.with_timeout(timeout)),
            other => other,
        }
    }
}

impl fmt::Display for AnyPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(p) => write!(f, "tcp://{}", p.endpoint()),
            Self::Device(p) => write!(f, "{}", p.path().display()),
            #[cfg(windows)]
            Self::Windows(p) => write!(f, "{}", p.name()),
        }
    }
}

impl Printer for AnyPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            Self::Network(p) => p.print(data).await,
            Self::Device(p) => p.print(data).await,
            #[cfg(windows)]
            Self::Windows(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        match self {
            Self::Network(p) => p.is_online().await,
            Self::Device(p) => p.is_online().await,
            #[cfg(windows)]
            Self::Windows(p) => p.is_online().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_network() {
        let target: PrinterTarget = "192.168.1.100".parse().unwrap();
        let printer = AnyPrinter::connect(&target).unwrap();
        assert!(matches!(printer, AnyPrinter::Network(_)));
        assert_eq!(printer.to_string(), "tcp://192.168.1.100:9100");
    }

    #[test]
    fn test_connect_device() {
        let target: PrinterTarget = "/dev/usb/lp0".parse().unwrap();
        let printer = AnyPrinter::connect(&target).unwrap();
        assert!(matches!(printer, AnyPrinter::Device(_)));
        assert_eq!(printer.to_string(), "/dev/usb/lp0");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_connect_driver_unsupported() {
        let target: PrinterTarget = "POS-80".parse().unwrap();
        let err = AnyPrinter::connect(&target).unwrap_err();
        assert!(matches!(err, PrintError::Unsupported(_)));
        assert!(err.to_string().contains("POS-80"));
    }
}
