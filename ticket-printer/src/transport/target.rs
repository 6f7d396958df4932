//! Printer target addressing
//!
//! A single string selects both the transport and its address:
//!
//! | Input | Target |
//! |-------|--------|
//! | `192.168.1.100` | network, port 9100 |
//! | `192.168.1.100:9101`, `printer.lan:9100`, `tcp://printer.lan[:port]`, `[::1]` | network |
//! | `/dev/usb/lp0`, `\\.\COM3`, `COM3`, `LPT1` | raw device |
//! | anything else (`POS-80`) | Windows printer name |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PrintError;

/// Raw printing port used by most network thermal printers
pub const DEFAULT_NETWORK_PORT: u16 = 9100;

/// Where print data goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// Raw TCP socket
    Network { host: String, port: u16 },
    /// Device file or serial/parallel port
    Device { path: PathBuf },
    /// Printer installed through a Windows driver (virtual port)
    Windows { name: String },
}

impl PrinterTarget {
    pub fn is_network(&self) -> bool {
        matches!(self, PrinterTarget::Network { .. })
    }
}

fn is_port_name(s: &str) -> bool {
    let upper = s.to_ascii_uppercase();
    ["COM", "LPT"].iter().any(|prefix| {
        upper
            .strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// `host:port` with a plain host part (no path separators, not IPv6)
fn is_host_port(s: &str) -> bool {
    s.rsplit_once(':').is_some_and(|(host, port)| {
        !host.is_empty()
            && !host.contains([':', '/', '\\'])
            && !port.is_empty()
            && port.chars().all(|c| c.is_ascii_digit())
    })
}

fn parse_host_port(s: &str) -> Result<PrinterTarget, PrintError> {
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']'))
        && inner.parse::<IpAddr>().is_ok()
    {
        return Ok(PrinterTarget::Network {
            host: inner.to_string(),
            port: DEFAULT_NETWORK_PORT,
        });
    }
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(PrinterTarget::Network {
            host: addr.ip().to_string(),
            port: addr.port(),
        });
    }
    if s.starts_with('[') {
        return Err(PrintError::InvalidConfig(format!("Invalid address: {}", s)));
    }
    if s.parse::<IpAddr>().is_ok() {
        return Ok(PrinterTarget::Network {
            host: s.to_string(),
            port: DEFAULT_NETWORK_PORT,
        });
    }

    match s.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !host.contains(':') => {
            let port = port
                .parse()
                .map_err(|_| PrintError::InvalidConfig(format!("Invalid port: {}", s)))?;
            Ok(PrinterTarget::Network {
                host: host.to_string(),
                port,
            })
        }
        None if !s.is_empty() => Ok(PrinterTarget::Network {
            host: s.to_string(),
            port: DEFAULT_NETWORK_PORT,
        }),
        _ => Err(PrintError::InvalidConfig(format!("Invalid address: {}", s))),
    }
}

impl FromStr for PrinterTarget {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer target".to_string()));
        }

        if let Some(rest) = s.strip_prefix("tcp://") {
            return parse_host_port(rest.trim_end_matches('/'));
        }

        if s.starts_with('/') || s.starts_with(r"\\.\") {
            return Ok(PrinterTarget::Device { path: s.into() });
        }

        if is_port_name(s) {
            return Ok(PrinterTarget::Device {
                path: format!(r"\\.\{}", s.to_ascii_uppercase()).into(),
            });
        }

        if s.parse::<IpAddr>().is_ok()
            || s.parse::<SocketAddr>().is_ok()
            || s.starts_with('[')
            || is_host_port(s)
        {
            return parse_host_port(s);
        }

        Ok(PrinterTarget::Windows {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterTarget::Network { host, port } if host.contains(':') => {
                write!(f, "tcp://[{}]:{}", host, port)
            }
            PrinterTarget::Network { host, port } => write!(f, "tcp://{}:{}", host, port),
            PrinterTarget::Device { path } => write!(f, "{}", path.display()),
            PrinterTarget::Windows { name } => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(host: &str, port: u16) -> PrinterTarget {
        PrinterTarget::Network {
            host: host.to_string(),
            port,
        }
    }

    #[test]
    fn test_bare_ip_uses_default_port() {
        let t: PrinterTarget = "192.168.1.100".parse().unwrap();
        assert_eq!(t, network("192.168.1.100", 9100));
        assert!(t.is_network());
    }

    #[test]
    fn test_ip_with_port() {
        let t: PrinterTarget = "192.168.1.100:9101".parse().unwrap();
        assert_eq!(t, network("192.168.1.100", 9101));
    }

    #[test]
    fn test_tcp_scheme_with_hostname() {
        assert_eq!(
            "tcp://printer.lan".parse::<PrinterTarget>().unwrap(),
            network("printer.lan", 9100)
        );
        assert_eq!(
            "tcp://printer.lan:9200".parse::<PrinterTarget>().unwrap(),
            network("printer.lan", 9200)
        );
        assert!("tcp://printer.lan:abc".parse::<PrinterTarget>().is_err());
    }

    #[test]
    fn test_ipv6() {
        let t: PrinterTarget = "tcp://[::1]:9100".parse().unwrap();
        assert_eq!(t, network("::1", 9100));
        assert_eq!(t.to_string(), "tcp://[::1]:9100");
    }

    #[test]
    fn test_hostname_with_port_without_scheme() {
        let t: PrinterTarget = "printer.lan:9100".parse().unwrap();
        assert!(t.is_network());
        assert_eq!(t, network("printer.lan", 9100));
        assert_eq!(
            "POS-80:9101".parse::<PrinterTarget>().unwrap(),
            network("POS-80", 9101)
        );
        // a port must be all digits, otherwise it is a driver name
        assert!(matches!(
            "Receipt: Kitchen".parse::<PrinterTarget>().unwrap(),
            PrinterTarget::Windows { .. }
        ));
    }

    #[test]
    fn test_bracketed_ipv6_without_port() {
        assert_eq!(
            "tcp://[::1]".parse::<PrinterTarget>().unwrap(),
            network("::1", 9100)
        );
        assert_eq!("[fe80::1]".parse::<PrinterTarget>().unwrap(), network("fe80::1", 9100));
        assert!("tcp://[nope]".parse::<PrinterTarget>().is_err());
    }

    #[test]
    fn test_device_paths() {
        assert_eq!(
            "/dev/usb/lp0".parse::<PrinterTarget>().unwrap(),
            PrinterTarget::Device {
                path: "/dev/usb/lp0".into()
            }
        );
        assert_eq!(
            "com3".parse::<PrinterTarget>().unwrap(),
            PrinterTarget::Device {
                path: r"\\.\COM3".into()
            }
        );
    }

    #[test]
    fn test_windows_printer_name() {
        let t: PrinterTarget = "POS-80".parse().unwrap();
        assert_eq!(
            t,
            PrinterTarget::Windows {
                name: "POS-80".to_string()
            }
        );
        assert_eq!(t.to_string(), "POS-80");
        // "COMPUTER" is not a serial port
        assert!(matches!(
            "COMPUTER".parse::<PrinterTarget>().unwrap(),
            PrinterTarget::Windows { .. }
        ));
    }

    #[test]
    fn test_empty_target() {
        assert!("  ".parse::<PrinterTarget>().is_err());
    }
}
