//! Network printer (raw TCP)

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

use super::Printer;
use crate::error::{PrintError, PrintResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const ONLINE_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

/// Network printer
///
/// Most thermal printers accept raw ESC/POS on TCP port 9100. Every job
/// opens a fresh connection, writes the whole payload and closes it.
/// Hostnames are looked up on each connect, without blocking the runtime.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a printer from a host (IP literal or hostname) and port
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(PrintError::InvalidConfig(format!("Invalid host: {:?}", host)));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            host: addr.ip().to_string(),
            port: addr.port(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set connect and write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port`, IPv6 hosts in brackets
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Connect, looking the host up asynchronously
    async fn connect_within(&self, timeout: Duration) -> PrintResult<TcpStream> {
        tokio::time::timeout(timeout, TcpStream::connect((self.host.as_str(), self.port)))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.endpoint())))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.endpoint(), e)))
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.endpoint(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = self.connect_within(self.timeout).await?;
        debug!("connected");

        let send = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };

        tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.endpoint())))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(e.kind(), format!("Write failed: {}", e)))
            })?;

        info!("print job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.endpoint()))]
    async fn is_online(&self) -> bool {
        match self.connect_within(ONLINE_CHECK_TIMEOUT).await {
            Ok(_) => {
                debug!("printer online");
                true
            }
            Err(e) => {
                warn!(error = %e, "printer offline");
                false
            }
        }
    }
}
