//! Raw device printer
//!
//! Writes ESC/POS straight into a device node: a USB printer class device
//! (`/dev/usb/lp0`), a serial port (`/dev/ttyUSB0`, `\\.\COM3`) or the
//! virtual port a vendor driver exposes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use super::Printer;
use crate::error::{PrintError, PrintResult};

#[derive(Debug, Clone)]
pub struct DevicePrinter {
    path: PathBuf,
}

impl DevicePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for DevicePrinter {
    #[instrument(skip(self, data), fields(path = %self.path.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // Never create: a missing node means the printer is unplugged
        let mut device = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PrintError::Offline(format!("{}: {}", self.path.display(), e))
                }
                _ => PrintError::Io(e),
            })?;

        device.write_all(data).await?;
        device.flush().await?;

        info!("print job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn is_online(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "device not available");
                false
            }
        }
    }
}
